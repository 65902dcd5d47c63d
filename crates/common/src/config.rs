use std::env;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::lang::Language;

/// Reads an environment variable, falling back to `default` when unset.
pub fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Reads and parses an environment variable, falling back to `default`
/// when unset. An unset-but-present variable that fails to parse aborts
/// startup with a descriptive error rather than silently using the
/// default (§10: invalid configuration fails startup, it does not limp
/// along with a guess).
pub fn env_parse<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| Error::InputInvalid(format!("{key}={raw:?} is invalid: {e}"))),
        Err(_) => Ok(default),
    }
}

/// Where the broker lives. Shared by both binaries since both need to
/// open a connection to it.
#[derive(Debug, Clone)]
pub struct BrokerEndpoint {
    pub host: String,
    pub port: u16,
}

impl BrokerEndpoint {
    pub fn from_env() -> Result<Self> {
        Ok(BrokerEndpoint {
            host: env_or("REDIS_HOST", "127.0.0.1"),
            port: env_parse("REDIS_PORT", 6379u16)?,
        })
    }
}

/// Resolves the configured processing language, checking the
/// coordinator-specific variable first and falling back to the shared one
/// (§6: `COORDINATOR_PROCESSING_LANGUAGE` / `PROCESSING_LANGUAGE`).
pub fn processing_language_from_env() -> Result<Language> {
    let raw = env::var("COORDINATOR_PROCESSING_LANGUAGE")
        .or_else(|_| env::var("PROCESSING_LANGUAGE"))
        .unwrap_or_else(|_| "english".to_string());
    raw.parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_parse_falls_back_on_unset() {
        assert_eq!(env_parse("IDX_TEST_UNSET_PORT", 6379u16).unwrap(), 6379);
    }
}
