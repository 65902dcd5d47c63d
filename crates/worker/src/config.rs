use clap::Parser;
use idx_common::config::{env_or, env_parse, BrokerEndpoint};
use idx_common::error::Result;
use idx_common::Language;

#[derive(Debug, Parser)]
#[command(name = "idx-worker", about = "Distributed inverted-index worker")]
pub struct Cli {
    #[arg(long, env = "REDIS_HOST")]
    pub redis_host: Option<String>,

    #[arg(long, env = "REDIS_PORT")]
    pub redis_port: Option<u16>,

    #[arg(long, env = "PROCESSING_LANGUAGE")]
    pub language: Option<String>,

    #[arg(long, env = "WORKER_ID_PREFIX")]
    pub worker_id_prefix: Option<String>,

    #[arg(long, env = "HEARTBEAT_INTERVAL_SECS")]
    pub heartbeat_interval_secs: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub broker: BrokerEndpoint,
    pub language: Language,
    pub worker_id_prefix: String,
    pub heartbeat_interval_secs: u64,
}

impl Config {
    pub fn resolve(cli: Cli) -> Result<Self> {
        let broker = BrokerEndpoint {
            host: cli.redis_host.unwrap_or_else(|| env_or("REDIS_HOST", "127.0.0.1")),
            port: match cli.redis_port {
                Some(p) => p,
                None => env_parse("REDIS_PORT", 6379u16)?,
            },
        };

        let language = match cli.language {
            Some(raw) => raw.parse()?,
            None => idx_common::config::processing_language_from_env()?,
        };

        Ok(Config {
            broker,
            language,
            worker_id_prefix: cli
                .worker_id_prefix
                .unwrap_or_else(|| env_or("WORKER_ID_PREFIX", "worker")),
            heartbeat_interval_secs: match cli.heartbeat_interval_secs {
                Some(v) => v,
                None => env_parse("HEARTBEAT_INTERVAL_SECS", 2u64)?,
            },
        })
    }
}

/// Computes the stable `{prefix}-{hostname}-{pid}` identity (§4.3).
pub fn worker_id(prefix: &str) -> String {
    let hostname = hostname::get()
        .ok()
        .and_then(|h| h.into_string().ok())
        .unwrap_or_else(|| "unknown-host".to_string());
    format!("{prefix}-{hostname}-{}", std::process::id())
}
