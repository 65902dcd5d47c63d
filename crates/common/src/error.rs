use thiserror::Error;

/// The error kinds enumerated in the system's error handling design (§7):
/// each variant maps to exactly one HTTP status class and one recovery
/// policy at its call site.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid input: {0}")]
    InputInvalid(String),

    #[error("broker unavailable: {0}")]
    BrokerUnavailable(String),

    #[error("no workers available")]
    NoWorkersAvailable,

    #[error("failed to read document '{doc_id}': {reason}")]
    DocumentReadFailure { doc_id: String, reason: String },

    #[error("failed to decode result: {0}")]
    ResultDecodeFailure(String),

    #[error("persistence failure: {0}")]
    PersistenceFailure(String),
}

impl Error {
    /// Whether this error is a caller mistake (4xx) as opposed to a
    /// transient infrastructure problem (5xx). Used by the HTTP layer in
    /// the coordinator crate to pick a status code.
    pub fn is_client_fault(&self) -> bool {
        matches!(self, Error::InputInvalid(_))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::PersistenceFailure(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::ResultDecodeFailure(err.to_string())
    }
}

impl From<redis::RedisError> for Error {
    fn from(err: redis::RedisError) -> Self {
        Error::BrokerUnavailable(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
