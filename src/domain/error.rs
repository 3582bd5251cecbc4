use thiserror::Error;

/// Domain-level errors for PrismQ.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid configuration entry '{key}': {reason}")]
    InvalidEntry { key: String, reason: String },

    #[error("Prompt error: {0}")]
    Prompt(String),

    #[error("Working directory error: {0}")]
    WorkingDirectory(String),
}

impl From<std::io::Error> for DomainError {
    fn from(err: std::io::Error) -> Self {
        DomainError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::Serialization(err.to_string())
    }
}
