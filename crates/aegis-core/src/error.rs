use thiserror::Error;

/// Top-level error type for Aegis.
///
/// Library crates define their own error enums and convert into this one
/// where they cross into configuration or collaborator code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AegisError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Activity log error: {0}")]
    ActivityLog(String),
}

impl From<toml::de::Error> for AegisError {
    fn from(err: toml::de::Error) -> Self {
        AegisError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for AegisError {
    fn from(err: toml::ser::Error) -> Self {
        AegisError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for AegisError {
    fn from(err: serde_json::Error) -> Self {
        AegisError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Aegis operations.
pub type Result<T> = std::result::Result<T, AegisError>;
