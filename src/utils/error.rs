use thiserror::Error;

#[derive(Error, Debug)]
pub enum QueryError {
    #[error("Query request failed: {0}")]
    TransportError(#[from] reqwest::Error),

    #[error("Server returned error status {status}: {message}")]
    ServerError { status: u16, message: String },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration field: {field}")]
    MissingConfigError { field: String },
}

pub type Result<T> = std::result::Result<T, QueryError>;
