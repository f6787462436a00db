use thiserror::Error;

#[derive(Error, Debug)]
pub enum CollectionError {
    #[error("Provider error: {0}")]
    ProviderError(String),

    #[error("Transport error: {0}")]
    TransportError(String),

    #[error("Invalid record: {0}")]
    RecordError(String),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("Resource '{0}' not found")]
    NotFound(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Runtime error: {0}")]
    RuntimeError(String),
}

pub type Result<T> = std::result::Result<T, CollectionError>;

impl From<serde_json::Error> for CollectionError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

impl From<http::header::InvalidHeaderName> for CollectionError {
    fn from(err: http::header::InvalidHeaderName) -> Self {
        Self::ConfigError(err.to_string())
    }
}
