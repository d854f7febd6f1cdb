use thiserror::Error;

/// Everything that can go wrong talking to the proxy, storage or configuration.
#[derive(Error, Debug)]
pub enum Error {
    /// Transport failure from reqwest.
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Non-2xx answer from the proxy.
    #[error("Backend returned unexpected status {status} for {url}")]
    UnexpectedStatus {
        /// HTTP status code
        status: u16,
        /// Requested URL
        url: String,
    },

    /// Body did not have the expected JSON shape.
    #[error("Deserialization error: {0}")]
    DeserializationError(#[from] serde_json::Error),

    /// An endpoint or location could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Missing or invalid setting.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// `DuckDB` failure.
    #[error("Storage error: {0}")]
    StorageError(#[from] async_duckdb::Error),
}

impl From<std::env::VarError> for Error {
    fn from(err: std::env::VarError) -> Self {
        Error::ConfigurationError(err.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::ConfigurationError(err.to_string())
    }
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;
