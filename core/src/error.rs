//! Error types and handling for toolzz core

use thiserror::Error;

/// Result type alias for toolzz operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for toolzz core
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Backend API errors
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Export errors
    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Generic error with message
    #[error("{0}")]
    Generic(String),
}

impl Error {
    /// Whether this error means the backend could not be reached or answered
    /// with something that is not a result document.
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Http(_) | Error::Api(_))
    }
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for field '{field}': {value}")]
    InvalidValue { field: String, value: String },
}

/// Backend API errors
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    #[error("Invalid response body: {message}")]
    InvalidResponse { message: String },

    #[error("Network error: {message}")]
    Network { message: String },
}

/// Export errors
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Nenhum dado estruturado para exportar em CSV.")]
    NoFindings,

    #[error("Output directory does not exist: {path}")]
    MissingDirectory { path: String },
}
