//! Error types for the dashboard document and server.

use std::path::PathBuf;

use dsg_core::DsgError;
use thiserror::Error;

/// Result type for dashboard operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors from dashboard operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Deriving views or validating controls failed.
    #[error(transparent)]
    Core(#[from] DsgError),

    /// Failed to load the dataset of an app directory.
    #[error("failed to load dataset from {path}: {source:#}")]
    LoadFailed {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    /// Malformed message from a dashboard client.
    #[error("invalid client message: {0}")]
    InvalidMessage(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
