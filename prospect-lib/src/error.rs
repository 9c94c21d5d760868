//! Error types

use std::path::PathBuf;

use datagrid::{LoadError, PersistError};

/// Errors raised while fetching a dataset.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// Error response from the server.
    #[error("HTTP {status}: {message}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Message from the response envelope, or the status reason.
        message: String,
    },

    /// Network error during the request.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Invalid URL provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The dataset file could not be read.
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The body is not a valid response envelope.
    #[error("Response parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl SourceError {
    /// Creates a new HTTP error.
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }

    /// Returns `true` for 401/403 responses.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Http { status: 401 | 403, .. })
    }
}

impl From<SourceError> for LoadError {
    fn from(err: SourceError) -> Self {
        match err {
            SourceError::Http { status: 401 | 403, message } => {
                LoadError::transport(format!("Not authorized: {message}"))
            }
            SourceError::Http { message, .. } => LoadError::rejected(Some(message)),
            other => LoadError::transport(other.to_string()),
        }
    }
}

/// Errors raised by the SQLite view-state backend.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("database error: {0}")]
    Database(#[from] async_sqlite::Error),
}

impl From<SettingsError> for PersistError {
    fn from(err: SettingsError) -> Self {
        PersistError::backend(err)
    }
}
