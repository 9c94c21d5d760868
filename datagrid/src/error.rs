//! Error types

/// Message shown when the data source gives no reason for a failure.
pub const GENERIC_LOAD_ERROR: &str = "Failed to load data";

/// Errors reaching the table from the upstream data source.
///
/// A transport failure and a `success: false` response are handled the same
/// way: the table shows the message in its error state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoadError {
    /// The request never produced a usable response.
    #[error("{0}")]
    Transport(String),

    /// The server answered with `success: false`.
    #[error("{0}")]
    Rejected(String),
}

impl LoadError {
    /// Creates a transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// Creates a rejection, falling back to the generic message when the
    /// server sent none.
    pub fn rejected(message: Option<String>) -> Self {
        Self::Rejected(
            message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| GENERIC_LOAD_ERROR.to_string()),
        )
    }

    /// Message to display.
    pub fn message(&self) -> &str {
        match self {
            Self::Transport(m) | Self::Rejected(m) => m,
        }
    }
}

/// Errors raised by view-state storage backends.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    /// The backend failed to read or write.
    #[error("storage backend error: {0}")]
    Backend(String),

    /// The view state could not be serialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl PersistError {
    /// Creates a backend error.
    pub fn backend(message: impl std::fmt::Display) -> Self {
        Self::Backend(message.to_string())
    }
}
