//! Defines the custom error type for the `core` module.

use std::path::PathBuf;
use thiserror::Error;

/// The primary error type for the `core` module.
///
/// This enum covers every failure the core operations can surface: the
/// metadata exchange, exports, and the file system work around them.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The HTTP exchange could not be completed, or the service answered
    /// with a non-success status. `status` is `None` when no response arrived.
    #[error("{message}")]
    Transport {
        status: Option<u16>,
        message: String,
    },

    /// The service answered successfully but reported an error in its body.
    #[error("{0}")]
    Application(String),

    /// An export was requested without metadata to export.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The document-generation library failed while producing an artifact.
    #[error("Failed to render document: {0}")]
    Render(String),

    /// Represents an I/O error, typically from file system operations.
    #[error("I/O error for path {1}: {0}")]
    Io(#[source] std::io::Error, PathBuf),

    /// Represents an error that occurred when a Tokio task was joined.
    #[error("Task join error: {0}")]
    Join(#[from] tokio::task::JoinError),

    /// Represents a path that was expected to be a directory but was not.
    #[error("Path is not a valid directory: {0}")]
    NotADirectory(PathBuf),
}

impl CoreError {
    /// Builds a transport error for a response with a non-success status.
    pub fn from_status(status: reqwest::StatusCode) -> Self {
        CoreError::Transport {
            status: Some(status.as_u16()),
            message: format!(
                "HTTP {}: {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown Status")
            ),
        }
    }

    /// The HTTP status carried by a transport error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            CoreError::Transport { status, .. } => *status,
            _ => None,
        }
    }
}

impl From<reqwest::Error> for CoreError {
    fn from(err: reqwest::Error) -> Self {
        CoreError::Transport {
            status: err.status().map(|s| s.as_u16()),
            message: format!("Request failed: {err}"),
        }
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_message_includes_code_and_reason() {
        let err = CoreError::from_status(reqwest::StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.status(), Some(500));
        assert_eq!(err.to_string(), "HTTP 500: Internal Server Error");
    }

    #[test]
    fn application_error_displays_service_text() {
        let err = CoreError::Application("bad tree".to_string());
        assert_eq!(err.to_string(), "bad tree");
        assert_eq!(err.status(), None);
    }
}
