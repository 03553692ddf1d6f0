//! Error types shared by every crate in the workspace.
//!
//! All fallible operations return `CdsResult<T>`. Only `Validation` carries a
//! message meant for the user verbatim; every other variant collapses to a
//! single generic message in the UI, and the detail goes to the log.

use thiserror::Error;

/// The generic message shown for any failure that is not a validation error.
pub const GENERIC_ERROR_MESSAGE: &str =
    "An error occurred while processing your request. Please try again.";

/// The unified error type for the clinical decision support client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CdsError {
    /// Client-side input validation failed. No request was issued.
    #[error("validation failed: {reason}")]
    Validation { reason: String },

    /// The request could not be sent or the connection failed.
    #[error("transport error: {reason}")]
    Transport { reason: String },

    /// The backend answered with a non-success status code.
    #[error("backend returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body did not match the expected shape.
    #[error("could not decode response: {reason}")]
    Decode { reason: String },

    /// A required configuration value is missing or invalid.
    #[error("configuration error: {reason}")]
    Config { reason: String },

    /// A local file could not be read or written.
    #[error("i/o error: {reason}")]
    Io { reason: String },
}

impl CdsError {
    /// Shorthand for a validation failure.
    pub fn validation(reason: impl Into<String>) -> Self {
        Self::Validation {
            reason: reason.into(),
        }
    }

    /// Wrap a filesystem failure, naming the path it happened on.
    pub fn io(path: impl std::fmt::Display, err: std::io::Error) -> Self {
        Self::Io {
            reason: format!("{}: {}", path, err),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// The text to put in front of the user.
    ///
    /// Validation messages are shown as-is. Everything else collapses to
    /// [`GENERIC_ERROR_MESSAGE`]; backend error payloads are never parsed.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation { reason } => reason.clone(),
            _ => GENERIC_ERROR_MESSAGE.to_string(),
        }
    }
}

/// Convenience alias used throughout the workspace.
pub type CdsResult<T> = Result<T, CdsError>;
