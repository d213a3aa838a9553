//! Error types for the smart-list engine.

use crate::ListName;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// HTTP status the list API uses to signal a list that does not exist yet.
pub const NOT_FOUND_STATUS: u16 = 404;

/// Errors raised by the engine itself.
///
/// These are programming errors (a malformed key specification, a merge
/// commit without keys) rather than conditions a user can recover from.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("invalid item key specification: {0}")]
    InvalidSpec(String),

    #[error("need item keys to update {0} list")]
    MissingKeys(ListName),
}

/// A failure reported by the remote list API.
///
/// Stored verbatim in a failed [`ListState`](crate::ListState), so it is
/// cloneable and serializable.
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "camelCase")]
pub enum ApiError {
    #[error("transport error (status {status:?}): {message}")]
    Transport {
        status: Option<u16>,
        message: String,
    },

    #[error("list not found: {0}")]
    NotFound(ListName),
}

impl ApiError {
    /// Build an error from an HTTP-like status. A 404 becomes [`ApiError::NotFound`].
    pub fn from_status(status: u16, list_name: &str, message: impl Into<String>) -> Self {
        if status == NOT_FOUND_STATUS {
            ApiError::NotFound(list_name.to_string())
        } else {
            ApiError::Transport {
                status: Some(status),
                message: message.into(),
            }
        }
    }

    /// A failure with no status at all (connection refused, timeout, ...).
    pub fn network(message: impl Into<String>) -> Self {
        ApiError::Transport {
            status: None,
            message: message.into(),
        }
    }

    /// The HTTP-like status carried by this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Transport { status, .. } => *status,
            ApiError::NotFound(_) => Some(NOT_FOUND_STATUS),
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(NOT_FOUND_STATUS)
    }
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;
