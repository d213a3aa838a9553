//! Unified error handling for list sync operations.

use smartlist_engine::ApiError;

/// Errors surfaced by [`ListSync`](crate::ListSync) and the store task.
///
/// Remote failures travel as [`SyncError::Api`] inside an operation and are
/// turned into a `fail` commit at its boundary; callers only ever see the
/// store-level variants.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("List API error: {0}")]
    Api(#[from] ApiError),

    #[error("Store error: {0}")]
    Store(#[from] smartlist_engine::Error),

    #[error("List store task has shut down")]
    StoreClosed,
}

/// Result type alias for sync operations.
pub type Result<T> = std::result::Result<T, SyncError>;
