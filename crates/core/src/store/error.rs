//! Persistence gateway errors.

use ledgerly_shared::AppError;
use thiserror::Error;
use tracing::error;

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors reported by an [`EntityStore`](super::EntityStore) implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The backend failed to execute the operation.
    #[error("Database error: {0}")]
    Database(String),

    /// A row could not be mapped back to a domain value.
    #[error("Corrupt row in {table}: {message}")]
    Corrupt {
        /// Table or collection name.
        table: &'static str,
        /// What was wrong.
        message: String,
    },

    /// An insert collided with an existing row.
    #[error("Duplicate key in {0}")]
    Duplicate(&'static str),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        error!(error = %err, "Store operation failed");
        Self::Internal(err.to_string())
    }
}
