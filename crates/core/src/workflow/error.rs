//! Workflow error types for transaction lifecycle management.

use ledgerly_shared::AppError;
use thiserror::Error;

use crate::workflow::types::TransactionStatus;

/// Errors raised by the pure status state machine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    /// Attempted an invalid status transition.
    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition {
        /// The current status.
        from: TransactionStatus,
        /// The attempted target status.
        to: TransactionStatus,
    },
}

impl WorkflowError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
        }
    }
}

impl From<WorkflowError> for AppError {
    fn from(err: WorkflowError) -> Self {
        match err {
            WorkflowError::InvalidTransition { .. } => Self::InvalidState(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_transition_error() {
        let err = WorkflowError::InvalidTransition {
            from: TransactionStatus::Approved,
            to: TransactionStatus::Rejected,
        };
        assert_eq!(err.error_code(), "INVALID_TRANSITION");
        assert!(err.to_string().contains("approved"));
        assert!(err.to_string().contains("rejected"));
    }

    #[test]
    fn test_maps_to_invalid_state() {
        let err: AppError = WorkflowError::InvalidTransition {
            from: TransactionStatus::Rejected,
            to: TransactionStatus::Approved,
        }
        .into();
        assert_eq!(err.status_code(), 409);
    }
}
