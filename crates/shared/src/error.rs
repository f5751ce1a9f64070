//! Application-wide error types.
//!
//! Every service in the workspace reports failures through [`AppError`]. The HTTP
//! layer maps each variant to a status code and a stable machine-readable code.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    /// Malformed or missing input.
    #[error("Validation error: {0}")]
    Validation(String),

    /// No resolvable identity for the request.
    #[error("Authentication required: {0}")]
    Unauthenticated(String),

    /// Identity resolved but the role is insufficient.
    #[error("Access denied: {0}")]
    Unauthorized(String),

    /// Entity absent, or outside the caller's company.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The entity is not in a state that allows the operation.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Storage or infrastructure failure.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::Unauthenticated(_) => 401,
            Self::Unauthorized(_) => 403,
            Self::NotFound(_) => 404,
            Self::InvalidState(_) => 409,
            Self::Internal(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Unauthenticated(_) => "UNAUTHENTICATED",
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::NotFound(_) => "NOT_FOUND",
            Self::InvalidState(_) => "INVALID_STATE",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns the message safe to show to an API client.
    ///
    /// Internal failures are already logged where they happen; the client only
    /// gets a generic text.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::Internal(_) => "An internal error occurred".to_string(),
            Self::Validation(msg)
            | Self::Unauthenticated(msg)
            | Self::Unauthorized(msg)
            | Self::NotFound(msg)
            | Self::InvalidState(msg) => msg.clone(),
        }
    }

    /// Shorthand for a `NotFound` naming the entity kind.
    #[must_use]
    pub fn not_found(entity: &str) -> Self {
        Self::NotFound(format!("{entity} not found"))
    }
}
