//! Token claims and verification request payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{CompanyId, UserId};

/// JWT claims for access tokens.
///
/// Only identity travels in the token. Role and company membership are re-read
/// from storage on every request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID).
    pub sub: UserId,
    /// Company the token was issued for.
    pub company: CompanyId,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

impl Claims {
    /// Creates new claims for a user.
    #[must_use]
    pub fn new(
        user_id: UserId,
        company_id: CompanyId,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            sub: user_id,
            company: company_id,
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// Returns the user ID from claims.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.sub
    }

    /// Returns the company ID from claims.
    #[must_use]
    pub const fn company_id(&self) -> CompanyId {
        self.company
    }
}

/// Resend verification code request.
#[derive(Debug, Clone, Deserialize)]
pub struct ResendVerificationRequest {
    /// Email of the account to verify.
    pub email: String,
}

/// Submit verification code request.
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyCodeRequest {
    /// Email of the account to verify.
    pub email: String,
    /// The 6-digit code from the email.
    pub code: String,
}

/// Email verification response.
#[derive(Debug, Clone, Serialize)]
pub struct VerificationResponse {
    /// Human readable outcome.
    pub message: String,
    /// Whether the email is now verified.
    pub verified: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_claims_new_sets_correct_fields() {
        let user_id = UserId::new();
        let company_id = CompanyId::new();
        let now = Utc::now();
        let expires_at = now + Duration::hours(1);

        let claims = Claims::new(user_id, company_id, now, expires_at);

        assert_eq!(claims.user_id(), user_id);
        assert_eq!(claims.company_id(), company_id);
        assert_eq!(claims.iat, now.timestamp());
        assert_eq!(claims.exp, expires_at.timestamp());
    }
}
