//! Users and companies.

use chrono::{DateTime, Utc};
use ledgerly_shared::types::{CompanyId, UserId};
use serde::{Deserialize, Serialize};

use crate::auth::Role;

/// A tenant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    /// Company ID.
    pub id: CompanyId,
    /// Display name.
    pub name: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// A user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// User ID.
    pub id: UserId,
    /// Tenant scope.
    pub company_id: CompanyId,
    /// Login email.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Sole authorization input.
    pub role: Role,
    /// Whether the email has been confirmed.
    pub email_verified: bool,
    /// Outstanding verification code.
    #[serde(skip_serializing, default)]
    pub verify_code: Option<String>,
    /// Expiry of the outstanding code.
    #[serde(skip_serializing, default)]
    pub verify_expires_at: Option<DateTime<Utc>>,
    /// When the last verification email went out.
    #[serde(skip_serializing, default)]
    pub last_email_sent_at: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Change to a user's verification state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationUpdate {
    /// A new code was issued and emailed.
    CodeIssued {
        /// The code.
        code: String,
        /// When it stops being accepted.
        expires_at: DateTime<Utc>,
    },
    /// The code was accepted; clear it and mark the email verified.
    Verified,
}

impl VerificationUpdate {
    /// Applies the update to an in-memory user.
    pub fn apply_to(&self, user: &mut User, now: DateTime<Utc>) {
        match self {
            Self::CodeIssued { code, expires_at } => {
                user.verify_code = Some(code.clone());
                user.verify_expires_at = Some(*expires_at);
                user.last_email_sent_at = Some(now);
            }
            Self::Verified => {
                user.email_verified = true;
                user.verify_code = None;
                user.verify_expires_at = None;
            }
        }
        user.updated_at = now;
    }
}
