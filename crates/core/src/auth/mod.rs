//! Identity, role hierarchy and email verification.
//!
//! This module provides:
//! - The role hierarchy and the permission predicates derived from it
//! - Navigation tab visibility per role
//! - The [`Actor`] every operation is performed as, and the [`Authenticator`] seam
//! - Email verification codes

pub mod rbac;
pub mod tabs;
pub mod verification;

#[cfg(test)]
mod rbac_props;

pub use rbac::{
    Role, VALID_ROLES, can_access_settings, can_approve, can_generate_reports,
    can_manage_accounts, can_manage_budgets, can_manage_categories, can_manage_team,
    can_submit_expenses, can_view_all_expenses, has_permission, is_developer, is_super_admin,
    level_of, role_display_name,
};
pub use tabs::{ALL_TABS, Tab, TabGate, is_tab_visible, visible_tabs};
pub use verification::VerificationService;

use async_trait::async_trait;
use ledgerly_shared::types::{CompanyId, UserId};
use ledgerly_shared::{AppError, AppResult};
use serde::{Deserialize, Serialize};

use crate::user::User;

/// Where a request came from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestMeta {
    /// Client address.
    pub ip_address: Option<String>,
    /// Client user agent.
    pub user_agent: Option<String>,
}

/// The authenticated user an operation runs as.
///
/// Role and company always come from the stored user record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// Acting user.
    pub user_id: UserId,
    /// Tenant scope for every read and write.
    pub company_id: CompanyId,
    /// Sole authorization input.
    pub role: Role,
    /// Display name, copied into audit entries and approvals.
    pub name: String,
    /// Email, copied into audit entries.
    pub email: String,
    /// Client address.
    pub ip_address: Option<String>,
    /// Client user agent.
    pub user_agent: Option<String>,
}

impl Actor {
    /// Builds the actor for a stored user.
    #[must_use]
    pub fn from_user(user: User, meta: RequestMeta) -> Self {
        Self {
            user_id: user.id,
            company_id: user.company_id,
            role: user.role,
            name: user.name,
            email: user.email,
            ip_address: meta.ip_address,
            user_agent: meta.user_agent,
        }
    }

    /// Fails with `Unauthorized` unless `allowed` holds for the actor's role.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Unauthorized` naming `action`.
    pub fn require(&self, allowed: fn(Role) -> bool, action: &str) -> AppResult<()> {
        if allowed(self.role) {
            Ok(())
        } else {
            Err(AppError::Unauthorized(format!(
                "Insufficient permissions to {action}"
            )))
        }
    }

    /// Fails unless the actor holds at least `level`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Unauthorized` naming `action`.
    pub fn require_level(&self, level: u8, action: &str) -> AppResult<()> {
        if has_permission(self.role, level) {
            Ok(())
        } else {
            Err(AppError::Unauthorized(format!(
                "Insufficient permissions to {action}"
            )))
        }
    }
}

/// Resolves a bearer credential into an [`Actor`].
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Validates `token` and loads the acting user.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Unauthenticated` for a missing, invalid or expired
    /// token, or when the user no longer exists.
    async fn authenticate(&self, token: &str, meta: RequestMeta) -> AppResult<Actor>;
}
