//! Audit trail data types.

use chrono::{DateTime, Utc};
use ledgerly_shared::types::{AuditLogId, CompanyId, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// What was done.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditAction {
    /// Entity created.
    Create,
    /// Entity changed.
    Update,
    /// Entity removed or deactivated.
    Delete,
    /// Transaction approved.
    Approve,
    /// Transaction rejected.
    Reject,
    /// User signed in.
    Login,
    /// User signed out.
    Logout,
}

impl AuditAction {
    /// Returns the string representation of the action.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Approve => "approve",
            Self::Reject => "reject",
            Self::Login => "login",
            Self::Logout => "logout",
        }
    }

    /// Parses an action from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "create" => Some(Self::Create),
            "update" => Some(Self::Update),
            "delete" => Some(Self::Delete),
            "approve" => Some(Self::Approve),
            "reject" => Some(Self::Reject),
            "login" => Some(Self::Login),
            "logout" => Some(Self::Logout),
            _ => None,
        }
    }

    /// Past-tense label.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Create => "Created",
            Self::Update => "Updated",
            Self::Delete => "Deleted",
            Self::Approve => "Approved",
            Self::Reject => "Rejected",
            Self::Login => "Logged In",
            Self::Logout => "Logged Out",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which kind of entity was touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditEntity {
    /// A user.
    User,
    /// A money account.
    Account,
    /// A transaction.
    Transaction,
    /// A category.
    Category,
    /// A budget.
    Budget,
    /// A company.
    Company,
}

impl AuditEntity {
    /// Returns the string representation of the entity kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Account => "account",
            Self::Transaction => "transaction",
            Self::Category => "category",
            Self::Budget => "budget",
            Self::Company => "company",
        }
    }

    /// Parses an entity kind from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "user" => Some(Self::User),
            "account" => Some(Self::Account),
            "transaction" => Some(Self::Transaction),
            "category" => Some(Self::Category),
            "budget" => Some(Self::Budget),
            "company" => Some(Self::Company),
            _ => None,
        }
    }

    /// Human-readable name.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::User => "User",
            Self::Account => "Account",
            Self::Transaction => "Transaction",
            Self::Category => "Category",
            Self::Budget => "Budget",
            Self::Company => "Company",
        }
    }
}

impl fmt::Display for AuditEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One immutable audit trail entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditLog {
    /// Entry ID.
    pub id: AuditLogId,
    /// Company of the acting user.
    pub company_id: CompanyId,
    /// What was done.
    pub action: AuditAction,
    /// Kind of entity touched.
    pub entity: AuditEntity,
    /// The entity touched, when there is one.
    pub entity_id: Option<Uuid>,
    /// Acting user.
    pub user_id: UserId,
    /// Acting user's name.
    pub user_name: String,
    /// Acting user's email.
    pub user_email: String,
    /// Changed fields, as a JSON object.
    pub changes: Option<serde_json::Value>,
    /// Client address.
    pub ip_address: Option<String>,
    /// Client user agent.
    pub user_agent: Option<String>,
    /// When the action happened.
    pub created_at: DateTime<Utc>,
}
