//! Transaction domain types.
//!
//! A transaction is created `pending` and moves exactly once to `approved` or
//! `rejected`. Both are terminal.

use chrono::{DateTime, NaiveDate, Utc};
use ledgerly_shared::types::{AccountId, CategoryId, CompanyId, TransactionId, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Currency applied when the caller names none.
pub const DEFAULT_CURRENCY: &str = "USD";

/// Direction of money movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money into the to-account.
    Income,
    /// Money out of the from-account.
    Expense,
    /// Money from one account into another.
    Transfer,
}

impl TransactionType {
    /// Returns the string representation of the type.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
            Self::Transfer => "transfer",
        }
    }

    /// Parses a type from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "income" => Some(Self::Income),
            "expense" => Some(Self::Expense),
            "transfer" => Some(Self::Transfer),
            _ => None,
        }
    }

    /// Human-readable name.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Income => "Income",
            Self::Expense => "Expense",
            Self::Transfer => "Transfer",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Transaction status in the approval workflow.
///
/// The valid transitions are:
/// - Pending → Approved (approve)
/// - Pending → Rejected (reject)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    /// Waiting for a holder or above.
    Pending,
    /// Approved; ledger effects have been applied.
    Approved,
    /// Rejected; no ledger effects.
    Rejected,
}

impl TransactionStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    /// Human-readable name.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
        }
    }

    /// Returns true once no further transition is possible.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A company transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Transaction ID.
    pub id: TransactionId,
    /// Owning company.
    pub company_id: CompanyId,
    /// Income, expense or transfer.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// Always positive.
    pub amount: Decimal,
    /// Currency code.
    pub currency: String,
    /// Free text.
    pub description: String,
    /// Debited account.
    pub from_account_id: Option<AccountId>,
    /// Credited account.
    pub to_account_id: Option<AccountId>,
    /// Category used for budget tracking.
    pub category_id: Option<CategoryId>,
    /// Workflow status.
    pub status: TransactionStatus,
    /// Submitter.
    pub created_by_id: UserId,
    /// Submitter name at creation time.
    pub created_by_name: String,
    /// Who approved or rejected.
    pub approved_by_id: Option<UserId>,
    /// Name of who approved or rejected.
    pub approved_by_name: Option<String>,
    /// Set on rejection.
    pub rejection_reason: Option<String>,
    /// Business date of the transaction.
    pub transaction_date: NaiveDate,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
    /// When approved or rejected.
    pub approved_at: Option<DateTime<Utc>>,
}

impl Transaction {
    /// Returns true while the transaction awaits a decision.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.status == TransactionStatus::Pending
    }
}

/// Caller input for a new transaction.
#[derive(Debug, Clone, Deserialize)]
pub struct NewTransaction {
    /// Income, expense or transfer.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// Must be positive.
    pub amount: Decimal,
    /// Defaults to USD.
    #[serde(default)]
    pub currency: Option<String>,
    /// Free text.
    #[serde(default)]
    pub description: String,
    /// Required for expense and transfer.
    #[serde(default)]
    pub from_account_id: Option<AccountId>,
    /// Required for income and transfer.
    #[serde(default)]
    pub to_account_id: Option<AccountId>,
    /// Optional category.
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    /// Defaults to today.
    #[serde(default)]
    pub transaction_date: Option<NaiveDate>,
}

/// Editable fields of a transaction. Ledger effects are never re-run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TransactionPatch {
    /// New description.
    #[serde(default)]
    pub description: Option<String>,
    /// New amount, must be positive.
    #[serde(default)]
    pub amount: Option<Decimal>,
    /// New business date.
    #[serde(default)]
    pub transaction_date: Option<NaiveDate>,
}

impl TransactionPatch {
    /// Returns true when nothing would change.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.description.is_none() && self.amount.is_none() && self.transaction_date.is_none()
    }

    /// Applies the patch to an in-memory transaction.
    pub fn apply_to(&self, transaction: &mut Transaction, now: DateTime<Utc>) {
        if let Some(description) = &self.description {
            transaction.description.clone_from(description);
        }
        if let Some(amount) = self.amount {
            transaction.amount = amount;
        }
        if let Some(date) = self.transaction_date {
            transaction.transaction_date = date;
        }
        transaction.updated_at = now;
    }
}

/// Filter for listing transactions.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct TransactionFilter {
    /// Only this status.
    #[serde(default)]
    pub status: Option<TransactionStatus>,
}

/// A pending → terminal status change, applied as one conditional write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusTransition {
    /// Target transaction.
    pub transaction_id: TransactionId,
    /// Company scope of the write.
    pub company_id: CompanyId,
    /// `Approved` or `Rejected`.
    pub to: TransactionStatus,
    /// Deciding user.
    pub decided_by_id: UserId,
    /// Deciding user's name.
    pub decided_by_name: String,
    /// Only for rejections.
    pub rejection_reason: Option<String>,
    /// Decision time.
    pub decided_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_as_str() {
        assert_eq!(TransactionStatus::Pending.as_str(), "pending");
        assert_eq!(TransactionStatus::Approved.as_str(), "approved");
        assert_eq!(TransactionStatus::Rejected.as_str(), "rejected");
    }

    #[test]
    fn test_status_from_str() {
        assert_eq!(
            TransactionStatus::parse("PENDING"),
            Some(TransactionStatus::Pending)
        );
        assert_eq!(
            TransactionStatus::parse("Rejected"),
            Some(TransactionStatus::Rejected)
        );
        assert_eq!(TransactionStatus::parse("posted"), None);
    }

    #[test]
    fn test_status_terminal() {
        assert!(!TransactionStatus::Pending.is_terminal());
        assert!(TransactionStatus::Approved.is_terminal());
        assert!(TransactionStatus::Rejected.is_terminal());
    }

    #[test]
    fn test_type_display_names() {
        assert_eq!(TransactionType::Income.display_name(), "Income");
        assert_eq!(TransactionType::Transfer.to_string(), "transfer");
        assert_eq!(TransactionType::parse("EXPENSE"), Some(TransactionType::Expense));
        assert_eq!(TransactionType::parse("refund"), None);
    }

    #[test]
    fn test_new_transaction_deserializes_with_defaults() {
        let input: NewTransaction =
            serde_json::from_str(r#"{"type":"expense","amount":"12.50"}"#).unwrap();
        assert_eq!(input.transaction_type, TransactionType::Expense);
        assert_eq!(input.amount, Decimal::new(1250, 2));
        assert!(input.currency.is_none());
        assert!(input.description.is_empty());
        assert!(input.from_account_id.is_none());
    }

    #[test]
    fn test_patch_is_empty() {
        assert!(TransactionPatch::default().is_empty());
        let patch = TransactionPatch {
            description: Some("x".into()),
            ..Default::default()
        };
        assert!(!patch.is_empty());
    }
}
