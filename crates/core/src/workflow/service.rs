//! Workflow service for transaction state transitions.
//!
//! Pure functions: they check the current status and build the
//! [`StatusTransition`] the store applies as one conditional write.

use chrono::{DateTime, Utc};
use ledgerly_shared::types::UserId;

use crate::workflow::error::WorkflowError;
use crate::workflow::types::{StatusTransition, Transaction, TransactionStatus};

/// Stateless service for managing transaction workflow transitions.
pub struct WorkflowService;

impl WorkflowService {
    /// Approve a pending transaction.
    ///
    /// # Errors
    /// * `WorkflowError::InvalidTransition` if not in Pending status
    pub fn approve(
        transaction: &Transaction,
        approved_by: UserId,
        approved_by_name: &str,
        now: DateTime<Utc>,
    ) -> Result<StatusTransition, WorkflowError> {
        Self::decide(
            transaction,
            TransactionStatus::Approved,
            approved_by,
            approved_by_name,
            None,
            now,
        )
    }

    /// Reject a pending transaction. The reason is optional; blank reasons are dropped.
    ///
    /// # Errors
    /// * `WorkflowError::InvalidTransition` if not in Pending status
    pub fn reject(
        transaction: &Transaction,
        rejected_by: UserId,
        rejected_by_name: &str,
        reason: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<StatusTransition, WorkflowError> {
        let reason = reason
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty());
        Self::decide(
            transaction,
            TransactionStatus::Rejected,
            rejected_by,
            rejected_by_name,
            reason,
            now,
        )
    }

    fn decide(
        transaction: &Transaction,
        to: TransactionStatus,
        decided_by_id: UserId,
        decided_by_name: &str,
        rejection_reason: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<StatusTransition, WorkflowError> {
        if !Self::is_valid_transition(transaction.status, to) {
            return Err(WorkflowError::InvalidTransition {
                from: transaction.status,
                to,
            });
        }

        Ok(StatusTransition {
            transaction_id: transaction.id,
            company_id: transaction.company_id,
            to,
            decided_by_id,
            decided_by_name: decided_by_name.to_string(),
            rejection_reason,
            decided_at: now,
        })
    }

    /// Check if a status transition is valid.
    ///
    /// Valid transitions:
    /// - Pending → Approved (approve)
    /// - Pending → Rejected (reject)
    #[must_use]
    pub fn is_valid_transition(from: TransactionStatus, to: TransactionStatus) -> bool {
        matches!(
            (from, to),
            (
                TransactionStatus::Pending,
                TransactionStatus::Approved | TransactionStatus::Rejected
            )
        )
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::NaiveDate;
    use ledgerly_shared::types::{AccountId, CompanyId, TransactionId};
    use rust_decimal_macros::dec;

    use crate::workflow::types::TransactionType;

    pub(crate) fn pending_transaction() -> Transaction {
        let now = Utc::now();
        Transaction {
            id: TransactionId::new(),
            company_id: CompanyId::new(),
            transaction_type: TransactionType::Expense,
            amount: dec!(30),
            currency: "USD".into(),
            description: "Team lunch".into(),
            from_account_id: Some(AccountId::new()),
            to_account_id: None,
            category_id: None,
            status: TransactionStatus::Pending,
            created_by_id: UserId::new(),
            created_by_name: "Emma".into(),
            approved_by_id: None,
            approved_by_name: None,
            rejection_reason: None,
            transaction_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            created_at: now,
            updated_at: now,
            approved_at: None,
        }
    }

    #[test]
    fn test_approve_from_pending() {
        let tx = pending_transaction();
        let approver = UserId::new();
        let now = Utc::now();

        let transition = WorkflowService::approve(&tx, approver, "Hank", now).unwrap();

        assert_eq!(transition.to, TransactionStatus::Approved);
        assert_eq!(transition.transaction_id, tx.id);
        assert_eq!(transition.company_id, tx.company_id);
        assert_eq!(transition.decided_by_id, approver);
        assert_eq!(transition.decided_by_name, "Hank");
        assert_eq!(transition.decided_at, now);
        assert!(transition.rejection_reason.is_none());
    }

    #[test]
    fn test_reject_keeps_trimmed_reason() {
        let tx = pending_transaction();
        let transition = WorkflowService::reject(
            &tx,
            UserId::new(),
            "Hank",
            Some("  missing receipt ".into()),
            Utc::now(),
        )
        .unwrap();

        assert_eq!(transition.to, TransactionStatus::Rejected);
        assert_eq!(transition.rejection_reason.as_deref(), Some("missing receipt"));
    }

    #[test]
    fn test_reject_drops_blank_reason() {
        let tx = pending_transaction();
        let transition =
            WorkflowService::reject(&tx, UserId::new(), "Hank", Some("   ".into()), Utc::now())
                .unwrap();
        assert!(transition.rejection_reason.is_none());
    }

    #[test]
    fn test_approve_twice_fails() {
        let mut tx = pending_transaction();
        tx.status = TransactionStatus::Approved;

        let err = WorkflowService::approve(&tx, UserId::new(), "Hank", Utc::now()).unwrap_err();
        assert_eq!(
            err,
            WorkflowError::InvalidTransition {
                from: TransactionStatus::Approved,
                to: TransactionStatus::Approved,
            }
        );
    }

    #[test]
    fn test_reject_after_reject_fails() {
        let mut tx = pending_transaction();
        tx.status = TransactionStatus::Rejected;
        assert!(WorkflowService::reject(&tx, UserId::new(), "Hank", None, Utc::now()).is_err());
    }

    #[test]
    fn test_valid_transitions() {
        use TransactionStatus::{Approved, Pending, Rejected};

        assert!(WorkflowService::is_valid_transition(Pending, Approved));
        assert!(WorkflowService::is_valid_transition(Pending, Rejected));
        assert!(!WorkflowService::is_valid_transition(Pending, Pending));
        assert!(!WorkflowService::is_valid_transition(Approved, Rejected));
        assert!(!WorkflowService::is_valid_transition(Rejected, Approved));
        assert!(!WorkflowService::is_valid_transition(Approved, Pending));
    }
}
