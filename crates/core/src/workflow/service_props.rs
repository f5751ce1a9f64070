//! Property-based tests for WorkflowService.

use chrono::Utc;
use ledgerly_shared::types::UserId;
use proptest::prelude::*;
use uuid::Uuid;

use crate::workflow::error::WorkflowError;
use crate::workflow::service::WorkflowService;
use crate::workflow::service::tests::pending_transaction;
use crate::workflow::types::TransactionStatus;

/// Strategy for generating random TransactionStatus values.
fn arb_status() -> impl Strategy<Value = TransactionStatus> {
    prop_oneof![
        Just(TransactionStatus::Pending),
        Just(TransactionStatus::Approved),
        Just(TransactionStatus::Rejected),
    ]
}

/// Strategy for generating random user IDs.
fn arb_user_id() -> impl Strategy<Value = UserId> {
    any::<u128>().prop_map(|n| UserId::from_uuid(Uuid::from_u128(n)))
}

fn arb_reason() -> impl Strategy<Value = Option<String>> {
    prop_oneof![Just(None), "[a-zA-Z0-9 ]{0,60}".prop_map(Some)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Approve succeeds exactly when the transaction is pending.
    #[test]
    fn prop_approve_only_from_pending(status in arb_status(), user in arb_user_id()) {
        let mut tx = pending_transaction();
        tx.status = status;

        let result = WorkflowService::approve(&tx, user, "Approver", Utc::now());
        if status == TransactionStatus::Pending {
            let transition = result.unwrap();
            prop_assert_eq!(transition.to, TransactionStatus::Approved);
            prop_assert_eq!(transition.decided_by_id, user);
        } else {
            let is_invalid_transition = matches!(result, Err(WorkflowError::InvalidTransition { .. }));
            prop_assert!(is_invalid_transition);
        }
    }

    /// Reject succeeds exactly when the transaction is pending, whatever the reason.
    #[test]
    fn prop_reject_only_from_pending(
        status in arb_status(),
        user in arb_user_id(),
        reason in arb_reason(),
    ) {
        let mut tx = pending_transaction();
        tx.status = status;

        let result = WorkflowService::reject(&tx, user, "Approver", reason, Utc::now());
        prop_assert_eq!(result.is_ok(), status == TransactionStatus::Pending);
        if let Ok(transition) = result {
            prop_assert_eq!(transition.to, TransactionStatus::Rejected);
            if let Some(kept) = transition.rejection_reason {
                prop_assert!(!kept.is_empty());
                prop_assert_eq!(kept.trim(), kept.as_str());
            }
        }
    }

    /// Terminal states have no outgoing transitions.
    #[test]
    fn prop_terminal_states_are_final(from in arb_status(), to in arb_status()) {
        if from.is_terminal() {
            prop_assert!(!WorkflowService::is_valid_transition(from, to));
        }
    }

    /// No transition targets pending.
    #[test]
    fn prop_never_back_to_pending(from in arb_status()) {
        prop_assert!(!WorkflowService::is_valid_transition(from, TransactionStatus::Pending));
    }
}
