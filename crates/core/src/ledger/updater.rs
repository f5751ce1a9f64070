//! Balance effects of an approved transaction.

use chrono::{DateTime, Utc};
use ledgerly_shared::types::{AccountId, CompanyId};
use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::store::{StoreResult, UnitOfWork};
use crate::workflow::{Transaction, TransactionType};

/// One additive balance change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BalanceDelta {
    /// Account to adjust.
    pub account_id: AccountId,
    /// Signed change.
    pub delta: Decimal,
}

/// Applies approved transactions to account balances.
///
/// No overdraft check: balances may go negative. A referenced account that
/// no longer exists is skipped.
pub struct LedgerUpdater;

impl LedgerUpdater {
    /// The balance changes an approved transaction implies.
    ///
    /// - income: `+amount` on the to-account
    /// - expense: `-amount` on the from-account
    /// - transfer: `-amount` on the from-account, `+amount` on the to-account
    #[must_use]
    pub fn deltas(transaction: &Transaction) -> Vec<BalanceDelta> {
        let amount = transaction.amount;
        let outgoing = transaction.from_account_id.map(|account_id| BalanceDelta {
            account_id,
            delta: -amount,
        });
        let incoming = transaction.to_account_id.map(|account_id| BalanceDelta {
            account_id,
            delta: amount,
        });

        match transaction.transaction_type {
            TransactionType::Income => incoming.into_iter().collect(),
            TransactionType::Expense => outgoing.into_iter().collect(),
            TransactionType::Transfer => outgoing.into_iter().chain(incoming).collect(),
        }
    }

    /// Writes the deltas of `transaction` inside `uow`.
    ///
    /// # Errors
    ///
    /// Propagates store failures; the caller's unit of work then rolls back.
    pub async fn apply(
        uow: &mut dyn UnitOfWork,
        transaction: &Transaction,
        now: DateTime<Utc>,
    ) -> StoreResult<()> {
        for BalanceDelta { account_id, delta } in Self::deltas(transaction) {
            Self::adjust(uow, transaction.company_id, account_id, delta, now).await?;
        }
        Ok(())
    }

    async fn adjust(
        uow: &mut dyn UnitOfWork,
        company_id: CompanyId,
        account_id: AccountId,
        delta: Decimal,
        now: DateTime<Utc>,
    ) -> StoreResult<()> {
        let rows = uow
            .adjust_account_balance(company_id, account_id, delta, now)
            .await?;
        if rows == 0 {
            warn!(%company_id, %account_id, "Account missing, balance change skipped");
        } else {
            debug!(%company_id, %account_id, %delta, "Account balance adjusted");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    use crate::workflow::service::tests::pending_transaction;

    #[test]
    fn test_income_credits_to_account() {
        let mut tx = pending_transaction();
        tx.transaction_type = TransactionType::Income;
        tx.amount = dec!(500);
        tx.from_account_id = None;
        tx.to_account_id = Some(AccountId::new());

        let deltas = LedgerUpdater::deltas(&tx);
        assert_eq!(
            deltas,
            vec![BalanceDelta {
                account_id: tx.to_account_id.unwrap(),
                delta: dec!(500),
            }]
        );
    }

    #[test]
    fn test_expense_debits_from_account() {
        let mut tx = pending_transaction();
        tx.amount = dec!(75);
        let deltas = LedgerUpdater::deltas(&tx);
        assert_eq!(deltas.len(), 1);
        assert_eq!(deltas[0].account_id, tx.from_account_id.unwrap());
        assert_eq!(deltas[0].delta, dec!(-75));
    }

    #[test]
    fn test_transfer_moves_between_accounts() {
        let mut tx = pending_transaction();
        tx.transaction_type = TransactionType::Transfer;
        tx.amount = dec!(40.25);
        tx.to_account_id = Some(AccountId::new());

        let deltas = LedgerUpdater::deltas(&tx);
        assert_eq!(deltas.len(), 2);
        assert_eq!(deltas[0].delta, dec!(-40.25));
        assert_eq!(deltas[1].delta, dec!(40.25));
        assert_eq!(deltas.iter().map(|d| d.delta).sum::<Decimal>(), Decimal::ZERO);
    }

    #[test]
    fn test_ignores_account_unused_by_type() {
        let mut tx = pending_transaction();
        tx.to_account_id = Some(AccountId::new());
        let deltas = LedgerUpdater::deltas(&tx);
        assert_eq!(deltas.len(), 1);
        assert_eq!(deltas[0].account_id, tx.from_account_id.unwrap());
    }
}
