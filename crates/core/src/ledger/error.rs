//! Ledger error types.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised by account balance operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// Amount must be strictly positive.
    #[error("Amount must be positive, got {0}")]
    NonPositiveAmount(Decimal),

    /// A debit would take the balance below zero.
    #[error("Insufficient balance: available {balance}, requested {amount}")]
    InsufficientBalance {
        /// Current balance.
        balance: Decimal,
        /// Requested debit.
        amount: Decimal,
    },
}
