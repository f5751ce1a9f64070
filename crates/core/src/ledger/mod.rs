//! Accounts and the balance effects of approved transactions.
//!
//! - `account` - account types and the credit/debit domain rules
//! - `updater` - balance deltas applied when a transaction is approved
//! - `service` - account management

pub mod account;
pub mod error;
pub mod service;
pub mod updater;

pub use account::{ACCOUNT_TYPES, Account, AccountPatch, AccountType, NewAccount};
pub use error::LedgerError;
pub use service::AccountService;
pub use updater::{BalanceDelta, LedgerUpdater};
