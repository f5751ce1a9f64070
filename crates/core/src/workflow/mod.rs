//! Transaction workflow.
//!
//! # Modules
//!
//! - `types` - transaction domain types and the status state machine values
//! - `error` - workflow-specific error types
//! - `service` - pure state transition rules
//! - `lifecycle` - the operations, wired to the store, ledger, budgets and audit

pub mod error;
pub mod lifecycle;
pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use error::WorkflowError;
pub use lifecycle::TransactionLifecycle;
pub use service::WorkflowService;
pub use types::{
    DEFAULT_CURRENCY, NewTransaction, StatusTransition, Transaction, TransactionFilter,
    TransactionPatch, TransactionStatus, TransactionType,
};
