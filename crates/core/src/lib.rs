//! Core business logic for Ledgerly.
//!
//! This crate contains the business rules with ZERO web or database dependencies.
//! Persistence goes through the [`store::EntityStore`] trait; the in-memory
//! implementation backs the tests.
//!
//! # Modules
//!
//! - `auth` - Role hierarchy, tab visibility, the acting user, email verification
//! - `workflow` - Transaction state machine and lifecycle
//! - `ledger` - Accounts and balance effects of approvals
//! - `budget` - Budgets and spending accumulation
//! - `category` - Transaction categories and company defaults
//! - `audit` - Append-only audit trail
//! - `user` - Companies, users and role changes
//! - `store` - Persistence gateway and unit of work

pub mod audit;
pub mod auth;
pub mod budget;
pub mod category;
pub mod clock;
pub mod context;
pub mod ledger;
pub mod store;
pub mod user;
pub mod workflow;

mod validate;

pub use context::ServiceContext;
