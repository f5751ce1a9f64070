//! `SeaORM` entity definitions.

pub mod prelude;

pub mod accounts;
pub mod audit_logs;
pub mod budgets;
pub mod categories;
pub mod companies;
pub mod transactions;
pub mod users;
