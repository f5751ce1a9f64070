//! Entity aliases.

pub use super::accounts::Entity as Accounts;
pub use super::audit_logs::Entity as AuditLogs;
pub use super::budgets::Entity as Budgets;
pub use super::categories::Entity as Categories;
pub use super::companies::Entity as Companies;
pub use super::transactions::Entity as Transactions;
pub use super::users::Entity as Users;
