//! Budgets and spending against them.

pub mod service;
pub mod tracker;
pub mod types;


pub use service::BudgetService;
pub use tracker::BudgetTracker;
pub use types::{Budget, BudgetPatch, BudgetPeriod, BudgetStatus, NewBudget};
