//! Budget spending accumulation.

use chrono::{DateTime, Utc};
use ledgerly_shared::types::{CategoryId, CompanyId};
use rust_decimal::Decimal;
use tracing::debug;

use crate::store::{StoreResult, UnitOfWork};

/// Adds approved expense amounts to the category's budgets.
///
/// Every active budget of the category accumulates, whatever its period
/// window, and being over the limit never blocks anything.
pub struct BudgetTracker;

impl BudgetTracker {
    /// Adds `amount` to `spent` of each active budget of `category_id`.
    ///
    /// Returns how many budgets were touched; zero is not an error.
    ///
    /// # Errors
    ///
    /// Propagates store failures; the caller's unit of work then rolls back.
    pub async fn record_spending(
        uow: &mut dyn UnitOfWork,
        company_id: CompanyId,
        category_id: CategoryId,
        amount: Decimal,
        now: DateTime<Utc>,
    ) -> StoreResult<u64> {
        let touched = uow
            .add_budget_spent(company_id, category_id, amount, now)
            .await?;
        debug!(%company_id, %category_id, %amount, touched, "Budget spending recorded");
        Ok(touched)
    }
}
