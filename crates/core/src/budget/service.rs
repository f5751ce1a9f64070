//! Budget management.

use ledgerly_shared::types::BudgetId;
use ledgerly_shared::{AppError, AppResult};
use rust_decimal::Decimal;
use serde_json::json;
use tracing::info;

use crate::audit::{AuditAction, AuditEntity};
use crate::auth::{Actor, Role, can_manage_budgets};
use crate::budget::types::{Budget, BudgetPatch, BudgetStatus, NewBudget};
use crate::context::ServiceContext;
use crate::validate::{non_empty, non_empty_opt, positive};
use crate::workflow::DEFAULT_CURRENCY;

/// Create, list, edit and deactivate budgets.
#[derive(Debug, Clone)]
pub struct BudgetService {
    ctx: ServiceContext,
}

impl BudgetService {
    /// Creates the service.
    #[must_use]
    pub const fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    /// Creates a budget for the period containing today.
    ///
    /// # Errors
    ///
    /// `Unauthorized` below admin; `Validation` for a blank name, a
    /// non-positive amount, or a category outside the company.
    pub async fn create(&self, actor: &Actor, input: NewBudget) -> AppResult<Budget> {
        actor.require(can_manage_budgets, "manage budgets")?;
        let name = non_empty(&input.name, "Name")?;
        positive(input.amount, "Amount")?;

        let category = self
            .ctx
            .store
            .find_category(actor.company_id, input.category_id)
            .await?;
        if !category.is_some_and(|c| c.is_active) {
            return Err(AppError::Validation("Category not found".into()));
        }

        let now = self.ctx.now();
        let (start_date, end_date) = input
            .period
            .bounds(now.date_naive())
            .ok_or_else(|| AppError::Validation("Budget period out of range".into()))?;
        let currency = input
            .currency
            .map(|c| c.trim().to_uppercase())
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| DEFAULT_CURRENCY.to_string());

        let budget = Budget {
            id: self.ctx.next_id(),
            company_id: actor.company_id,
            category_id: input.category_id,
            name,
            amount: input.amount,
            spent: Decimal::ZERO,
            currency,
            period: input.period,
            start_date,
            end_date,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        self.ctx.store.insert_budget(&budget).await?;

        info!(
            company_id = %budget.company_id,
            budget_id = %budget.id,
            category_id = %budget.category_id,
            "Budget created"
        );
        self.ctx
            .audit()
            .record(
                AuditAction::Create,
                AuditEntity::Budget,
                Some(budget.id.into_inner()),
                actor,
                Some(json!({
                    "name": budget.name,
                    "amount": budget.amount,
                    "period": budget.period.as_str(),
                })),
            )
            .await;
        Ok(budget)
    }

    /// Active budgets with remaining, utilization and over-budget figures.
    ///
    /// # Errors
    ///
    /// `Internal` on store failure.
    pub async fn list(&self, actor: &Actor) -> AppResult<Vec<BudgetStatus>> {
        actor.require_level(Role::Employee.level(), "view budgets")?;
        let budgets = self.ctx.store.list_budgets(actor.company_id).await?;
        Ok(budgets.into_iter().map(BudgetStatus::from).collect())
    }

    /// Edits name or limit. `spent` is never touched here.
    ///
    /// # Errors
    ///
    /// `Unauthorized` below admin; `Validation` for a blank name or a
    /// non-positive amount; `NotFound` outside the company.
    pub async fn update(
        &self,
        actor: &Actor,
        id: BudgetId,
        mut patch: BudgetPatch,
    ) -> AppResult<Budget> {
        actor.require(can_manage_budgets, "manage budgets")?;
        patch.name = non_empty_opt(patch.name.as_ref(), "Name")?;
        if let Some(amount) = patch.amount {
            positive(amount, "Amount")?;
        }
        patch.is_active = None;

        let budget = self.write(actor, id, &patch).await?;
        self.ctx
            .audit()
            .record(
                AuditAction::Update,
                AuditEntity::Budget,
                Some(id.into_inner()),
                actor,
                Some(json!({ "name": budget.name, "amount": budget.amount })),
            )
            .await;
        Ok(budget)
    }

    /// Soft-deletes a budget.
    ///
    /// # Errors
    ///
    /// `Unauthorized` below admin; `NotFound` outside the company.
    pub async fn delete(&self, actor: &Actor, id: BudgetId) -> AppResult<()> {
        actor.require(can_manage_budgets, "manage budgets")?;
        self.write(actor, id, &BudgetPatch::deactivate()).await?;
        self.ctx
            .audit()
            .record(
                AuditAction::Delete,
                AuditEntity::Budget,
                Some(id.into_inner()),
                actor,
                None,
            )
            .await;
        Ok(())
    }

    async fn write(&self, actor: &Actor, id: BudgetId, patch: &BudgetPatch) -> AppResult<Budget> {
        let store = &self.ctx.store;
        if !store
            .update_budget(actor.company_id, id, patch, self.ctx.now())
            .await?
        {
            return Err(AppError::not_found("Budget"));
        }
        store
            .find_budget(actor.company_id, id)
            .await?
            .ok_or_else(|| AppError::not_found("Budget"))
    }
}
