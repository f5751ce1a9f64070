//! Transaction lifecycle: submission, approval, rejection and edits.
//!
//! Approval is the only path that moves money. The status change, the account
//! balance deltas and the budget accumulation commit together in one unit of
//! work, and the status change is conditional on the row still being
//! `pending`, so two racing approvals apply the effects exactly once.

use ledgerly_shared::types::{AccountId, TransactionId};
use ledgerly_shared::{AppError, AppResult};
use serde_json::json;
use tracing::{info, warn};

use crate::audit::{AuditAction, AuditEntity};
use crate::auth::{Actor, Role, can_approve, can_submit_expenses};
use crate::budget::BudgetTracker;
use crate::context::ServiceContext;
use crate::ledger::LedgerUpdater;
use crate::validate::positive;
use crate::workflow::service::WorkflowService;
use crate::workflow::types::{
    DEFAULT_CURRENCY, NewTransaction, StatusTransition, Transaction, TransactionFilter,
    TransactionPatch, TransactionStatus, TransactionType,
};

/// Orchestrates every operation on transactions.
#[derive(Debug, Clone)]
pub struct TransactionLifecycle {
    ctx: ServiceContext,
}

impl TransactionLifecycle {
    /// Creates the lifecycle service.
    #[must_use]
    pub const fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    /// Submits a new transaction in `pending` status.
    ///
    /// # Errors
    ///
    /// * `Unauthorized` for holders and unknown roles
    /// * `Validation` for a non-positive amount, a transfer into its own account,
    ///   or a referenced account/category outside the actor's company
    pub async fn create(&self, actor: &Actor, input: NewTransaction) -> AppResult<Transaction> {
        actor.require(can_submit_expenses, "create transactions")?;
        positive(input.amount, "Amount")?;
        Self::check_accounts(&input)?;
        self.check_references(actor, &input).await?;

        let now = self.ctx.now();
        let currency = input
            .currency
            .map(|c| c.trim().to_uppercase())
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| DEFAULT_CURRENCY.to_string());

        let transaction = Transaction {
            id: self.ctx.next_id(),
            company_id: actor.company_id,
            transaction_type: input.transaction_type,
            amount: input.amount,
            currency,
            description: input.description.trim().to_string(),
            from_account_id: input.from_account_id,
            to_account_id: input.to_account_id,
            category_id: input.category_id,
            status: TransactionStatus::Pending,
            created_by_id: actor.user_id,
            created_by_name: actor.name.clone(),
            approved_by_id: None,
            approved_by_name: None,
            rejection_reason: None,
            transaction_date: input.transaction_date.unwrap_or_else(|| now.date_naive()),
            created_at: now,
            updated_at: now,
            approved_at: None,
        };
        self.ctx.store.insert_transaction(&transaction).await?;

        info!(
            company_id = %transaction.company_id,
            transaction_id = %transaction.id,
            kind = %transaction.transaction_type,
            amount = %transaction.amount,
            "Transaction submitted"
        );
        self.audit(
            AuditAction::Create,
            &transaction,
            actor,
            Some(json!({
                "type": transaction.transaction_type.as_str(),
                "amount": transaction.amount,
                "description": transaction.description,
            })),
        )
        .await;
        Ok(transaction)
    }

    /// Transactions of the actor's company, newest first.
    ///
    /// # Errors
    ///
    /// `Internal` on store failure.
    pub async fn list(&self, actor: &Actor, filter: TransactionFilter) -> AppResult<Vec<Transaction>> {
        actor.require_level(Role::Employee.level(), "view transactions")?;
        Ok(self
            .ctx
            .store
            .list_transactions(actor.company_id, filter)
            .await?)
    }

    /// One transaction of the actor's company.
    ///
    /// # Errors
    ///
    /// `NotFound` when absent or in another company.
    pub async fn get(&self, actor: &Actor, id: TransactionId) -> AppResult<Transaction> {
        actor.require_level(Role::Employee.level(), "view transactions")?;
        self.find(actor, id).await
    }

    /// Approves a pending transaction and applies its ledger effects.
    ///
    /// # Errors
    ///
    /// * `Unauthorized` below holder
    /// * `NotFound` when absent or in another company
    /// * `InvalidState` when the transaction is no longer pending, including
    ///   when a concurrent decision won the race
    pub async fn approve(&self, actor: &Actor, id: TransactionId) -> AppResult<Transaction> {
        actor.require(can_approve, "approve transactions")?;
        let current = self.find(actor, id).await?;
        let transition = WorkflowService::approve(&current, actor.user_id, &actor.name, self.ctx.now())?;

        let approved = self.decide(&transition, true).await?;

        info!(
            company_id = %approved.company_id,
            transaction_id = %approved.id,
            approved_by = %actor.user_id,
            amount = %approved.amount,
            "Transaction approved"
        );
        self.audit(
            AuditAction::Approve,
            &approved,
            actor,
            Some(json!({
                "amount": approved.amount,
                "type": approved.transaction_type.as_str(),
            })),
        )
        .await;
        Ok(approved)
    }

    /// Rejects a pending transaction. No balance or budget changes.
    ///
    /// # Errors
    ///
    /// Same as [`approve`](Self::approve).
    pub async fn reject(
        &self,
        actor: &Actor,
        id: TransactionId,
        reason: Option<String>,
    ) -> AppResult<Transaction> {
        actor.require(can_approve, "reject transactions")?;
        let current = self.find(actor, id).await?;
        let transition =
            WorkflowService::reject(&current, actor.user_id, &actor.name, reason, self.ctx.now())?;

        let rejected = self.decide(&transition, false).await?;

        info!(
            company_id = %rejected.company_id,
            transaction_id = %rejected.id,
            rejected_by = %actor.user_id,
            "Transaction rejected"
        );
        self.audit(
            AuditAction::Reject,
            &rejected,
            actor,
            Some(json!({
                "amount": rejected.amount,
                "reason": rejected.rejection_reason,
            })),
        )
        .await;
        Ok(rejected)
    }

    /// Edits description, amount or date. Ledger effects are never re-run,
    /// even when the transaction is already approved.
    ///
    /// # Errors
    ///
    /// `Validation` for an empty patch or a non-positive amount; `NotFound`
    /// outside the company.
    pub async fn update(
        &self,
        actor: &Actor,
        id: TransactionId,
        mut patch: TransactionPatch,
    ) -> AppResult<Transaction> {
        actor.require_level(Role::Employee.level(), "update transactions")?;
        if patch.is_empty() {
            return Err(AppError::Validation("No fields to update".into()));
        }
        if let Some(amount) = patch.amount {
            positive(amount, "Amount")?;
        }
        patch.description = patch.description.map(|d| d.trim().to_string());

        let store = &self.ctx.store;
        if !store
            .update_transaction(actor.company_id, id, &patch, self.ctx.now())
            .await?
        {
            return Err(AppError::not_found("Transaction"));
        }
        let updated = self.find(actor, id).await?;
        if updated.status.is_terminal() {
            warn!(
                transaction_id = %id,
                status = %updated.status,
                "Decided transaction edited; ledger effects left as applied"
            );
        }

        self.audit(
            AuditAction::Update,
            &updated,
            actor,
            Some(json!({
                "description": updated.description,
                "amount": updated.amount,
            })),
        )
        .await;
        Ok(updated)
    }

    /// Hard-deletes a transaction. Applied ledger effects stay.
    ///
    /// # Errors
    ///
    /// `NotFound` outside the company.
    pub async fn delete(&self, actor: &Actor, id: TransactionId) -> AppResult<()> {
        actor.require_level(Role::Employee.level(), "delete transactions")?;
        let existing = self.find(actor, id).await?;
        if !self.ctx.store.delete_transaction(actor.company_id, id).await? {
            return Err(AppError::not_found("Transaction"));
        }

        info!(company_id = %actor.company_id, transaction_id = %id, "Transaction deleted");
        self.audit(AuditAction::Delete, &existing, actor, None).await;
        Ok(())
    }

    /// Applies the transition and, for approvals, its effects, atomically.
    async fn decide(&self, transition: &StatusTransition, apply_effects: bool) -> AppResult<Transaction> {
        let mut uow = self.ctx.store.begin().await?;
        let Some(decided) = uow.transition_transaction(transition).await? else {
            return Err(AppError::InvalidState(
                "Transaction is no longer pending".into(),
            ));
        };

        if apply_effects {
            let now = transition.decided_at;
            LedgerUpdater::apply(uow.as_mut(), &decided, now).await?;
            if decided.transaction_type == TransactionType::Expense {
                if let Some(category_id) = decided.category_id {
                    BudgetTracker::record_spending(
                        uow.as_mut(),
                        decided.company_id,
                        category_id,
                        decided.amount,
                        now,
                    )
                    .await?;
                }
            }
        }

        uow.commit().await?;
        Ok(decided)
    }

    async fn find(&self, actor: &Actor, id: TransactionId) -> AppResult<Transaction> {
        self.ctx
            .store
            .find_transaction(actor.company_id, id)
            .await?
            .ok_or_else(|| AppError::not_found("Transaction"))
    }

    fn check_accounts(input: &NewTransaction) -> AppResult<()> {
        let same_account =
            input.from_account_id.is_some() && input.from_account_id == input.to_account_id;
        if input.transaction_type == TransactionType::Transfer && same_account {
            return Err(AppError::Validation("Transfer accounts must differ".into()));
        }
        Ok(())
    }

    async fn check_references(&self, actor: &Actor, input: &NewTransaction) -> AppResult<()> {
        for account_id in [input.from_account_id, input.to_account_id].into_iter().flatten() {
            self.check_account(actor, account_id).await?;
        }
        if let Some(category_id) = input.category_id {
            let category = self
                .ctx
                .store
                .find_category(actor.company_id, category_id)
                .await?;
            if !category.is_some_and(|c| c.is_active) {
                return Err(AppError::Validation("Category not found".into()));
            }
        }
        Ok(())
    }

    async fn check_account(&self, actor: &Actor, account_id: AccountId) -> AppResult<()> {
        let account = self
            .ctx
            .store
            .find_account(actor.company_id, account_id)
            .await?;
        if account.is_some_and(|a| a.is_active) {
            Ok(())
        } else {
            Err(AppError::Validation(format!("Account {account_id} not found")))
        }
    }

    async fn audit(
        &self,
        action: AuditAction,
        transaction: &Transaction,
        actor: &Actor,
        changes: Option<serde_json::Value>,
    ) {
        self.ctx
            .audit()
            .record(
                action,
                AuditEntity::Transaction,
                Some(transaction.id.into_inner()),
                actor,
                changes,
            )
            .await;
    }
}

