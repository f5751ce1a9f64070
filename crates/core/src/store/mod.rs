//! Persistence gateway.
//!
//! [`EntityStore`] is the only way services read and write entities. Every
//! lookup and write is keyed by company; a row in another company is reported
//! as absent. Balances and budget totals are not part of any patch: they change
//! only through a [`UnitOfWork`].

pub mod error;
pub mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use ledgerly_shared::types::{
    AccountId, BudgetId, CategoryId, CompanyId, PageRequest, TransactionId, UserId,
};
use rust_decimal::Decimal;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;

use crate::audit::AuditLog;
use crate::auth::Role;
use crate::budget::{Budget, BudgetPatch};
use crate::category::{Category, CategoryPatch};
use crate::ledger::{Account, AccountPatch};
use crate::user::{Company, User, VerificationUpdate};
use crate::workflow::{StatusTransition, Transaction, TransactionFilter, TransactionPatch};

/// Company-scoped persistence for every collection.
#[async_trait]
pub trait EntityStore: Send + Sync {
    // ---- companies & users ----

    /// Inserts a company.
    async fn insert_company(&self, company: &Company) -> StoreResult<()>;

    /// Inserts a user.
    async fn insert_user(&self, user: &User) -> StoreResult<()>;

    /// Finds a user by id, in any company. Used to resolve the acting user.
    async fn find_user(&self, id: UserId) -> StoreResult<Option<User>>;

    /// Finds a user by email (case-insensitive).
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    /// Changes a user's role. Returns `false` when no such user is in the company.
    async fn update_user_role(
        &self,
        company_id: CompanyId,
        id: UserId,
        role: Role,
        now: DateTime<Utc>,
    ) -> StoreResult<bool>;

    /// Applies a verification state change.
    async fn update_user_verification(
        &self,
        id: UserId,
        update: &VerificationUpdate,
        now: DateTime<Utc>,
    ) -> StoreResult<bool>;

    // ---- accounts ----

    /// Inserts an account.
    async fn insert_account(&self, account: &Account) -> StoreResult<()>;

    /// Finds an account in the company.
    async fn find_account(&self, company_id: CompanyId, id: AccountId)
    -> StoreResult<Option<Account>>;

    /// Active accounts of the company, by name.
    async fn list_accounts(&self, company_id: CompanyId) -> StoreResult<Vec<Account>>;

    /// Patches an account. Returns `false` when nothing matched.
    async fn update_account(
        &self,
        company_id: CompanyId,
        id: AccountId,
        patch: &AccountPatch,
        now: DateTime<Utc>,
    ) -> StoreResult<bool>;

    // ---- categories ----

    /// Inserts a category.
    async fn insert_category(&self, category: &Category) -> StoreResult<()>;

    /// Finds a category in the company.
    async fn find_category(
        &self,
        company_id: CompanyId,
        id: CategoryId,
    ) -> StoreResult<Option<Category>>;

    /// Active categories of the company, by name.
    async fn list_categories(&self, company_id: CompanyId) -> StoreResult<Vec<Category>>;

    /// Patches a category. Returns `false` when nothing matched.
    async fn update_category(
        &self,
        company_id: CompanyId,
        id: CategoryId,
        patch: &CategoryPatch,
        now: DateTime<Utc>,
    ) -> StoreResult<bool>;

    // ---- budgets ----

    /// Inserts a budget.
    async fn insert_budget(&self, budget: &Budget) -> StoreResult<()>;

    /// Finds a budget in the company.
    async fn find_budget(&self, company_id: CompanyId, id: BudgetId) -> StoreResult<Option<Budget>>;

    /// Active budgets of the company, by name.
    async fn list_budgets(&self, company_id: CompanyId) -> StoreResult<Vec<Budget>>;

    /// Patches a budget. Returns `false` when nothing matched.
    async fn update_budget(
        &self,
        company_id: CompanyId,
        id: BudgetId,
        patch: &BudgetPatch,
        now: DateTime<Utc>,
    ) -> StoreResult<bool>;

    // ---- transactions ----

    /// Inserts a transaction.
    async fn insert_transaction(&self, transaction: &Transaction) -> StoreResult<()>;

    /// Finds a transaction in the company.
    async fn find_transaction(
        &self,
        company_id: CompanyId,
        id: TransactionId,
    ) -> StoreResult<Option<Transaction>>;

    /// Transactions of the company, newest first.
    async fn list_transactions(
        &self,
        company_id: CompanyId,
        filter: TransactionFilter,
    ) -> StoreResult<Vec<Transaction>>;

    /// Patches a transaction. Returns `false` when nothing matched.
    async fn update_transaction(
        &self,
        company_id: CompanyId,
        id: TransactionId,
        patch: &TransactionPatch,
        now: DateTime<Utc>,
    ) -> StoreResult<bool>;

    /// Hard-deletes a transaction. Returns `false` when nothing matched.
    async fn delete_transaction(&self, company_id: CompanyId, id: TransactionId)
    -> StoreResult<bool>;

    // ---- audit (append-only) ----

    /// Appends an audit entry.
    async fn append_audit(&self, entry: &AuditLog) -> StoreResult<()>;

    /// A page of the company's audit trail, newest first, plus the total count.
    async fn list_audit(
        &self,
        company_id: CompanyId,
        page: PageRequest,
    ) -> StoreResult<(Vec<AuditLog>, u64)>;

    // ---- unit of work ----

    /// Opens a unit of work for a status transition and its ledger effects.
    async fn begin(&self) -> StoreResult<Box<dyn UnitOfWork>>;
}

/// An atomic group of writes. Dropping it without [`commit`](Self::commit)
/// discards every write.
#[async_trait]
pub trait UnitOfWork: Send {
    /// Moves a transaction out of `pending` with a single conditional write.
    ///
    /// Returns the updated transaction, or `None` when the row is absent from the
    /// company or is no longer pending.
    async fn transition_transaction(
        &mut self,
        transition: &StatusTransition,
    ) -> StoreResult<Option<Transaction>>;

    /// Adds `delta` (possibly negative) to an account balance. Returns rows touched.
    async fn adjust_account_balance(
        &mut self,
        company_id: CompanyId,
        account_id: AccountId,
        delta: Decimal,
        now: DateTime<Utc>,
    ) -> StoreResult<u64>;

    /// Adds `amount` to `spent` of every active budget of the category. Returns rows touched.
    async fn add_budget_spent(
        &mut self,
        company_id: CompanyId,
        category_id: CategoryId,
        amount: Decimal,
        now: DateTime<Utc>,
    ) -> StoreResult<u64>;

    /// Makes every write visible.
    async fn commit(self: Box<Self>) -> StoreResult<()>;
}
