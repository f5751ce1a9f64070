//! In-process [`EntityStore`].
//!
//! Backs the test suites and local runs without a database. A unit of work
//! holds the state lock for its whole lifetime and writes a staged copy back
//! on commit, so concurrent units serialize and an uncommitted unit leaves no
//! trace.

use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use ledgerly_shared::types::{
    AccountId, BudgetId, CategoryId, CompanyId, PageRequest, TransactionId, UserId,
};
use rust_decimal::Decimal;
use tokio::sync::{Mutex, OwnedMutexGuard};

use super::{EntityStore, StoreError, StoreResult, UnitOfWork};
use crate::audit::AuditLog;
use crate::auth::Role;
use crate::budget::{Budget, BudgetPatch};
use crate::category::{Category, CategoryPatch};
use crate::ledger::{Account, AccountPatch};
use crate::user::{Company, User, VerificationUpdate};
use crate::workflow::{
    StatusTransition, Transaction, TransactionFilter, TransactionPatch, TransactionStatus,
};

#[derive(Debug, Clone, Default)]
struct MemoryState {
    companies: HashMap<CompanyId, Company>,
    users: HashMap<UserId, User>,
    accounts: HashMap<AccountId, Account>,
    categories: HashMap<CategoryId, Category>,
    budgets: HashMap<BudgetId, Budget>,
    transactions: HashMap<TransactionId, Transaction>,
    audit_logs: Vec<AuditLog>,
}

/// In-memory store with failure injection for audit writes.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
    fail_audit: Arc<AtomicBool>,
    audit_attempts: Arc<AtomicUsize>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent audit append fail (or succeed again).
    pub fn fail_audit_writes(&self, fail: bool) {
        self.fail_audit.store(fail, Ordering::SeqCst);
    }

    /// Number of audit appends attempted, including failed ones.
    #[must_use]
    pub fn audit_attempts(&self) -> usize {
        self.audit_attempts.load(Ordering::SeqCst)
    }
}

fn insert_unique<K, V>(map: &mut HashMap<K, V>, key: K, value: V, table: &'static str) -> StoreResult<()>
where
    K: std::hash::Hash + Eq,
{
    if map.contains_key(&key) {
        return Err(StoreError::Duplicate(table));
    }
    map.insert(key, value);
    Ok(())
}

#[async_trait]
impl EntityStore for MemoryStore {
    async fn insert_company(&self, company: &Company) -> StoreResult<()> {
        let mut state = self.state.lock().await;
        insert_unique(&mut state.companies, company.id, company.clone(), "companies")
    }

    async fn insert_user(&self, user: &User) -> StoreResult<()> {
        let mut state = self.state.lock().await;
        let email_taken = state
            .users
            .values()
            .any(|u| u.email.eq_ignore_ascii_case(&user.email));
        if email_taken {
            return Err(StoreError::Duplicate("users"));
        }
        insert_unique(&mut state.users, user.id, user.clone(), "users")
    }

    async fn find_user(&self, id: UserId) -> StoreResult<Option<User>> {
        Ok(self.state.lock().await.users.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let state = self.state.lock().await;
        Ok(state
            .users
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn update_user_role(
        &self,
        company_id: CompanyId,
        id: UserId,
        role: Role,
        now: DateTime<Utc>,
    ) -> StoreResult<bool> {
        let mut state = self.state.lock().await;
        match state.users.get_mut(&id) {
            Some(user) if user.company_id == company_id => {
                user.role = role;
                user.updated_at = now;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn update_user_verification(
        &self,
        id: UserId,
        update: &VerificationUpdate,
        now: DateTime<Utc>,
    ) -> StoreResult<bool> {
        let mut state = self.state.lock().await;
        match state.users.get_mut(&id) {
            Some(user) => {
                update.apply_to(user, now);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn insert_account(&self, account: &Account) -> StoreResult<()> {
        let mut state = self.state.lock().await;
        insert_unique(&mut state.accounts, account.id, account.clone(), "accounts")
    }

    async fn find_account(
        &self,
        company_id: CompanyId,
        id: AccountId,
    ) -> StoreResult<Option<Account>> {
        let state = self.state.lock().await;
        Ok(state
            .accounts
            .get(&id)
            .filter(|a| a.company_id == company_id)
            .cloned())
    }

    async fn list_accounts(&self, company_id: CompanyId) -> StoreResult<Vec<Account>> {
        let state = self.state.lock().await;
        let mut accounts: Vec<Account> = state
            .accounts
            .values()
            .filter(|a| a.company_id == company_id && a.is_active)
            .cloned()
            .collect();
        accounts.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(accounts)
    }

    async fn update_account(
        &self,
        company_id: CompanyId,
        id: AccountId,
        patch: &AccountPatch,
        now: DateTime<Utc>,
    ) -> StoreResult<bool> {
        let mut state = self.state.lock().await;
        match state.accounts.get_mut(&id) {
            Some(account) if account.company_id == company_id => {
                patch.apply_to(account, now);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn insert_category(&self, category: &Category) -> StoreResult<()> {
        let mut state = self.state.lock().await;
        insert_unique(
            &mut state.categories,
            category.id,
            category.clone(),
            "categories",
        )
    }

    async fn find_category(
        &self,
        company_id: CompanyId,
        id: CategoryId,
    ) -> StoreResult<Option<Category>> {
        let state = self.state.lock().await;
        Ok(state
            .categories
            .get(&id)
            .filter(|c| c.company_id == company_id)
            .cloned())
    }

    async fn list_categories(&self, company_id: CompanyId) -> StoreResult<Vec<Category>> {
        let state = self.state.lock().await;
        let mut categories: Vec<Category> = state
            .categories
            .values()
            .filter(|c| c.company_id == company_id && c.is_active)
            .cloned()
            .collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn update_category(
        &self,
        company_id: CompanyId,
        id: CategoryId,
        patch: &CategoryPatch,
        now: DateTime<Utc>,
    ) -> StoreResult<bool> {
        let mut state = self.state.lock().await;
        match state.categories.get_mut(&id) {
            Some(category) if category.company_id == company_id => {
                patch.apply_to(category, now);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn insert_budget(&self, budget: &Budget) -> StoreResult<()> {
        let mut state = self.state.lock().await;
        insert_unique(&mut state.budgets, budget.id, budget.clone(), "budgets")
    }

    async fn find_budget(&self, company_id: CompanyId, id: BudgetId) -> StoreResult<Option<Budget>> {
        let state = self.state.lock().await;
        Ok(state
            .budgets
            .get(&id)
            .filter(|b| b.company_id == company_id)
            .cloned())
    }

    async fn list_budgets(&self, company_id: CompanyId) -> StoreResult<Vec<Budget>> {
        let state = self.state.lock().await;
        let mut budgets: Vec<Budget> = state
            .budgets
            .values()
            .filter(|b| b.company_id == company_id && b.is_active)
            .cloned()
            .collect();
        budgets.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(budgets)
    }

    async fn update_budget(
        &self,
        company_id: CompanyId,
        id: BudgetId,
        patch: &BudgetPatch,
        now: DateTime<Utc>,
    ) -> StoreResult<bool> {
        let mut state = self.state.lock().await;
        match state.budgets.get_mut(&id) {
            Some(budget) if budget.company_id == company_id => {
                patch.apply_to(budget, now);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn insert_transaction(&self, transaction: &Transaction) -> StoreResult<()> {
        let mut state = self.state.lock().await;
        insert_unique(
            &mut state.transactions,
            transaction.id,
            transaction.clone(),
            "transactions",
        )
    }

    async fn find_transaction(
        &self,
        company_id: CompanyId,
        id: TransactionId,
    ) -> StoreResult<Option<Transaction>> {
        let state = self.state.lock().await;
        Ok(state
            .transactions
            .get(&id)
            .filter(|t| t.company_id == company_id)
            .cloned())
    }

    async fn list_transactions(
        &self,
        company_id: CompanyId,
        filter: TransactionFilter,
    ) -> StoreResult<Vec<Transaction>> {
        let state = self.state.lock().await;
        let mut transactions: Vec<Transaction> = state
            .transactions
            .values()
            .filter(|t| t.company_id == company_id)
            .filter(|t| filter.status.is_none_or(|s| t.status == s))
            .cloned()
            .collect();
        transactions.sort_by_key(|t| Reverse((t.created_at, t.id)));
        Ok(transactions)
    }

    async fn update_transaction(
        &self,
        company_id: CompanyId,
        id: TransactionId,
        patch: &TransactionPatch,
        now: DateTime<Utc>,
    ) -> StoreResult<bool> {
        let mut state = self.state.lock().await;
        match state.transactions.get_mut(&id) {
            Some(transaction) if transaction.company_id == company_id => {
                patch.apply_to(transaction, now);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete_transaction(
        &self,
        company_id: CompanyId,
        id: TransactionId,
    ) -> StoreResult<bool> {
        let mut state = self.state.lock().await;
        let owned = state
            .transactions
            .get(&id)
            .is_some_and(|t| t.company_id == company_id);
        if owned {
            state.transactions.remove(&id);
        }
        Ok(owned)
    }

    async fn append_audit(&self, entry: &AuditLog) -> StoreResult<()> {
        self.audit_attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail_audit.load(Ordering::SeqCst) {
            return Err(StoreError::Database("audit_logs unavailable".into()));
        }
        self.state.lock().await.audit_logs.push(entry.clone());
        Ok(())
    }

    async fn list_audit(
        &self,
        company_id: CompanyId,
        page: PageRequest,
    ) -> StoreResult<(Vec<AuditLog>, u64)> {
        let state = self.state.lock().await;
        let mut entries: Vec<&AuditLog> = state
            .audit_logs
            .iter()
            .filter(|e| e.company_id == company_id)
            .collect();
        entries.sort_by_key(|e| Reverse((e.created_at, e.id)));

        let total = entries.len() as u64;
        let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(page.limit()).unwrap_or(usize::MAX);
        let items = entries
            .into_iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect();
        Ok((items, total))
    }

    async fn begin(&self) -> StoreResult<Box<dyn UnitOfWork>> {
        let guard = Arc::clone(&self.state).lock_owned().await;
        let staged = guard.clone();
        Ok(Box::new(MemoryUnitOfWork { guard, staged }))
    }
}

/// Unit of work over [`MemoryStore`].
struct MemoryUnitOfWork {
    guard: OwnedMutexGuard<MemoryState>,
    staged: MemoryState,
}

#[async_trait]
impl UnitOfWork for MemoryUnitOfWork {
    async fn transition_transaction(
        &mut self,
        transition: &StatusTransition,
    ) -> StoreResult<Option<Transaction>> {
        let Some(transaction) = self
            .staged
            .transactions
            .get_mut(&transition.transaction_id)
            .filter(|t| t.company_id == transition.company_id)
        else {
            return Ok(None);
        };
        if transaction.status != TransactionStatus::Pending {
            return Ok(None);
        }

        transaction.status = transition.to;
        transaction.approved_by_id = Some(transition.decided_by_id);
        transaction.approved_by_name = Some(transition.decided_by_name.clone());
        transaction.approved_at = Some(transition.decided_at);
        transaction.rejection_reason.clone_from(&transition.rejection_reason);
        transaction.updated_at = transition.decided_at;
        Ok(Some(transaction.clone()))
    }

    async fn adjust_account_balance(
        &mut self,
        company_id: CompanyId,
        account_id: AccountId,
        delta: Decimal,
        now: DateTime<Utc>,
    ) -> StoreResult<u64> {
        match self.staged.accounts.get_mut(&account_id) {
            Some(account) if account.company_id == company_id => {
                account.balance += delta;
                account.updated_at = now;
                Ok(1)
            }
            _ => Ok(0),
        }
    }

    async fn add_budget_spent(
        &mut self,
        company_id: CompanyId,
        category_id: CategoryId,
        amount: Decimal,
        now: DateTime<Utc>,
    ) -> StoreResult<u64> {
        let mut touched = 0;
        for budget in self.staged.budgets.values_mut().filter(|b| {
            b.company_id == company_id && b.category_id == category_id && b.is_active
        }) {
            budget.spent += amount;
            budget.updated_at = now;
            touched += 1;
        }
        Ok(touched)
    }

    async fn commit(self: Box<Self>) -> StoreResult<()> {
        let Self { mut guard, staged } = *self;
        *guard = staged;
        Ok(())
    }
}
