//! PostgreSQL implementation of the entity store.
//!
//! Patches become single `UPDATE ... WHERE id = $1 AND company_id = $2`
//! statements, so a row in another company is never touched. The unit of work
//! wraps a database transaction; the status change is an
//! `UPDATE ... WHERE status = 'pending' RETURNING *`, and balance and budget
//! changes are in-place increments.

mod convert;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use ledgerly_core::audit::AuditLog;
use ledgerly_core::auth::Role;
use ledgerly_core::budget::{Budget, BudgetPatch};
use ledgerly_core::category::{Category, CategoryPatch};
use ledgerly_core::ledger::{Account, AccountPatch};
use ledgerly_core::store::{EntityStore, StoreResult, UnitOfWork};
use ledgerly_core::user::{Company, User, VerificationUpdate};
use ledgerly_core::workflow::{
    StatusTransition, Transaction, TransactionFilter, TransactionPatch, TransactionStatus,
};
use ledgerly_shared::types::{
    AccountId, BudgetId, CategoryId, CompanyId, PageRequest, TransactionId, UserId,
};
use rust_decimal::Decimal;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
};
use tracing::debug;

use crate::entities::{accounts, audit_logs, budgets, categories, companies, transactions, users};
use convert::{db_err, offset};

/// Entity store backed by a `SeaORM` connection pool.
#[derive(Debug, Clone)]
pub struct SeaOrmStore {
    db: DatabaseConnection,
}

impl SeaOrmStore {
    /// Wraps an open connection.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// The underlying connection.
    #[must_use]
    pub const fn connection(&self) -> &DatabaseConnection {
        &self.db
    }
}

#[async_trait]
impl EntityStore for SeaOrmStore {
    async fn insert_company(&self, company: &Company) -> StoreResult<()> {
        companies::Entity::insert(convert::company_model(company))
            .exec_without_returning(&self.db)
            .await
            .map_err(db_err("companies"))?;
        Ok(())
    }

    async fn insert_user(&self, user: &User) -> StoreResult<()> {
        users::Entity::insert(convert::user_model(user))
            .exec_without_returning(&self.db)
            .await
            .map_err(db_err("users"))?;
        Ok(())
    }

    async fn find_user(&self, id: UserId) -> StoreResult<Option<User>> {
        users::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(db_err("users"))?
            .map(convert::user)
            .transpose()
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        users::Entity::find()
            .filter(Expr::expr(Func::lower(Expr::col(users::Column::Email))).eq(email.to_lowercase()))
            .one(&self.db)
            .await
            .map_err(db_err("users"))?
            .map(convert::user)
            .transpose()
    }

    async fn update_user_role(
        &self,
        company_id: CompanyId,
        id: UserId,
        role: Role,
        now: DateTime<Utc>,
    ) -> StoreResult<bool> {
        let result = users::Entity::update_many()
            .col_expr(users::Column::Role, Expr::value(role.as_str()))
            .col_expr(users::Column::UpdatedAt, Expr::value(offset(now)))
            .filter(users::Column::Id.eq(id.into_inner()))
            .filter(users::Column::CompanyId.eq(company_id.into_inner()))
            .exec(&self.db)
            .await
            .map_err(db_err("users"))?;
        Ok(result.rows_affected > 0)
    }

    async fn update_user_verification(
        &self,
        id: UserId,
        update: &VerificationUpdate,
        now: DateTime<Utc>,
    ) -> StoreResult<bool> {
        let mut query = users::Entity::update_many()
            .col_expr(users::Column::UpdatedAt, Expr::value(offset(now)))
            .filter(users::Column::Id.eq(id.into_inner()));
        query = match update {
            VerificationUpdate::CodeIssued { code, expires_at } => query
                .col_expr(users::Column::VerifyCode, Expr::value(code.clone()))
                .col_expr(users::Column::VerifyExpiresAt, Expr::value(offset(*expires_at)))
                .col_expr(users::Column::LastEmailSentAt, Expr::value(offset(now))),
            VerificationUpdate::Verified => query
                .col_expr(users::Column::EmailVerified, Expr::value(true))
                .col_expr(users::Column::VerifyCode, Expr::value(Option::<String>::None))
                .col_expr(
                    users::Column::VerifyExpiresAt,
                    Expr::value(Option::<DateTime<chrono::FixedOffset>>::None),
                ),
        };
        let result = query.exec(&self.db).await.map_err(db_err("users"))?;
        Ok(result.rows_affected > 0)
    }

    async fn insert_account(&self, account: &Account) -> StoreResult<()> {
        accounts::Entity::insert(convert::account_model(account))
            .exec_without_returning(&self.db)
            .await
            .map_err(db_err("accounts"))?;
        Ok(())
    }

    async fn find_account(
        &self,
        company_id: CompanyId,
        id: AccountId,
    ) -> StoreResult<Option<Account>> {
        accounts::Entity::find()
            .filter(accounts::Column::Id.eq(id.into_inner()))
            .filter(accounts::Column::CompanyId.eq(company_id.into_inner()))
            .one(&self.db)
            .await
            .map_err(db_err("accounts"))?
            .map(convert::account)
            .transpose()
    }

    async fn list_accounts(&self, company_id: CompanyId) -> StoreResult<Vec<Account>> {
        accounts::Entity::find()
            .filter(accounts::Column::CompanyId.eq(company_id.into_inner()))
            .filter(accounts::Column::IsActive.eq(true))
            .order_by_asc(accounts::Column::Name)
            .all(&self.db)
            .await
            .map_err(db_err("accounts"))?
            .into_iter()
            .map(convert::account)
            .collect()
    }

    async fn update_account(
        &self,
        company_id: CompanyId,
        id: AccountId,
        patch: &AccountPatch,
        now: DateTime<Utc>,
    ) -> StoreResult<bool> {
        let mut query = accounts::Entity::update_many()
            .col_expr(accounts::Column::UpdatedAt, Expr::value(offset(now)))
            .filter(accounts::Column::Id.eq(id.into_inner()))
            .filter(accounts::Column::CompanyId.eq(company_id.into_inner()));
        if let Some(name) = &patch.name {
            query = query.col_expr(accounts::Column::Name, Expr::value(name.clone()));
        }
        if let Some(kind) = patch.account_type {
            query = query.col_expr(accounts::Column::AccountType, Expr::value(kind.as_str()));
        }
        if let Some(currency) = &patch.currency {
            query = query.col_expr(accounts::Column::Currency, Expr::value(currency.clone()));
        }
        if let Some(description) = &patch.description {
            query = query.col_expr(accounts::Column::Description, Expr::value(description.clone()));
        }
        if let Some(number) = &patch.account_number {
            query = query.col_expr(accounts::Column::AccountNumber, Expr::value(number.clone()));
        }
        if let Some(active) = patch.is_active {
            query = query.col_expr(accounts::Column::IsActive, Expr::value(active));
        }
        let result = query.exec(&self.db).await.map_err(db_err("accounts"))?;
        Ok(result.rows_affected > 0)
    }

    async fn insert_category(&self, category: &Category) -> StoreResult<()> {
        categories::Entity::insert(convert::category_model(category))
            .exec_without_returning(&self.db)
            .await
            .map_err(db_err("categories"))?;
        Ok(())
    }

    async fn find_category(
        &self,
        company_id: CompanyId,
        id: CategoryId,
    ) -> StoreResult<Option<Category>> {
        categories::Entity::find()
            .filter(categories::Column::Id.eq(id.into_inner()))
            .filter(categories::Column::CompanyId.eq(company_id.into_inner()))
            .one(&self.db)
            .await
            .map_err(db_err("categories"))?
            .map(convert::category)
            .transpose()
    }

    async fn list_categories(&self, company_id: CompanyId) -> StoreResult<Vec<Category>> {
        categories::Entity::find()
            .filter(categories::Column::CompanyId.eq(company_id.into_inner()))
            .filter(categories::Column::IsActive.eq(true))
            .order_by_asc(categories::Column::Name)
            .all(&self.db)
            .await
            .map_err(db_err("categories"))?
            .into_iter()
            .map(convert::category)
            .collect()
    }

    async fn update_category(
        &self,
        company_id: CompanyId,
        id: CategoryId,
        patch: &CategoryPatch,
        now: DateTime<Utc>,
    ) -> StoreResult<bool> {
        let mut query = categories::Entity::update_many()
            .col_expr(categories::Column::UpdatedAt, Expr::value(offset(now)))
            .filter(categories::Column::Id.eq(id.into_inner()))
            .filter(categories::Column::CompanyId.eq(company_id.into_inner()));
        if let Some(name) = &patch.name {
            query = query.col_expr(categories::Column::Name, Expr::value(name.clone()));
        }
        if let Some(color) = &patch.color {
            query = query.col_expr(categories::Column::Color, Expr::value(color.clone()));
        }
        if let Some(icon) = &patch.icon {
            query = query.col_expr(categories::Column::Icon, Expr::value(icon.clone()));
        }
        if let Some(description) = &patch.description {
            query = query.col_expr(categories::Column::Description, Expr::value(description.clone()));
        }
        if let Some(active) = patch.is_active {
            query = query.col_expr(categories::Column::IsActive, Expr::value(active));
        }
        let result = query.exec(&self.db).await.map_err(db_err("categories"))?;
        Ok(result.rows_affected > 0)
    }

    async fn insert_budget(&self, budget: &Budget) -> StoreResult<()> {
        budgets::Entity::insert(convert::budget_model(budget))
            .exec_without_returning(&self.db)
            .await
            .map_err(db_err("budgets"))?;
        Ok(())
    }

    async fn find_budget(&self, company_id: CompanyId, id: BudgetId) -> StoreResult<Option<Budget>> {
        budgets::Entity::find()
            .filter(budgets::Column::Id.eq(id.into_inner()))
            .filter(budgets::Column::CompanyId.eq(company_id.into_inner()))
            .one(&self.db)
            .await
            .map_err(db_err("budgets"))?
            .map(convert::budget)
            .transpose()
    }

    async fn list_budgets(&self, company_id: CompanyId) -> StoreResult<Vec<Budget>> {
        budgets::Entity::find()
            .filter(budgets::Column::CompanyId.eq(company_id.into_inner()))
            .filter(budgets::Column::IsActive.eq(true))
            .order_by_asc(budgets::Column::Name)
            .all(&self.db)
            .await
            .map_err(db_err("budgets"))?
            .into_iter()
            .map(convert::budget)
            .collect()
    }

    async fn update_budget(
        &self,
        company_id: CompanyId,
        id: BudgetId,
        patch: &BudgetPatch,
        now: DateTime<Utc>,
    ) -> StoreResult<bool> {
        let mut query = budgets::Entity::update_many()
            .col_expr(budgets::Column::UpdatedAt, Expr::value(offset(now)))
            .filter(budgets::Column::Id.eq(id.into_inner()))
            .filter(budgets::Column::CompanyId.eq(company_id.into_inner()));
        if let Some(name) = &patch.name {
            query = query.col_expr(budgets::Column::Name, Expr::value(name.clone()));
        }
        if let Some(amount) = patch.amount {
            query = query.col_expr(budgets::Column::Amount, Expr::value(amount));
        }
        if let Some(active) = patch.is_active {
            query = query.col_expr(budgets::Column::IsActive, Expr::value(active));
        }
        let result = query.exec(&self.db).await.map_err(db_err("budgets"))?;
        Ok(result.rows_affected > 0)
    }

    async fn insert_transaction(&self, transaction: &Transaction) -> StoreResult<()> {
        transactions::Entity::insert(convert::transaction_model(transaction))
            .exec_without_returning(&self.db)
            .await
            .map_err(db_err("transactions"))?;
        Ok(())
    }

    async fn find_transaction(
        &self,
        company_id: CompanyId,
        id: TransactionId,
    ) -> StoreResult<Option<Transaction>> {
        transactions::Entity::find()
            .filter(transactions::Column::Id.eq(id.into_inner()))
            .filter(transactions::Column::CompanyId.eq(company_id.into_inner()))
            .one(&self.db)
            .await
            .map_err(db_err("transactions"))?
            .map(convert::transaction)
            .transpose()
    }

    async fn list_transactions(
        &self,
        company_id: CompanyId,
        filter: TransactionFilter,
    ) -> StoreResult<Vec<Transaction>> {
        let mut query = transactions::Entity::find()
            .filter(transactions::Column::CompanyId.eq(company_id.into_inner()));
        if let Some(status) = filter.status {
            query = query.filter(transactions::Column::Status.eq(status.as_str()));
        }
        query
            .order_by_desc(transactions::Column::CreatedAt)
            .order_by_desc(transactions::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err("transactions"))?
            .into_iter()
            .map(convert::transaction)
            .collect()
    }

    async fn update_transaction(
        &self,
        company_id: CompanyId,
        id: TransactionId,
        patch: &TransactionPatch,
        now: DateTime<Utc>,
    ) -> StoreResult<bool> {
        let mut query = transactions::Entity::update_many()
            .col_expr(transactions::Column::UpdatedAt, Expr::value(offset(now)))
            .filter(transactions::Column::Id.eq(id.into_inner()))
            .filter(transactions::Column::CompanyId.eq(company_id.into_inner()));
        if let Some(description) = &patch.description {
            query = query.col_expr(transactions::Column::Description, Expr::value(description.clone()));
        }
        if let Some(amount) = patch.amount {
            query = query.col_expr(transactions::Column::Amount, Expr::value(amount));
        }
        if let Some(date) = patch.transaction_date {
            query = query.col_expr(transactions::Column::TransactionDate, Expr::value(date));
        }
        let result = query.exec(&self.db).await.map_err(db_err("transactions"))?;
        Ok(result.rows_affected > 0)
    }

    async fn delete_transaction(
        &self,
        company_id: CompanyId,
        id: TransactionId,
    ) -> StoreResult<bool> {
        let result = transactions::Entity::delete_many()
            .filter(transactions::Column::Id.eq(id.into_inner()))
            .filter(transactions::Column::CompanyId.eq(company_id.into_inner()))
            .exec(&self.db)
            .await
            .map_err(db_err("transactions"))?;
        Ok(result.rows_affected > 0)
    }

    async fn append_audit(&self, entry: &AuditLog) -> StoreResult<()> {
        audit_logs::Entity::insert(convert::audit_model(entry))
            .exec_without_returning(&self.db)
            .await
            .map_err(db_err("audit_logs"))?;
        Ok(())
    }

    async fn list_audit(
        &self,
        company_id: CompanyId,
        page: PageRequest,
    ) -> StoreResult<(Vec<AuditLog>, u64)> {
        let scoped = audit_logs::Entity::find()
            .filter(audit_logs::Column::CompanyId.eq(company_id.into_inner()));
        let total = scoped
            .clone()
            .count(&self.db)
            .await
            .map_err(db_err("audit_logs"))?;
        let rows = scoped
            .order_by_desc(audit_logs::Column::CreatedAt)
            .order_by_desc(audit_logs::Column::Id)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await
            .map_err(db_err("audit_logs"))?
            .into_iter()
            .map(convert::audit)
            .collect::<StoreResult<Vec<_>>>()?;
        Ok((rows, total))
    }

    async fn begin(&self) -> StoreResult<Box<dyn UnitOfWork>> {
        let txn = self.db.begin().await.map_err(db_err("transactions"))?;
        Ok(Box::new(SeaOrmUnitOfWork { txn }))
    }
}

/// A unit of work over one database transaction. Dropping it rolls back.
pub struct SeaOrmUnitOfWork {
    txn: DatabaseTransaction,
}

impl std::fmt::Debug for SeaOrmUnitOfWork {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeaOrmUnitOfWork").finish_non_exhaustive()
    }
}

#[async_trait]
impl UnitOfWork for SeaOrmUnitOfWork {
    async fn transition_transaction(
        &mut self,
        transition: &StatusTransition,
    ) -> StoreResult<Option<Transaction>> {
        let decided_at = offset(transition.decided_at);
        let mut rows = transactions::Entity::update_many()
            .col_expr(transactions::Column::Status, Expr::value(transition.to.as_str()))
            .col_expr(
                transactions::Column::ApprovedById,
                Expr::value(transition.decided_by_id.into_inner()),
            )
            .col_expr(
                transactions::Column::ApprovedByName,
                Expr::value(transition.decided_by_name.clone()),
            )
            .col_expr(transactions::Column::ApprovedAt, Expr::value(decided_at))
            .col_expr(
                transactions::Column::RejectionReason,
                Expr::value(transition.rejection_reason.clone()),
            )
            .col_expr(transactions::Column::UpdatedAt, Expr::value(decided_at))
            .filter(transactions::Column::Id.eq(transition.transaction_id.into_inner()))
            .filter(transactions::Column::CompanyId.eq(transition.company_id.into_inner()))
            .filter(transactions::Column::Status.eq(TransactionStatus::Pending.as_str()))
            .exec_with_returning(&self.txn)
            .await
            .map_err(db_err("transactions"))?;

        let Some(row) = rows.pop() else {
            debug!(
                transaction_id = %transition.transaction_id,
                "Conditional status update matched no pending row"
            );
            return Ok(None);
        };
        convert::transaction(row).map(Some)
    }

    async fn adjust_account_balance(
        &mut self,
        company_id: CompanyId,
        account_id: AccountId,
        delta: Decimal,
        now: DateTime<Utc>,
    ) -> StoreResult<u64> {
        let result = accounts::Entity::update_many()
            .col_expr(
                accounts::Column::Balance,
                Expr::col(accounts::Column::Balance).add(delta),
            )
            .col_expr(accounts::Column::UpdatedAt, Expr::value(offset(now)))
            .filter(accounts::Column::Id.eq(account_id.into_inner()))
            .filter(accounts::Column::CompanyId.eq(company_id.into_inner()))
            .exec(&self.txn)
            .await
            .map_err(db_err("accounts"))?;
        Ok(result.rows_affected)
    }

    async fn add_budget_spent(
        &mut self,
        company_id: CompanyId,
        category_id: CategoryId,
        amount: Decimal,
        now: DateTime<Utc>,
    ) -> StoreResult<u64> {
        let result = budgets::Entity::update_many()
            .col_expr(budgets::Column::Spent, Expr::col(budgets::Column::Spent).add(amount))
            .col_expr(budgets::Column::UpdatedAt, Expr::value(offset(now)))
            .filter(budgets::Column::CompanyId.eq(company_id.into_inner()))
            .filter(budgets::Column::CategoryId.eq(category_id.into_inner()))
            .filter(budgets::Column::IsActive.eq(true))
            .exec(&self.txn)
            .await
            .map_err(db_err("budgets"))?;
        Ok(result.rows_affected)
    }

    async fn commit(self: Box<Self>) -> StoreResult<()> {
        self.txn.commit().await.map_err(db_err("transactions"))
    }
}
