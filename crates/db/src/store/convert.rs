//! Row ↔ domain mapping.
//!
//! Enum-like columns are stored as their `as_str` text; a value the domain
//! cannot parse is reported as a corrupt row rather than silently defaulted.

use chrono::{DateTime, FixedOffset, Utc};
use ledgerly_core::audit::{AuditAction, AuditEntity, AuditLog};
use ledgerly_core::auth::Role;
use ledgerly_core::budget::{Budget, BudgetPeriod};
use ledgerly_core::category::{Category, CategoryType};
use ledgerly_core::ledger::{Account, AccountType};
use ledgerly_core::store::{StoreError, StoreResult};
use ledgerly_core::user::{Company, User};
use ledgerly_core::workflow::{Transaction, TransactionStatus, TransactionType};
use ledgerly_shared::types::{AccountId, CategoryId, UserId};
use sea_orm::{DbErr, Set, SqlErr};

use crate::entities::{accounts, audit_logs, budgets, categories, companies, transactions, users};

pub(crate) fn utc(at: DateTimeWithOffset) -> DateTime<Utc> {
    at.with_timezone(&Utc)
}

pub(crate) fn offset(at: DateTime<Utc>) -> DateTimeWithOffset {
    at.into()
}

type DateTimeWithOffset = DateTime<FixedOffset>;

/// Maps a driver error, keeping unique violations distinguishable.
pub(crate) fn db_err(table: &'static str) -> impl Fn(DbErr) -> StoreError {
    move |err| match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => StoreError::Duplicate(table),
        _ => StoreError::Database(err.to_string()),
    }
}

fn parse<T>(table: &'static str, column: &str, value: &str, f: fn(&str) -> Option<T>) -> StoreResult<T> {
    f(value).ok_or_else(|| StoreError::Corrupt {
        table,
        message: format!("unknown {column} '{value}'"),
    })
}

// ---- companies ----

pub(crate) fn company_model(company: &Company) -> companies::ActiveModel {
    companies::ActiveModel {
        id: Set(company.id.into_inner()),
        name: Set(company.name.clone()),
        created_at: Set(offset(company.created_at)),
        updated_at: Set(offset(company.updated_at)),
    }
}

// ---- users ----

pub(crate) fn user_model(user: &User) -> users::ActiveModel {
    users::ActiveModel {
        id: Set(user.id.into_inner()),
        company_id: Set(user.company_id.into_inner()),
        email: Set(user.email.clone()),
        name: Set(user.name.clone()),
        role: Set(user.role.as_str().to_string()),
        email_verified: Set(user.email_verified),
        verify_code: Set(user.verify_code.clone()),
        verify_expires_at: Set(user.verify_expires_at.map(offset)),
        last_email_sent_at: Set(user.last_email_sent_at.map(offset)),
        created_at: Set(offset(user.created_at)),
        updated_at: Set(offset(user.updated_at)),
    }
}

pub(crate) fn user(model: users::Model) -> StoreResult<User> {
    Ok(User {
        id: model.id.into(),
        company_id: model.company_id.into(),
        role: parse("users", "role", &model.role, Role::parse)?,
        email: model.email,
        name: model.name,
        email_verified: model.email_verified,
        verify_code: model.verify_code,
        verify_expires_at: model.verify_expires_at.map(utc),
        last_email_sent_at: model.last_email_sent_at.map(utc),
        created_at: utc(model.created_at),
        updated_at: utc(model.updated_at),
    })
}

// ---- accounts ----

pub(crate) fn account_model(account: &Account) -> accounts::ActiveModel {
    accounts::ActiveModel {
        id: Set(account.id.into_inner()),
        company_id: Set(account.company_id.into_inner()),
        name: Set(account.name.clone()),
        account_type: Set(account.account_type.as_str().to_string()),
        currency: Set(account.currency.clone()),
        description: Set(account.description.clone()),
        account_number: Set(account.account_number.clone()),
        balance: Set(account.balance),
        is_active: Set(account.is_active),
        created_at: Set(offset(account.created_at)),
        updated_at: Set(offset(account.updated_at)),
    }
}

pub(crate) fn account(model: accounts::Model) -> StoreResult<Account> {
    Ok(Account {
        id: model.id.into(),
        company_id: model.company_id.into(),
        account_type: parse("accounts", "type", &model.account_type, AccountType::parse)?,
        name: model.name,
        currency: model.currency,
        description: model.description,
        account_number: model.account_number,
        balance: model.balance,
        is_active: model.is_active,
        created_at: utc(model.created_at),
        updated_at: utc(model.updated_at),
    })
}

// ---- categories ----

pub(crate) fn category_model(category: &Category) -> categories::ActiveModel {
    categories::ActiveModel {
        id: Set(category.id.into_inner()),
        company_id: Set(category.company_id.into_inner()),
        name: Set(category.name.clone()),
        category_type: Set(category.category_type.as_str().to_string()),
        color: Set(category.color.clone()),
        icon: Set(category.icon.clone()),
        description: Set(category.description.clone()),
        is_active: Set(category.is_active),
        created_at: Set(offset(category.created_at)),
        updated_at: Set(offset(category.updated_at)),
    }
}

pub(crate) fn category(model: categories::Model) -> StoreResult<Category> {
    Ok(Category {
        id: model.id.into(),
        company_id: model.company_id.into(),
        category_type: parse("categories", "type", &model.category_type, CategoryType::parse)?,
        name: model.name,
        color: model.color,
        icon: model.icon,
        description: model.description,
        is_active: model.is_active,
        created_at: utc(model.created_at),
        updated_at: utc(model.updated_at),
    })
}

// ---- budgets ----

pub(crate) fn budget_model(budget: &Budget) -> budgets::ActiveModel {
    budgets::ActiveModel {
        id: Set(budget.id.into_inner()),
        company_id: Set(budget.company_id.into_inner()),
        category_id: Set(budget.category_id.into_inner()),
        name: Set(budget.name.clone()),
        amount: Set(budget.amount),
        spent: Set(budget.spent),
        currency: Set(budget.currency.clone()),
        period: Set(budget.period.as_str().to_string()),
        start_date: Set(budget.start_date),
        end_date: Set(budget.end_date),
        is_active: Set(budget.is_active),
        created_at: Set(offset(budget.created_at)),
        updated_at: Set(offset(budget.updated_at)),
    }
}

pub(crate) fn budget(model: budgets::Model) -> StoreResult<Budget> {
    Ok(Budget {
        id: model.id.into(),
        company_id: model.company_id.into(),
        category_id: model.category_id.into(),
        period: parse("budgets", "period", &model.period, BudgetPeriod::parse)?,
        name: model.name,
        amount: model.amount,
        spent: model.spent,
        currency: model.currency,
        start_date: model.start_date,
        end_date: model.end_date,
        is_active: model.is_active,
        created_at: utc(model.created_at),
        updated_at: utc(model.updated_at),
    })
}

// ---- transactions ----

pub(crate) fn transaction_model(tx: &Transaction) -> transactions::ActiveModel {
    transactions::ActiveModel {
        id: Set(tx.id.into_inner()),
        company_id: Set(tx.company_id.into_inner()),
        transaction_type: Set(tx.transaction_type.as_str().to_string()),
        amount: Set(tx.amount),
        currency: Set(tx.currency.clone()),
        description: Set(tx.description.clone()),
        from_account_id: Set(tx.from_account_id.map(AccountId::into_inner)),
        to_account_id: Set(tx.to_account_id.map(AccountId::into_inner)),
        category_id: Set(tx.category_id.map(CategoryId::into_inner)),
        status: Set(tx.status.as_str().to_string()),
        created_by_id: Set(tx.created_by_id.into_inner()),
        created_by_name: Set(tx.created_by_name.clone()),
        approved_by_id: Set(tx.approved_by_id.map(UserId::into_inner)),
        approved_by_name: Set(tx.approved_by_name.clone()),
        rejection_reason: Set(tx.rejection_reason.clone()),
        transaction_date: Set(tx.transaction_date),
        created_at: Set(offset(tx.created_at)),
        updated_at: Set(offset(tx.updated_at)),
        approved_at: Set(tx.approved_at.map(offset)),
    }
}

pub(crate) fn transaction(model: transactions::Model) -> StoreResult<Transaction> {
    Ok(Transaction {
        id: model.id.into(),
        company_id: model.company_id.into(),
        transaction_type: parse(
            "transactions",
            "type",
            &model.transaction_type,
            TransactionType::parse,
        )?,
        status: parse("transactions", "status", &model.status, TransactionStatus::parse)?,
        amount: model.amount,
        currency: model.currency,
        description: model.description,
        from_account_id: model.from_account_id.map(Into::into),
        to_account_id: model.to_account_id.map(Into::into),
        category_id: model.category_id.map(Into::into),
        created_by_id: model.created_by_id.into(),
        created_by_name: model.created_by_name,
        approved_by_id: model.approved_by_id.map(Into::into),
        approved_by_name: model.approved_by_name,
        rejection_reason: model.rejection_reason,
        transaction_date: model.transaction_date,
        created_at: utc(model.created_at),
        updated_at: utc(model.updated_at),
        approved_at: model.approved_at.map(utc),
    })
}

// ---- audit ----

pub(crate) fn audit_model(entry: &AuditLog) -> audit_logs::ActiveModel {
    audit_logs::ActiveModel {
        id: Set(entry.id.into_inner()),
        company_id: Set(entry.company_id.into_inner()),
        action: Set(entry.action.as_str().to_string()),
        entity: Set(entry.entity.as_str().to_string()),
        entity_id: Set(entry.entity_id),
        user_id: Set(entry.user_id.into_inner()),
        user_name: Set(entry.user_name.clone()),
        user_email: Set(entry.user_email.clone()),
        changes: Set(entry.changes.clone()),
        ip_address: Set(entry.ip_address.clone()),
        user_agent: Set(entry.user_agent.clone()),
        created_at: Set(offset(entry.created_at)),
    }
}

pub(crate) fn audit(model: audit_logs::Model) -> StoreResult<AuditLog> {
    Ok(AuditLog {
        id: model.id.into(),
        company_id: model.company_id.into(),
        action: parse("audit_logs", "action", &model.action, AuditAction::parse)?,
        entity: parse("audit_logs", "entity", &model.entity, AuditEntity::parse)?,
        entity_id: model.entity_id,
        user_id: model.user_id.into(),
        user_name: model.user_name,
        user_email: model.user_email,
        changes: model.changes,
        ip_address: model.ip_address,
        user_agent: model.user_agent,
        created_at: utc(model.created_at),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};
    use ledgerly_shared::types::{CompanyId, TransactionId};
    use rust_decimal_macros::dec;

    fn row() -> transactions::Model {
        let at = Utc.with_ymd_and_hms(2025, 5, 5, 12, 0, 0).unwrap().into();
        transactions::Model {
            id: TransactionId::new().into_inner(),
            company_id: CompanyId::new().into_inner(),
            transaction_type: "transfer".into(),
            amount: dec!(12.3400),
            currency: "USD".into(),
            description: "Sweep".into(),
            from_account_id: Some(AccountId::new().into_inner()),
            to_account_id: Some(AccountId::new().into_inner()),
            category_id: None,
            status: "approved".into(),
            created_by_id: UserId::new().into_inner(),
            created_by_name: "Emma".into(),
            approved_by_id: None,
            approved_by_name: None,
            rejection_reason: None,
            transaction_date: NaiveDate::from_ymd_opt(2025, 5, 5).unwrap(),
            created_at: at,
            updated_at: at,
            approved_at: Some(at),
        }
    }

    #[test]
    fn test_transaction_row_maps_enums_and_times() {
        let tx = transaction(row()).unwrap();
        assert_eq!(tx.transaction_type, TransactionType::Transfer);
        assert_eq!(tx.status, TransactionStatus::Approved);
        assert_eq!(tx.amount, dec!(12.34));
        assert_eq!(
            tx.approved_at,
            Some(Utc.with_ymd_and_hms(2025, 5, 5, 12, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_unknown_status_is_corrupt() {
        let mut bad = row();
        bad.status = "posted".into();
        let err = transaction(bad).unwrap_err();
        assert_eq!(
            err,
            StoreError::Corrupt {
                table: "transactions",
                message: "unknown status 'posted'".into(),
            }
        );
    }

    #[test]
    fn test_offset_round_trip_keeps_instant() {
        let at = Utc.with_ymd_and_hms(2025, 12, 31, 23, 59, 59).unwrap();
        assert_eq!(utc(offset(at)), at);
    }
}
