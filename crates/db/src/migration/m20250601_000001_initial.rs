//! Initial database migration.
//!
//! Creates every table, constraint and index the entity store relies on.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: TENANTS & USERS
        // ============================================================
        db.execute_unprepared(COMPANIES_SQL).await?;
        db.execute_unprepared(USERS_SQL).await?;

        // ============================================================
        // PART 2: ACCOUNTS & CATEGORIES
        // ============================================================
        db.execute_unprepared(ACCOUNTS_SQL).await?;
        db.execute_unprepared(CATEGORIES_SQL).await?;

        // ============================================================
        // PART 3: BUDGETS
        // ============================================================
        db.execute_unprepared(BUDGETS_SQL).await?;

        // ============================================================
        // PART 4: TRANSACTIONS
        // ============================================================
        db.execute_unprepared(TRANSACTIONS_SQL).await?;

        // ============================================================
        // PART 5: AUDIT TRAIL
        // ============================================================
        db.execute_unprepared(AUDIT_LOGS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const COMPANIES_SQL: &str = r"
CREATE TABLE companies (
    id UUID PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const USERS_SQL: &str = r"
CREATE TABLE users (
    id UUID PRIMARY KEY,
    company_id UUID NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
    email VARCHAR(255) NOT NULL,
    name VARCHAR(255) NOT NULL,
    role VARCHAR(32) NOT NULL DEFAULT 'employee'
        CHECK (role IN ('employee', 'holder', 'accountant', 'manager', 'admin', 'super_admin', 'developer')),
    email_verified BOOLEAN NOT NULL DEFAULT FALSE,
    verify_code VARCHAR(6),
    verify_expires_at TIMESTAMPTZ,
    last_email_sent_at TIMESTAMPTZ,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE UNIQUE INDEX idx_users_email ON users (LOWER(email));
CREATE INDEX idx_users_company ON users (company_id);
";

const ACCOUNTS_SQL: &str = r"
CREATE TABLE accounts (
    id UUID PRIMARY KEY,
    company_id UUID NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
    name VARCHAR(255) NOT NULL,
    type VARCHAR(16) NOT NULL
        CHECK (type IN ('bank', 'cash', 'credit', 'wallet', 'other')),
    currency VARCHAR(3) NOT NULL DEFAULT 'USD',
    description TEXT,
    account_number VARCHAR(64),
    balance NUMERIC(20, 4) NOT NULL DEFAULT 0,
    is_active BOOLEAN NOT NULL DEFAULT TRUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_accounts_company ON accounts (company_id) WHERE is_active;
";

const CATEGORIES_SQL: &str = r"
CREATE TABLE categories (
    id UUID PRIMARY KEY,
    company_id UUID NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
    name VARCHAR(255) NOT NULL,
    type VARCHAR(16) NOT NULL CHECK (type IN ('income', 'expense')),
    color VARCHAR(16) NOT NULL DEFAULT '#6366f1',
    icon VARCHAR(64),
    description TEXT,
    is_active BOOLEAN NOT NULL DEFAULT TRUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_categories_company ON categories (company_id) WHERE is_active;
";

const BUDGETS_SQL: &str = r"
CREATE TABLE budgets (
    id UUID PRIMARY KEY,
    company_id UUID NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
    category_id UUID NOT NULL REFERENCES categories(id),
    name VARCHAR(255) NOT NULL,
    amount NUMERIC(20, 4) NOT NULL CHECK (amount > 0),
    spent NUMERIC(20, 4) NOT NULL DEFAULT 0,
    currency VARCHAR(3) NOT NULL DEFAULT 'USD',
    period VARCHAR(16) NOT NULL CHECK (period IN ('monthly', 'quarterly', 'yearly')),
    start_date DATE NOT NULL,
    end_date DATE NOT NULL,
    is_active BOOLEAN NOT NULL DEFAULT TRUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    CHECK (start_date <= end_date)
);

CREATE INDEX idx_budgets_company_category ON budgets (company_id, category_id) WHERE is_active;
";

const TRANSACTIONS_SQL: &str = r"
CREATE TABLE transactions (
    id UUID PRIMARY KEY,
    company_id UUID NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
    type VARCHAR(16) NOT NULL CHECK (type IN ('income', 'expense', 'transfer')),
    amount NUMERIC(20, 4) NOT NULL CHECK (amount > 0),
    currency VARCHAR(3) NOT NULL DEFAULT 'USD',
    description TEXT NOT NULL DEFAULT '',
    from_account_id UUID REFERENCES accounts(id),
    to_account_id UUID REFERENCES accounts(id),
    category_id UUID REFERENCES categories(id),
    status VARCHAR(16) NOT NULL DEFAULT 'pending'
        CHECK (status IN ('pending', 'approved', 'rejected')),
    created_by_id UUID NOT NULL REFERENCES users(id),
    created_by_name VARCHAR(255) NOT NULL,
    approved_by_id UUID REFERENCES users(id),
    approved_by_name VARCHAR(255),
    rejection_reason TEXT,
    transaction_date DATE NOT NULL DEFAULT CURRENT_DATE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    approved_at TIMESTAMPTZ
);

CREATE INDEX idx_transactions_company_status ON transactions (company_id, status);
CREATE INDEX idx_transactions_company_created ON transactions (company_id, created_at DESC);
";

const AUDIT_LOGS_SQL: &str = r"
CREATE TABLE audit_logs (
    id UUID PRIMARY KEY,
    company_id UUID NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
    action VARCHAR(16) NOT NULL
        CHECK (action IN ('create', 'update', 'delete', 'approve', 'reject', 'login', 'logout')),
    entity VARCHAR(16) NOT NULL
        CHECK (entity IN ('transaction', 'account', 'category', 'budget', 'user', 'company')),
    entity_id UUID,
    user_id UUID NOT NULL,
    user_name VARCHAR(255) NOT NULL,
    user_email VARCHAR(255) NOT NULL,
    changes JSONB,
    ip_address VARCHAR(64),
    user_agent TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_audit_logs_company_created ON audit_logs (company_id, created_at DESC);
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS audit_logs;
DROP TABLE IF EXISTS transactions;
DROP TABLE IF EXISTS budgets;
DROP TABLE IF EXISTS categories;
DROP TABLE IF EXISTS accounts;
DROP TABLE IF EXISTS users;
DROP TABLE IF EXISTS companies;
";
