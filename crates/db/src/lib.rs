//! Database layer with `SeaORM` entities and the PostgreSQL entity store.
//!
//! This crate provides:
//! - `SeaORM` entity definitions
//! - [`SeaOrmStore`], the production implementation of the core entity store
//! - Database migrations

pub mod entities;
pub mod migration;
pub mod store;

pub use migration::Migrator;
pub use store::{SeaOrmStore, SeaOrmUnitOfWork};

use ledgerly_shared::config::DatabaseConfig;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use tracing::info;

/// Opens a connection pool sized by `config`.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .sqlx_logging(false);
    let db = Database::connect(options).await?;
    info!(
        max_connections = config.max_connections,
        "Database connection established"
    );
    Ok(db)
}
