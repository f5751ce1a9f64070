//! Database migration runner for Ledgerly.
//!
//! Usage:
//!   migrator up      - Run all pending migrations
//!   migrator down    - Roll back the last migration
//!   migrator status  - Show migration status
//!   migrator fresh   - Drop all tables and re-run migrations
//!
//! The connection string comes from `DATABASE_URL` (or `-u`).

use ledgerly_db::migration::Migrator;
use sea_orm_migration::prelude::*;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    cli::run_cli(Migrator).await;
}
