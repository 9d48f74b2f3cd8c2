//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions for the fund tables
//! - Repositories implementing the core store traits
//! - Database migrations that run on SQLite and MySQL alike

pub mod entities;
pub mod migration;
pub mod repositories;

pub use repositories::{MemberRepository, SubjectRepository, TransactionRepository};

use std::time::Duration;

use jam3ya_shared::config::DatabaseConfig;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

/// Establishes a connection pool to the configured database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_timeout(Duration::from_secs(10))
        .sqlx_logging(false);

    tracing::debug!(max = config.max_connections, "connecting to database");
    Database::connect(options).await
}
