//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions
//! - The schema migration
//! - The settings lookup capability
//! - Repositories that run every business workflow inside one database transaction

pub mod entities;
pub mod error;
pub mod migration;
pub mod repositories;
pub mod settings;

pub use error::{ServiceError, ServiceResult};
pub use repositories::{
    CompanyRepository, ExternalStoreRepository, LedgerRepository, PayrollRepository,
    ProductGroupRepository, ProjectRepository, StockRepository, TreasuryRepository,
};
pub use settings::{SettingsLookup, SettingsRepository, StaticSettings};

use mizan_shared::config::DatabaseConfig;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

/// Establishes a connection to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    Database::connect(database_url).await
}

/// Establishes a pooled connection using the configured pool bounds.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect_with(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .sqlx_logging(false);
    Database::connect(options).await
}
