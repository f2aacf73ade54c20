//! Subcommand implementations.

pub mod db;
pub mod products;

use sqlx::PgPool;
use thiserror::Error;

use hbr_pharmacy_storefront::config::{ConfigError, StorefrontConfig};
use hbr_pharmacy_storefront::db::{RepositoryError, create_pool};

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Environment could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Connection or session-store migration failed.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Application query failed.
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Connect using the same environment the storefront reads.
async fn connect() -> Result<PgPool, CommandError> {
    let config = StorefrontConfig::from_env()?;

    tracing::info!("Connecting to database...");
    Ok(create_pool(&config.database_url).await?)
}
