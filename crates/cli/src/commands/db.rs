//! Schema and seed commands.
//!
//! Both commands are idempotent and safe to run against a live database.

use tower_sessions_sqlx_store::PostgresStore;

use hbr_pharmacy_storefront::db::{ensure_schema, seed_catalog};

use super::{CommandError, connect};

/// Create the `pharmacy` tables and the session table, then seed.
pub async fn init() -> Result<(), CommandError> {
    let pool = connect().await?;

    tracing::info!("Ensuring application schema...");
    ensure_schema(&pool).await?;

    tracing::info!("Ensuring session store table...");
    PostgresStore::new(pool.clone()).migrate().await?;

    let inserted = seed_catalog(&pool).await?;
    tracing::info!(inserted, "Database initialized");
    Ok(())
}

/// Insert the demo products when the catalog is empty.
pub async fn seed() -> Result<(), CommandError> {
    let pool = connect().await?;

    let inserted = seed_catalog(&pool).await?;
    if inserted == 0 {
        tracing::info!("Catalog already populated, nothing to seed");
    } else {
        tracing::info!(inserted, "Catalog seeded");
    }
    Ok(())
}
