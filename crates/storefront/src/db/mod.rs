//! Database operations for the storefront `PostgreSQL`.
//!
//! # Schema: `pharmacy`
//!
//! ## Tables
//!
//! - `pharmacy.users` - Registered customers
//! - `pharmacy.products` - Catalog (seeded once, read-only afterwards)
//! - `tower_sessions.session` - Session rows, owned by the session store
//!
//! # Setup
//!
//! The schema is created idempotently at startup by [`schema::ensure_schema`],
//! or ahead of time with:
//! ```bash
//! cargo run -p hbr-pharmacy-cli -- db init
//! ```

pub mod products;
pub mod schema;
pub mod seed;
pub mod users;

use std::future::Future;
use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use hbr_pharmacy_core::{UserId, Username};

use crate::models::{NewUser, User};

pub use products::ProductRepository;
pub use schema::ensure_schema;
pub use seed::seed_catalog;
pub use users::UserRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Constraint violation (e.g., unique username).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Storage used by the authentication service.
///
/// Implemented by [`UserRepository`] for `PostgreSQL`; tests supply an
/// in-memory version.
pub trait UserStore: Send + Sync {
    /// Whether any user already has the username, CPF or email of `user`.
    fn identity_taken(
        &self,
        user: &NewUser,
    ) -> impl Future<Output = Result<bool, RepositoryError>> + Send;

    /// Insert a user. A unique-constraint violation becomes
    /// [`RepositoryError::Conflict`].
    fn create(
        &self,
        user: &NewUser,
        password_hash: &str,
    ) -> impl Future<Output = Result<User, RepositoryError>> + Send;

    /// Look up a user and their password hash by login name.
    fn get_with_password_hash(
        &self,
        username: &Username,
    ) -> impl Future<Output = Result<Option<(User, String)>, RepositoryError>> + Send;

    /// Look up a user by ID.
    fn get_by_id(
        &self,
        id: UserId,
    ) -> impl Future<Output = Result<Option<User>, RepositoryError>> + Send;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Map a unique-constraint violation to [`RepositoryError::Conflict`].
pub(crate) fn map_unique_violation(e: sqlx::Error, what: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict(format!("{what} already exists"));
    }
    RepositoryError::Database(e)
}
