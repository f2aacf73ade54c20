//! Idempotent schema setup for the `pharmacy` tables.

use sqlx::PgPool;

use super::RepositoryError;

/// Statements run in order by [`ensure_schema`]. Each is safe to repeat.
const SCHEMA_STATEMENTS: &[&str] = &[
    "CREATE SCHEMA IF NOT EXISTS pharmacy",
    r"
    CREATE TABLE IF NOT EXISTS pharmacy.users (
        id            SERIAL PRIMARY KEY,
        username      VARCHAR(150) NOT NULL UNIQUE,
        password_hash VARCHAR(255) NOT NULL,
        full_name     VARCHAR(150) NOT NULL,
        national_id   VARCHAR(14)  NOT NULL UNIQUE,
        email         VARCHAR(150) NOT NULL UNIQUE,
        phone         VARCHAR(20)  NOT NULL,
        address       VARCHAR(255) NOT NULL,
        gender        VARCHAR(20),
        created_at    TIMESTAMPTZ  NOT NULL DEFAULT NOW()
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS pharmacy.products (
        id    SERIAL PRIMARY KEY,
        name  VARCHAR(100)  NOT NULL,
        price NUMERIC(10,2) NOT NULL CHECK (price >= 0),
        image VARCHAR(100)  NOT NULL
    )
    ",
];

/// Create the `pharmacy` schema and its tables if they do not exist.
///
/// The session table is not covered here; it belongs to the session store
/// (`PostgresStore::migrate`).
///
/// # Errors
///
/// Returns `RepositoryError::Database` if any statement fails.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), RepositoryError> {
    for statement in SCHEMA_STATEMENTS {
        sqlx::query(statement).execute(pool).await?;
    }
    tracing::debug!("pharmacy schema ready");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statements_are_idempotent() {
        for statement in SCHEMA_STATEMENTS {
            assert!(
                statement.contains("IF NOT EXISTS"),
                "statement would fail on a second run: {statement}"
            );
        }
    }

    #[test]
    fn test_unique_identity_columns() {
        let users = SCHEMA_STATEMENTS[1];
        for column in ["username", "national_id", "email"] {
            let line = users
                .lines()
                .find(|l| l.trim_start().starts_with(column))
                .unwrap_or_default();
            assert!(line.contains("UNIQUE"), "{column} must be unique");
        }
    }
}
