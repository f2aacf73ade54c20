//! User repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use hbr_pharmacy_core::{Cpf, Email, UserId, Username};

use super::{RepositoryError, UserStore, map_unique_violation};
use crate::models::{NewUser, User};

const USER_COLUMNS: &str = "id, username, full_name, national_id, email, phone, address, gender, created_at";

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i32,
    username: String,
    full_name: String,
    national_id: String,
    email: String,
    phone: String,
    address: String,
    gender: Option<String>,
    created_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
struct UserWithHashRow {
    #[sqlx(flatten)]
    user: UserRow,
    password_hash: String,
}

impl TryFrom<UserRow> for User {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let username = Username::parse(&row.username).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid username in database: {e}"))
        })?;
        let national_id = Cpf::parse(&row.national_id).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid CPF in database: {e}"))
        })?;
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Self {
            id: UserId::new(row.id),
            username,
            full_name: row.full_name,
            national_id,
            email,
            phone: row.phone,
            address: row.address,
            gender: row.gender,
            created_at: row.created_at,
        })
    }
}

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Whether a user with the same username, CPF or email exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn identity_taken(&self, user: &NewUser) -> Result<bool, RepositoryError> {
        let taken = sqlx::query_scalar::<_, bool>(
            r"
            SELECT EXISTS (
                SELECT 1 FROM pharmacy.users
                WHERE username = $1 OR national_id = $2 OR email = $3
            )
            ",
        )
        .bind(&user.username)
        .bind(&user.national_id)
        .bind(&user.email)
        .fetch_one(self.pool)
        .await?;

        Ok(taken)
    }

    /// Create a new user with an already-hashed password.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the username, CPF or email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, user: &NewUser, password_hash: &str) -> Result<User, RepositoryError> {
        let sql = format!(
            r"
            INSERT INTO pharmacy.users
                (username, password_hash, full_name, national_id, email, phone, address, gender)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {USER_COLUMNS}
            "
        );

        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(&user.username)
            .bind(password_hash)
            .bind(&user.full_name)
            .bind(&user.national_id)
            .bind(&user.email)
            .bind(&user.phone)
            .bind(&user.address)
            .bind(user.gender.as_deref())
            .fetch_one(self.pool)
            .await
            .map_err(|e| map_unique_violation(e, "user"))?;

        User::try_from(row)
    }

    /// Get a user and their password hash by username.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored field is invalid.
    pub async fn get_with_password_hash(
        &self,
        username: &Username,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        let sql = format!(
            "SELECT {USER_COLUMNS}, password_hash FROM pharmacy.users WHERE username = $1"
        );

        let row = sqlx::query_as::<_, UserWithHashRow>(&sql)
            .bind(username)
            .fetch_optional(self.pool)
            .await?;

        row.map(|r| Ok((User::try_from(r.user)?, r.password_hash)))
            .transpose()
    }

    /// Get a user by their ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored field is invalid.
    pub async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM pharmacy.users WHERE id = $1");

        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        row.map(User::try_from).transpose()
    }
}

impl UserStore for UserRepository<'_> {
    async fn identity_taken(&self, user: &NewUser) -> Result<bool, RepositoryError> {
        Self::identity_taken(self, user).await
    }

    async fn create(&self, user: &NewUser, password_hash: &str) -> Result<User, RepositoryError> {
        Self::create(self, user, password_hash).await
    }

    async fn get_with_password_hash(
        &self,
        username: &Username,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        Self::get_with_password_hash(self, username).await
    }

    async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        Self::get_by_id(self, id).await
    }
}
