//! Authentication service.
//!
//! Registration and username/password login. Passwords are hashed with
//! Argon2id and stored as PHC strings.

mod error;

pub use error::AuthError;

use std::fmt;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use serde::Deserialize;

use hbr_pharmacy_core::{Cpf, Email, UserId, Username};

use crate::db::{RepositoryError, UserStore};
use crate::models::{NewUser, User};

const MAX_FULL_NAME_LENGTH: usize = 150;
const MAX_PHONE_LENGTH: usize = 20;
const MAX_ADDRESS_LENGTH: usize = 255;
const MAX_GENDER_LENGTH: usize = 20;

/// Registration form as submitted.
#[derive(Clone, Default, Deserialize)]
pub struct Registration {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub national_id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub gender: Option<String>,
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("full_name", &self.full_name)
            .field("national_id", &self.national_id)
            .field("email", &self.email)
            .field("phone", &self.phone)
            .field("address", &self.address)
            .field("gender", &self.gender)
            .finish()
    }
}

impl Registration {
    /// Validate and normalize every profile field.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidField` for the first field that is missing,
    /// malformed or longer than its column.
    pub fn validate(&self) -> Result<NewUser, AuthError> {
        let username =
            Username::parse(&self.username).map_err(|e| AuthError::invalid("username", e))?;
        if self.password.is_empty() {
            return Err(AuthError::invalid("password", "required"));
        }
        let full_name = required_text("full_name", &self.full_name, MAX_FULL_NAME_LENGTH)?;
        let national_id =
            Cpf::parse(&self.national_id).map_err(|e| AuthError::invalid("national_id", e))?;
        let email = Email::parse(&self.email).map_err(|e| AuthError::invalid("email", e))?;
        let phone = required_text("phone", &self.phone, MAX_PHONE_LENGTH)?;
        let address = required_text("address", &self.address, MAX_ADDRESS_LENGTH)?;

        let gender = match self.gender.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(g) if g.chars().count() > MAX_GENDER_LENGTH => {
                return Err(AuthError::invalid(
                    "gender",
                    format!("must be at most {MAX_GENDER_LENGTH} characters"),
                ));
            }
            Some(g) => Some(g.to_string()),
        };

        Ok(NewUser {
            username,
            full_name,
            national_id,
            email,
            phone,
            address,
            gender,
        })
    }
}

fn required_text(field: &'static str, value: &str, max: usize) -> Result<String, AuthError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AuthError::invalid(field, "required"));
    }
    if value.chars().count() > max {
        return Err(AuthError::invalid(
            field,
            format!("must be at most {max} characters"),
        ));
    }
    Ok(value.to_string())
}

/// Authentication service.
///
/// Generic over the user store so the flows can be exercised without a
/// database.
pub struct AuthService<S> {
    users: S,
}

impl<S: UserStore> AuthService<S> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(users: S) -> Self {
        Self { users }
    }

    /// Register a new user.
    ///
    /// Field validation runs first; the store is only consulted once the
    /// form is well formed.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidField` if a field fails validation.
    /// Returns `AuthError::UserAlreadyExists` if the username, CPF or email is taken.
    pub async fn register(&self, registration: &Registration) -> Result<User, AuthError> {
        let new_user = registration.validate()?;

        if self.users.identity_taken(&new_user).await? {
            return Err(AuthError::UserAlreadyExists);
        }

        let password_hash = hash_password(&registration.password)?;

        let user = self
            .users
            .create(&new_user, &password_hash)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })?;

        Ok(user)
    }

    /// Login with username and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the username is unknown or
    /// the password is wrong.
    pub async fn login(&self, username: &str, password: &str) -> Result<User, AuthError> {
        let username = Username::parse(username).map_err(|_| AuthError::InvalidCredentials)?;

        let (user, password_hash) = self
            .users
            .get_with_password_hash(&username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;

        Ok(user)
    }

    /// Get a user by ID.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Repository` if the lookup fails.
    pub async fn get_user(&self, id: UserId) -> Result<Option<User>, AuthError> {
        Ok(self.users.get_by_id(id).await?)
    }
}

// =============================================================================
// Password Helpers
// =============================================================================

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}
