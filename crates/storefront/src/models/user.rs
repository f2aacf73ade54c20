//! User domain types.
//!
//! These types represent validated domain objects separate from database row types.

use chrono::{DateTime, Utc};

use hbr_pharmacy_core::{Cpf, Email, UserId, Username};

/// A registered customer (domain type).
#[derive(Debug, Clone)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Login name, unique.
    pub username: Username,
    /// Full name shown in the navigation bar.
    pub full_name: String,
    /// CPF, unique.
    pub national_id: Cpf,
    /// Email address, unique.
    pub email: Email,
    pub phone: String,
    pub address: String,
    /// Free-text gender, optional on the registration form.
    pub gender: Option<String>,
    /// When the user registered.
    pub created_at: DateTime<Utc>,
}

/// A validated registration, ready to be stored once the password is hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: Username,
    pub full_name: String,
    pub national_id: Cpf,
    pub email: Email,
    pub phone: String,
    pub address: String,
    pub gender: Option<String>,
}
