//! End-to-end tests for the Farmácia HBR storefront.
//!
//! The tests talk HTTP to an already running storefront and are ignored by
//! default.
//!
//! # Running Tests
//!
//! ```bash
//! # Start PostgreSQL and the storefront
//! hbr-cli db init
//! cargo run -p hbr-pharmacy-storefront
//!
//! # Run the ignored tests
//! cargo test -p hbr-pharmacy-integration-tests -- --ignored
//! ```
//!
//! Set `PHARMACY_BASE_URL` when the storefront is not on `http://localhost:3000`.

use reqwest::{
    Client,
    header::{HeaderMap, HeaderValue},
    redirect,
};
use uuid::Uuid;

/// Base URL of the storefront under test.
#[must_use]
pub fn base_url() -> String {
    std::env::var("PHARMACY_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Absolute URL for a storefront path.
#[must_use]
pub fn url(path: &str) -> String {
    format!("{}{path}", base_url().trim_end_matches('/'))
}

/// Client that keeps cookies and does not follow redirects, so tests can
/// assert on `Location`.
///
/// Each client presents its own `X-Forwarded-For` address so the login and
/// registration rate limit applies per test rather than to the whole run.
///
/// # Errors
///
/// Returns an error if the TLS backend cannot be initialized.
pub fn client() -> reqwest::Result<Client> {
    let [.., a, b, c] = Uuid::new_v4().into_bytes();
    let mut headers = HeaderMap::new();
    if let Ok(value) = HeaderValue::from_str(&format!("10.{a}.{b}.{c}")) {
        headers.insert("x-forwarded-for", value);
    }

    Client::builder()
        .cookie_store(true)
        .redirect(redirect::Policy::none())
        .default_headers(headers)
        .build()
}

/// Registration form values that do not collide with earlier runs.
#[derive(Debug, Clone)]
pub struct TestCustomer {
    pub username: String,
    pub password: String,
    pub full_name: String,
    pub national_id: String,
    pub email: String,
    pub phone: String,
    pub address: String,
}

impl TestCustomer {
    /// A fresh customer with a random username, CPF and email.
    #[must_use]
    pub fn unique() -> Self {
        let id = Uuid::new_v4();
        let tag = id.simple().to_string();
        let national_id = format!("{:011}", id.as_u128() % 100_000_000_000);

        Self {
            username: format!("it_{}", tag.get(..12).unwrap_or(&tag)),
            password: "senha-de-teste".to_string(),
            full_name: "Cliente Teste".to_string(),
            national_id,
            email: format!("it-{tag}@example.com"),
            phone: "(11) 99999-0000".to_string(),
            address: "Rua das Flores, 100 - São Paulo".to_string(),
        }
    }

    /// Form fields for `POST /register`.
    #[must_use]
    pub fn registration_form(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("username", &self.username),
            ("password", &self.password),
            ("full_name", &self.full_name),
            ("national_id", &self.national_id),
            ("email", &self.email),
            ("phone", &self.phone),
            ("address", &self.address),
            ("gender", ""),
        ]
    }

    /// Form fields for `POST /login`.
    #[must_use]
    pub fn login_form(&self) -> Vec<(&'static str, &str)> {
        vec![("username", &self.username), ("password", &self.password)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_customers_differ() {
        let a = TestCustomer::unique();
        let b = TestCustomer::unique();
        assert_ne!(a.username, b.username);
        assert_ne!(a.email, b.email);
        assert_eq!(a.national_id.len(), 11);
    }

    #[test]
    fn test_url_joins_path() {
        assert!(url("/health").ends_with("/health"));
        assert!(!url("/health").contains("//health"));
    }
}
