//! Session middleware configuration.
//!
//! Sessions live in `PostgreSQL` (tower-sessions-sqlx-store) in production
//! and in memory in tests. The session carries the logged-in identity, the
//! cart, flash messages and the last checkout receipt.

use tower_sessions::{Expiry, SessionManagerLayer, SessionStore};

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "hbr_session";

/// Session expiry time in seconds (7 days).
const SESSION_EXPIRY_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Create the session layer for any store.
///
/// `secure` adds the `Secure` cookie attribute; pass
/// [`StorefrontConfig::is_secure`](crate::config::StorefrontConfig::is_secure).
/// A `PostgresStore` needs its table first; call `PostgresStore::migrate`
/// at startup.
pub fn session_layer<S: SessionStore + Clone>(store: S, secure: bool) -> SessionManagerLayer<S> {
    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(secure)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}
