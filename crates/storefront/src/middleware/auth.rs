//! Authentication middleware and extractors.
//!
//! Provides extractors for requiring a logged-in customer in route handlers.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use super::flash::push_flash;
use crate::models::{CurrentUser, Flash, session_keys};

/// Notice shown when an anonymous visitor hits a guarded page.
pub const LOGIN_REQUIRED_MESSAGE: &str = "Faça login para acessar esta página.";

/// Extractor that requires a logged-in customer.
///
/// If nobody is logged in, queues a flash notice and redirects to
/// `/login?next=<path>`.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(user): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Olá, {}!", user.full_name)
/// }
/// ```
pub struct RequireAuth(pub CurrentUser);

/// Error returned when authentication is required but nobody is logged in.
pub enum AuthRejection {
    /// Redirect to the login page, coming back to `next` afterwards.
    RedirectToLogin { next: String },
    /// No session layer is installed.
    Unauthorized,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin { next } => Redirect::to(&login_url(&next)).into_response(),
            Self::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
        }
    }
}

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(AuthRejection::Unauthorized)?;

        if let Some(user) = session
            .get::<CurrentUser>(session_keys::CURRENT_USER)
            .await
            .ok()
            .flatten()
        {
            return Ok(Self(user));
        }

        if let Err(e) = push_flash(session, Flash::warning(LOGIN_REQUIRED_MESSAGE)).await {
            tracing::warn!(error = %e, "Failed to queue login notice");
        }

        let next = parts
            .uri
            .path_and_query()
            .map_or_else(|| parts.uri.path().to_string(), ToString::to_string);

        Err(AuthRejection::RedirectToLogin { next })
    }
}

/// Login page URL that returns the visitor to `next` afterwards.
#[must_use]
pub fn login_url(next: &str) -> String {
    format!("/login?next={}", urlencoding::encode(next))
}

/// Whether `next` is safe to redirect to after login.
///
/// Only same-site absolute paths are accepted; `//host` and `/\host` are
/// protocol-relative in browsers and rejected.
#[must_use]
pub fn is_local_path(next: &str) -> bool {
    next.starts_with('/') && !next.starts_with("//") && !next.starts_with("/\\")
}

/// Log a user in: cycle the session ID, then store their identity.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_user(
    session: &Session,
    user: &CurrentUser,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(session_keys::CURRENT_USER, user).await
}

/// Log out: drop the identity and cycle the session ID. The cart survives.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_user(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session
        .remove::<CurrentUser>(session_keys::CURRENT_USER)
        .await?;
    session.cycle_id().await?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use hbr_pharmacy_core::{ProductId, UserId, Username};
    use tower_sessions::MemoryStore;

    use super::*;
    use crate::models::Cart;

    #[test]
    fn test_login_url_encodes_next() {
        assert_eq!(login_url("/checkout"), "/login?next=%2Fcheckout");
        assert_eq!(login_url("/cart?x=1"), "/login?next=%2Fcart%3Fx%3D1");
    }

    #[test]
    fn test_is_local_path() {
        assert!(is_local_path("/checkout"));
        assert!(is_local_path("/"));
        assert!(!is_local_path("https://evil.example"));
        assert!(!is_local_path("//evil.example"));
        assert!(!is_local_path("/\\evil.example"));
        assert!(!is_local_path(""));
    }

    #[tokio::test]
    async fn test_logout_keeps_cart() {
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);
        let user = CurrentUser {
            id: UserId::new(7),
            username: Username::parse("maria").unwrap(),
            full_name: "Maria Souza".to_string(),
        };
        let mut cart = Cart::new();
        cart.add(ProductId::new(1));
        session.insert(session_keys::CART, &cart).await.unwrap();

        set_current_user(&session, &user).await.unwrap();
        let stored: Option<CurrentUser> = session.get(session_keys::CURRENT_USER).await.unwrap();
        assert_eq!(stored, Some(user));

        clear_current_user(&session).await.unwrap();
        let stored: Option<CurrentUser> = session.get(session_keys::CURRENT_USER).await.unwrap();
        assert!(stored.is_none());

        let kept: Option<Cart> = session.get(session_keys::CART).await.unwrap();
        assert_eq!(kept, Some(cart));
    }
}
