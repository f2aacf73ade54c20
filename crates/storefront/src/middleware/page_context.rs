//! Per-request data every rendered page needs: who is logged in, the cart
//! badge count and pending flash messages.

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;

use super::flash::take_flashes;
use crate::models::{Cart, CurrentUser, Flash, session_keys};

/// Layout context passed to every template.
///
/// Extracting it consumes the queued flash messages, so only handlers that
/// render a page should ask for it.
#[derive(Debug, Clone, Default)]
pub struct PageContext {
    pub current_user: Option<CurrentUser>,
    pub cart_count: u32,
    pub flashes: Vec<Flash>,
}

impl<S> FromRequestParts<S> for PageContext
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(session) = parts.extensions.get::<Session>() else {
            return Ok(Self::default());
        };

        let current_user = session
            .get::<CurrentUser>(session_keys::CURRENT_USER)
            .await
            .ok()
            .flatten();
        let cart_count = session
            .get::<Cart>(session_keys::CART)
            .await
            .ok()
            .flatten()
            .map_or(0, |cart| cart.total_quantity());
        let flashes = take_flashes(session).await.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Failed to read flash messages");
            Vec::new()
        });

        Ok(Self {
            current_user,
            cart_count,
            flashes,
        })
    }
}

impl PageContext {
    /// Display name for the navigation bar.
    #[must_use]
    pub fn greeting_name(&self) -> Option<&str> {
        self.current_user.as_ref().map(|u| u.full_name.as_str())
    }
}
