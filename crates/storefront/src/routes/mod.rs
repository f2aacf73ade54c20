//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                                  - Catalog
//! GET  /health                            - Liveness check
//! GET  /health/ready                      - Readiness check (database)
//! GET  /static/*                          - CSS and product images
//!
//! # Auth (rate limited)
//! GET  /login                             - Login page
//! POST /login                             - Login action
//! GET  /register                          - Register page
//! POST /register                          - Register action
//! GET  /logout                            - Logout (requires auth)
//!
//! # Cart (session only)
//! GET  /add_to_cart/{product_id}          - Add one unit, back to catalog
//! GET  /cart                              - Cart page
//! GET  /update_cart/{product_id}/{action} - add | remove | delete
//!
//! # Checkout (requires auth)
//! GET  /checkout                          - Totals and payment form
//! POST /checkout                          - Simulated payment
//! GET  /success                           - Confirmation
//! ```

pub mod auth;
pub mod cart;
pub mod checkout;
pub mod health;
pub mod home;

use axum::{Router, middleware::from_fn, routing::get};
use tower_http::services::ServeDir;
use tower_sessions::{SessionManagerLayer, SessionStore};

use crate::middleware::{auth_rate_limiter, request_id_middleware, security_headers_middleware};
use crate::state::AppState;

/// Create the login and registration routes, rate limited per client IP.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .layer(auth_rate_limiter())
}

/// Create the cart routes.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/add_to_cart/{product_id}", get(cart::add))
        .route("/cart", get(cart::show))
        .route("/update_cart/{product_id}/{action}", get(cart::update))
}

/// Create the checkout routes.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/checkout", get(checkout::show).post(checkout::confirm))
        .route("/success", get(checkout::success))
}

/// Create all page routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/logout", get(auth::logout))
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .merge(auth_routes())
        .merge(cart_routes())
        .merge(checkout_routes())
}

/// Assemble the application: routes, static files, sessions and the
/// response middleware.
///
/// Tracing and Sentry layers are added by the binary on top of this.
pub fn app<S>(state: AppState, sessions: SessionManagerLayer<S>) -> Router
where
    S: SessionStore + Clone,
{
    let static_dir = state.config().static_dir.clone();

    routes()
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(sessions)
        .layer(from_fn(security_headers_middleware))
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}
