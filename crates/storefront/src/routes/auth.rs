//! Authentication route handlers.
//!
//! Login, registration and logout. Failures are reported with a flash
//! notice and a redirect back to the form.

use std::fmt;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::db::UserRepository;
use crate::error::{AppError, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::{
    PageContext, RequireAuth, clear_current_user, is_local_path, login_url, push_flash,
    set_current_user,
};
use crate::models::{CurrentUser, Flash};
use crate::services::auth::{AuthError, AuthService, Registration};
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    /// Page to return to after login.
    pub next: Option<String>,
}

impl fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginForm")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("next", &self.next)
            .finish()
    }
}

/// Query string of the login page.
#[derive(Debug, Deserialize)]
pub struct NextQuery {
    pub next: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub page: PageContext,
    /// Local path to return to, carried in a hidden field.
    pub next: Option<String>,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub page: PageContext,
}

/// Keep `next` only when it points back into this site.
fn local_next(next: Option<String>) -> Option<String> {
    next.filter(|n| is_local_path(n))
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page.
pub async fn login_page(page: PageContext, Query(query): Query<NextQuery>) -> impl IntoResponse {
    LoginTemplate {
        page,
        next: local_next(query.next),
    }
}

/// Handle login form submission.
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let next = local_next(form.next);
    let auth = AuthService::new(UserRepository::new(state.pool()));

    match auth.login(&form.username, &form.password).await {
        Ok(user) => {
            set_current_user(&session, &CurrentUser::from(&user)).await?;
            set_sentry_user(&user.id, Some(user.username.as_str()));
            tracing::info!(user_id = %user.id, "User logged in");

            let target = next.unwrap_or_else(|| "/".to_string());
            Ok(Redirect::to(&target).into_response())
        }
        Err(AuthError::InvalidCredentials) => {
            tracing::info!(username = %form.username, "Login rejected");
            push_flash(&session, Flash::error(AuthError::InvalidCredentials.user_message()))
                .await?;

            let target = next.map_or_else(|| "/login".to_string(), |n| login_url(&n));
            Ok(Redirect::to(&target).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

// =============================================================================
// Registration Routes
// =============================================================================

/// Display the registration page.
pub async fn register_page(page: PageContext) -> impl IntoResponse {
    RegisterTemplate { page }
}

/// Handle registration form submission.
#[instrument(skip_all)]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<Registration>,
) -> Result<Response, AppError> {
    let auth = AuthService::new(UserRepository::new(state.pool()));

    match auth.register(&form).await {
        Ok(user) => {
            tracing::info!(user_id = %user.id, "User registered");
            push_flash(
                &session,
                Flash::success("Cadastro realizado com sucesso! Faça login."),
            )
            .await?;
            Ok(Redirect::to("/login").into_response())
        }
        Err(e @ (AuthError::InvalidField { .. } | AuthError::UserAlreadyExists)) => {
            tracing::info!(username = %form.username, error = %e, "Registration rejected");
            push_flash(&session, Flash::error(e.user_message())).await?;
            Ok(Redirect::to("/register").into_response())
        }
        Err(e) => Err(e.into()),
    }
}

// =============================================================================
// Logout
// =============================================================================

/// Log out and return to the login page. The cart is kept.
#[instrument(skip_all)]
pub async fn logout(
    RequireAuth(user): RequireAuth,
    session: Session,
) -> Result<Redirect, AppError> {
    clear_current_user(&session).await?;
    clear_sentry_user();
    tracing::info!(user_id = %user.id, "User logged out");
    Ok(Redirect::to("/login"))
}
