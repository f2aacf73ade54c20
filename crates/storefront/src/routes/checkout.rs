//! Checkout and confirmation route handlers.
//!
//! All three handlers require a logged-in customer. Payment is simulated:
//! any submitted card is accepted.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect},
};
use tower_sessions::Session;
use tracing::instrument;

use crate::db::{ProductRepository, UserRepository};
use crate::error::AppError;
use crate::filters;
use crate::middleware::{PageContext, RequireAuth};
use crate::models::{Cart, session_keys};
use crate::services::auth::AuthService;
use crate::services::cart;
use crate::services::checkout::{self, CartSummary, ConfirmedOrder, PaymentDetails};
use crate::state::AppState;

/// Checkout page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout.html")]
pub struct CheckoutTemplate {
    pub page: PageContext,
    pub item_count: u32,
    pub subtotal: String,
    pub shipping: String,
    pub grand_total: String,
}

/// Receipt block on the success page.
#[derive(Debug, Clone)]
pub struct ReceiptView {
    pub item_count: u32,
    pub subtotal: String,
    pub shipping: String,
    pub grand_total: String,
    pub card_last4: Option<String>,
    pub confirmed_at: String,
}

impl From<&ConfirmedOrder> for ReceiptView {
    fn from(order: &ConfirmedOrder) -> Self {
        Self {
            item_count: order.item_count,
            subtotal: order.subtotal.display(),
            shipping: order.shipping.display(),
            grand_total: order.grand_total.display(),
            card_last4: order.card_last4.clone(),
            confirmed_at: order.confirmed_at.format("%d/%m/%Y %H:%M UTC").to_string(),
        }
    }
}

/// Order confirmation page template.
#[derive(Template, WebTemplate)]
#[template(path = "success.html")]
pub struct SuccessTemplate {
    pub page: PageContext,
    pub full_name: String,
    pub address: String,
    pub receipt: Option<ReceiptView>,
}

/// Price the session cart against fresh product rows.
async fn price_cart(state: &AppState, current: &Cart) -> Result<CartSummary, AppError> {
    let products = ProductRepository::new(state.pool())
        .get_many(&current.product_ids())
        .await?;
    Ok(checkout::summarize(current, &products))
}

/// Show the order totals and the payment form.
#[instrument(skip_all)]
pub async fn show(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    session: Session,
    page: PageContext,
) -> Result<impl IntoResponse, AppError> {
    let current = cart::load(&session).await?;
    let summary = price_cart(&state, &current).await?;

    Ok(CheckoutTemplate {
        page,
        item_count: summary.item_count(),
        subtotal: summary.subtotal.display(),
        shipping: summary.shipping.display(),
        grand_total: summary.grand_total.display(),
    })
}

/// Accept the simulated payment, empty the cart and show the receipt.
#[instrument(skip_all)]
pub async fn confirm(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    session: Session,
    Form(payment): Form<PaymentDetails>,
) -> Result<Redirect, AppError> {
    let mut current = cart::load(&session).await?;
    let summary = price_cart(&state, &current).await?;

    let order = checkout::confirm(&mut current, &summary, &payment);
    cart::store(&session, &current).await?;
    session.insert(session_keys::LAST_ORDER, &order).await?;

    tracing::info!(
        user_id = %user.id,
        items = order.item_count,
        grand_total = %order.grand_total,
        card_last4 = order.card_last4.as_deref().unwrap_or("-"),
        "Order confirmed"
    );

    Ok(Redirect::to("/success"))
}

/// Confirmation page with delivery details and the last receipt.
#[instrument(skip_all)]
pub async fn success(
    RequireAuth(current): RequireAuth,
    State(state): State<AppState>,
    session: Session,
    page: PageContext,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthService::new(UserRepository::new(state.pool()))
        .get_user(current.id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("account no longer exists".to_string()))?;

    let receipt = session
        .get::<ConfirmedOrder>(session_keys::LAST_ORDER)
        .await?
        .as_ref()
        .map(ReceiptView::from);

    Ok(SuccessTemplate {
        page,
        full_name: user.full_name,
        address: user.address,
        receipt,
    })
}
