//! Cart route handlers.
//!
//! The cart lives in the session; these handlers never write to the
//! database.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State, rejection::PathRejection},
    response::{IntoResponse, Redirect},
};
use tower_sessions::Session;
use tracing::instrument;

use hbr_pharmacy_core::ProductId;

use crate::db::ProductRepository;
use crate::error::AppError;
use crate::filters;
use crate::middleware::{PageContext, push_flash};
use crate::models::{CartAction, Flash};
use crate::services::cart;
use crate::services::checkout::{CartLine, summarize};
use crate::state::AppState;

/// Row of the cart table.
#[derive(Debug, Clone)]
pub struct CartLineView {
    pub product_id: i32,
    pub name: String,
    pub image_url: String,
    pub unit_price: String,
    pub quantity: u32,
    pub line_total: String,
}

impl From<&CartLine> for CartLineView {
    fn from(line: &CartLine) -> Self {
        Self {
            product_id: line.product.id.as_i32(),
            name: line.product.name.clone(),
            image_url: line.product.image_url(),
            unit_price: line.product.price.display(),
            quantity: line.quantity,
            line_total: line.line_total.display(),
        }
    }
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart.html")]
pub struct CartTemplate {
    pub page: PageContext,
    pub lines: Vec<CartLineView>,
    pub subtotal: String,
}

/// Product ID from a URL segment.
///
/// Only non-negative integers name a product; anything else is a 404, as
/// for any other unknown page.
fn product_id_from(raw: u32) -> Result<ProductId, AppError> {
    i32::try_from(raw)
        .map(ProductId::new)
        .map_err(|_| AppError::NotFound(format!("produto {raw}")))
}

fn unknown_product(rejection: &PathRejection) -> AppError {
    AppError::NotFound(rejection.body_text())
}

/// Add one unit of a product and go back to the catalog.
#[instrument(skip_all)]
pub async fn add(
    path: Result<Path<u32>, PathRejection>,
    session: Session,
) -> Result<Redirect, AppError> {
    let Path(raw) = path.map_err(|e| unknown_product(&e))?;
    let product_id = product_id_from(raw)?;

    let mut current = cart::load(&session).await?;
    current.add(product_id);
    cart::store(&session, &current).await?;

    tracing::debug!(%product_id, quantity = current.quantity(product_id), "Added to cart");
    push_flash(
        &session,
        Flash::success("Produto adicionado ao carrinho com sucesso!"),
    )
    .await?;

    Ok(Redirect::to("/"))
}

/// Show the cart with line totals and subtotal.
#[instrument(skip_all)]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    page: PageContext,
) -> Result<impl IntoResponse, AppError> {
    let current = cart::load(&session).await?;
    let products = ProductRepository::new(state.pool())
        .get_many(&current.product_ids())
        .await?;
    let summary = summarize(&current, &products);

    Ok(CartTemplate {
        page,
        lines: summary.lines.iter().map(CartLineView::from).collect(),
        subtotal: summary.subtotal.display(),
    })
}

/// Apply `add`, `remove` or `delete` to a cart entry.
///
/// Unknown actions and products not in the cart leave it untouched.
#[instrument(skip_all)]
pub async fn update(
    path: Result<Path<(u32, String)>, PathRejection>,
    session: Session,
) -> Result<Redirect, AppError> {
    let Path((raw, action)) = path.map_err(|e| unknown_product(&e))?;
    let product_id = product_id_from(raw)?;

    match action.parse::<CartAction>() {
        Ok(action) => {
            let mut current = cart::load(&session).await?;
            if current.apply(product_id, action) {
                cart::store(&session, &current).await?;
            }
        }
        Err(e) => tracing::warn!(%product_id, error = %e, "Ignoring cart update"),
    }

    Ok(Redirect::to("/cart"))
}
