//! Cart route handlers.
//!
//! Every mutation persists the cart before responding and sets an
//! `HX-Trigger: cart-updated` header so badge fragments can refresh.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Json,
    extract::{Path, State},
    response::{AppendHeaders, IntoResponse, Response},
};
use luxemarket_core::{Cart, CartItem, OrderSummary, ProductId};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Cart contents with derived totals.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub items: Vec<CartItem>,
    pub summary: OrderSummary,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart.items().to_vec(),
            summary: OrderSummary::for_cart(cart),
        }
    }
}

/// Add to cart request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub product_id: ProductId,
    pub quantity: Option<i64>,
}

/// Update quantity request body.
#[derive(Debug, Deserialize)]
pub struct UpdateQuantityRequest {
    pub quantity: i64,
}

/// Cart count badge fragment.
#[derive(Template, WebTemplate)]
#[template(
    source = r#"<span id="cart-count" class="cart-count">{{ count }}</span>"#,
    ext = "html"
)]
pub struct CartCountTemplate {
    pub count: u32,
}

/// Clamp a requested quantity to `1..=max`.
fn clamp_quantity(requested: i64, max: u32) -> u32 {
    let max = max.max(1);
    u32::try_from(requested.max(1)).map_or(max, |q| q.min(max))
}

fn updated(view: CartView) -> Response {
    (
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        Json(view),
    )
        .into_response()
}

/// Display the cart.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Json<CartView> {
    Json(CartView::from(state.cart().state()))
}

/// Add a product to the cart.
///
/// The quantity defaults to 1 and is clamped to the product's stock, the
/// way the product page's quantity picker bounds it.
#[instrument(skip(state))]
pub async fn add(
    State(state): State<AppState>,
    Json(body): Json<AddToCartRequest>,
) -> Result<Response> {
    let product = state
        .catalog()
        .get(&body.product_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {}", body.product_id)))?;

    if product.stock == 0 {
        return Err(AppError::BadRequest(format!("{} is out of stock", product.name)));
    }
    let quantity = clamp_quantity(body.quantity.unwrap_or(1), product.stock);

    let view = {
        let mut cart = state.cart();
        cart.update(|c| c.add_item(CartItem::from_product(&product, quantity)))?;
        CartView::from(cart.state())
    };

    tracing::info!(product_id = %product.id, quantity, "Added to cart");
    Ok(updated(view))
}

/// Set a line's quantity, clamped to `1..=stock` like an add.
#[instrument(skip(state))]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    Json(body): Json<UpdateQuantityRequest>,
) -> Result<Response> {
    let product = state
        .catalog()
        .get(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;
    let quantity = clamp_quantity(body.quantity, product.stock);

    let view = {
        let mut cart = state.cart();
        if cart.state().get(&id).is_none() {
            return Err(AppError::NotFound(format!("cart item {id}")));
        }
        cart.update(|c| c.update_quantity(&id, quantity))?;
        CartView::from(cart.state())
    };

    Ok(updated(view))
}

/// Remove a line from the cart.
#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Response> {
    let view = {
        let mut cart = state.cart();
        cart.update(|c| c.remove_item(&id))?;
        CartView::from(cart.state())
    };
    Ok(updated(view))
}

/// Empty the cart.
#[instrument(skip(state))]
pub async fn clear(State(state): State<AppState>) -> Result<Response> {
    let view = {
        let mut cart = state.cart();
        cart.update(Cart::clear)?;
        CartView::from(cart.state())
    };
    Ok(updated(view))
}

/// Cart count badge (HTML fragment).
#[instrument(skip(state))]
pub async fn count(State(state): State<AppState>) -> CartCountTemplate {
    CartCountTemplate {
        count: state.cart().state().item_count(),
    }
}
