//! Wishlist route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use luxemarket_core::{Product, ProductId, Wishlist};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Wishlist contents.
#[derive(Debug, Clone, Serialize)]
pub struct WishlistView {
    pub items: Vec<Product>,
    pub count: usize,
}

impl From<&Wishlist> for WishlistView {
    fn from(wishlist: &Wishlist) -> Self {
        Self {
            items: wishlist.items().to_vec(),
            count: wishlist.len(),
        }
    }
}

/// Add to wishlist request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToWishlistRequest {
    pub product_id: ProductId,
}

/// Membership check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipView {
    pub product_id: ProductId,
    pub in_wishlist: bool,
}

/// Display the wishlist.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Json<WishlistView> {
    Json(WishlistView::from(state.wishlist().state()))
}

/// Save a product. Responds 201 when newly added, 200 when already saved.
#[instrument(skip(state))]
pub async fn add(
    State(state): State<AppState>,
    Json(body): Json<AddToWishlistRequest>,
) -> Result<(StatusCode, Json<WishlistView>)> {
    let product = state
        .catalog()
        .get(&body.product_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {}", body.product_id)))?;

    let (added, view) = {
        let mut wishlist = state.wishlist();
        let added = wishlist.update(|w| w.add(product))?;
        (added, WishlistView::from(wishlist.state()))
    };

    let status = if added {
        tracing::info!(product_id = %body.product_id, "Added to wishlist");
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(view)))
}

/// Whether a product is saved.
#[instrument(skip(state))]
pub async fn contains(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Json<MembershipView> {
    let in_wishlist = state.wishlist().state().contains(&id);
    Json(MembershipView {
        product_id: id,
        in_wishlist,
    })
}

/// Remove a product.
#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<WishlistView>> {
    let mut wishlist = state.wishlist();
    wishlist.update(|w| w.remove(&id))?;
    Ok(Json(WishlistView::from(wishlist.state())))
}

/// Empty the wishlist.
#[instrument(skip(state))]
pub async fn clear(State(state): State<AppState>) -> Result<Json<WishlistView>> {
    let mut wishlist = state.wishlist();
    wishlist.update(Wishlist::clear)?;
    Ok(Json(WishlistView::from(wishlist.state())))
}
