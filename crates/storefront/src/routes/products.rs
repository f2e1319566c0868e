//! Product route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use luxemarket_core::{Product, ProductId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::catalog::ProductQuery;
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Product display data: the catalog record plus its pre-discount price.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductView {
    #[serde(flatten)]
    pub product: Product,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_price: Option<Decimal>,
}

impl From<Product> for ProductView {
    fn from(product: Product) -> Self {
        Self {
            original_price: product.original_price(),
            product,
        }
    }
}

fn views(products: Vec<Product>) -> Vec<ProductView> {
    products.into_iter().map(ProductView::from).collect()
}

/// Product listing page.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductListResponse {
    pub products: Vec<ProductView>,
    pub total_pages: usize,
}

/// Search bar query parameters.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// List products with filtering, sorting and pagination.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> Result<Json<ProductListResponse>> {
    let page = state.catalog().list(&query).await?;
    Ok(Json(ProductListResponse {
        products: views(page.products),
        total_pages: page.total_pages,
    }))
}

/// Featured products for the home page.
#[instrument(skip(state))]
pub async fn featured(State(state): State<AppState>) -> Result<Json<Vec<ProductView>>> {
    Ok(Json(views(state.catalog().featured().await?)))
}

/// Display a single product.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<ProductView>> {
    let product = state
        .catalog()
        .get(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;
    Ok(Json(product.into()))
}

/// Products in the same category as the given one.
#[instrument(skip(state))]
pub async fn related(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<Vec<ProductView>>> {
    let product = state
        .catalog()
        .get(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;
    let related = state.catalog().related(&id, &product.category).await?;
    Ok(Json(views(related)))
}

/// Quick search for the search bar.
#[instrument(skip(state))]
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<ProductView>>> {
    Ok(Json(views(state.catalog().search(&query.q).await?)))
}
