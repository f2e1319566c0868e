//! Product catalog.
//!
//! The storefront reads products through [`CatalogProvider`]. The bundled
//! [`MockCatalog`] serves the seed products in `data/products.json` from
//! memory, optionally sleeping before each call to mimic a remote API.

use std::time::Duration;

use async_trait::async_trait;
use luxemarket_core::{Product, ProductId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Seed products compiled into the binary.
const SEED_PRODUCTS: &str = include_str!("../data/products.json");

/// Default page size for product listings.
pub const DEFAULT_PAGE_SIZE: usize = 8;
/// Most products returned by [`CatalogProvider::related`].
pub const RELATED_LIMIT: usize = 4;
/// Most products returned by [`CatalogProvider::search`].
pub const SEARCH_LIMIT: usize = 5;
/// Number of featured products.
pub const FEATURED_LIMIT: usize = 4;

/// Catalog failures.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to load products: {0}")]
    Load(#[from] serde_json::Error),
}

/// Listing sort order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Newest,
    PriceAsc,
    PriceDesc,
    Popular,
}

/// Filters, sort and page for a product listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductQuery {
    /// Exact category match. Empty means all categories.
    #[serde(default)]
    pub category: Option<String>,
    /// Case-insensitive substring over name, description and category.
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub sort: SortOrder,
    /// 1-based page number.
    #[serde(default)]
    pub page: Option<usize>,
    #[serde(default)]
    pub limit: Option<usize>,
}

/// One page of a product listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPage {
    pub products: Vec<Product>,
    pub total_pages: usize,
}

/// Read access to the product catalog.
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Filtered, sorted, paginated listing.
    async fn list(&self, query: &ProductQuery) -> Result<ProductPage, CatalogError>;

    /// A single product.
    async fn get(&self, id: &ProductId) -> Result<Option<Product>, CatalogError>;

    /// Other products in `category`, excluding `id`.
    async fn related(&self, id: &ProductId, category: &str) -> Result<Vec<Product>, CatalogError>;

    /// Quick search for the search bar. A blank query returns nothing.
    async fn search(&self, query: &str) -> Result<Vec<Product>, CatalogError>;

    /// Products for the home page.
    async fn featured(&self) -> Result<Vec<Product>, CatalogError>;
}

/// In-memory catalog over a fixed product list.
#[derive(Debug, Clone)]
pub struct MockCatalog {
    products: Vec<Product>,
    latency: Duration,
}

impl MockCatalog {
    /// Catalog over the bundled seed products.
    ///
    /// # Errors
    ///
    /// Returns an error if the seed data does not parse.
    pub fn from_seed(latency: Duration) -> Result<Self, CatalogError> {
        let products = serde_json::from_str(SEED_PRODUCTS)?;
        Ok(Self::new(products, latency))
    }

    /// Catalog over the given products.
    #[must_use]
    pub const fn new(products: Vec<Product>, latency: Duration) -> Self {
        Self { products, latency }
    }

    /// Every product, in seed order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    /// Run a listing query without the simulated latency.
    #[must_use]
    pub fn query(&self, query: &ProductQuery) -> ProductPage {
        let category = query.category.as_deref().filter(|c| !c.is_empty());
        let needle = query
            .search
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);

        let mut matches: Vec<&Product> = self
            .products
            .iter()
            .filter(|p| category.is_none_or(|c| p.category == c))
            .filter(|p| needle.as_deref().is_none_or(|n| p.matches(n)))
            .collect();

        match query.sort {
            SortOrder::Newest => matches.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            SortOrder::PriceAsc => matches.sort_by(|a, b| a.price.cmp(&b.price)),
            SortOrder::PriceDesc => matches.sort_by(|a, b| b.price.cmp(&a.price)),
            SortOrder::Popular => matches.sort_by(|a, b| b.rating.total_cmp(&a.rating)),
        }

        let limit = query.limit.filter(|&l| l > 0).unwrap_or(DEFAULT_PAGE_SIZE);
        let page = query.page.filter(|&p| p > 0).unwrap_or(1);
        let total_pages = matches.len().div_ceil(limit);

        let products = matches
            .into_iter()
            .skip((page - 1).saturating_mul(limit))
            .take(limit)
            .cloned()
            .collect();

        ProductPage {
            products,
            total_pages,
        }
    }
}

#[async_trait]
impl CatalogProvider for MockCatalog {
    async fn list(&self, query: &ProductQuery) -> Result<ProductPage, CatalogError> {
        self.simulate_latency().await;
        Ok(self.query(query))
    }

    async fn get(&self, id: &ProductId) -> Result<Option<Product>, CatalogError> {
        self.simulate_latency().await;
        Ok(self.products.iter().find(|p| &p.id == id).cloned())
    }

    async fn related(&self, id: &ProductId, category: &str) -> Result<Vec<Product>, CatalogError> {
        self.simulate_latency().await;
        Ok(self
            .products
            .iter()
            .filter(|p| &p.id != id && p.category == category)
            .take(RELATED_LIMIT)
            .cloned()
            .collect())
    }

    async fn search(&self, query: &str) -> Result<Vec<Product>, CatalogError> {
        self.simulate_latency().await;
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }
        let needle = query.to_lowercase();
        Ok(self
            .products
            .iter()
            .filter(|p| p.matches(&needle))
            .take(SEARCH_LIMIT)
            .cloned()
            .collect())
    }

    async fn featured(&self) -> Result<Vec<Product>, CatalogError> {
        self.simulate_latency().await;
        Ok(self.products.iter().take(FEATURED_LIMIT).cloned().collect())
    }
}
