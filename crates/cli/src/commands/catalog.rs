//! Catalog browsing command.

use std::time::Duration;

use luxemarket_core::Price;
use luxemarket_storefront::catalog::{CatalogError, MockCatalog, ProductQuery, SortOrder};
use tracing::info;

/// List every matching product on one page.
///
/// # Errors
///
/// Returns an error if the seed catalog cannot be loaded.
pub fn list(
    category: Option<String>,
    search: Option<String>,
    sort: SortOrder,
) -> Result<(), CatalogError> {
    let catalog = MockCatalog::from_seed(Duration::ZERO)?;
    let query = ProductQuery {
        category,
        search,
        sort,
        page: Some(1),
        limit: Some(catalog.products().len().max(1)),
    };
    let page = catalog.query(&query);

    info!("{} products", page.products.len());
    for product in &page.products {
        let sale = product
            .original_price()
            .map(|was| format!(" (was {})", Price::usd(was)))
            .unwrap_or_default();
        info!(
            "  [{}] {} - {}{} [{}] rating {:.1}, {} in stock",
            product.id,
            product.name,
            Price::usd(product.price),
            sale,
            product.category,
            product.rating,
            product.stock
        );
    }
    Ok(())
}
