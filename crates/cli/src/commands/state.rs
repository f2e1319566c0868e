//! Cart and wishlist inspection commands.
//!
//! These read and write the same snapshots the storefront does, so run them
//! while the server is stopped: the server keeps its own copy in memory and
//! will overwrite the files on its next mutation.

use std::path::Path;
use std::sync::Arc;

use luxemarket_core::persist::{KeyValueStorage, Persistable, Persisted, StorageError};
use luxemarket_core::{Cart, OrderSummary, Price, Wishlist};
use luxemarket_storefront::storage::FileStorage;
use tracing::{info, warn};

/// Open the file storage under `data_dir`.
pub fn open_storage(data_dir: &Path) -> Arc<dyn KeyValueStorage> {
    Arc::new(FileStorage::new(data_dir))
}

/// Log the cart lines and totals.
///
/// # Errors
///
/// Returns an error if the cart snapshot cannot be read.
pub fn show_cart(storage: Arc<dyn KeyValueStorage>) -> Result<(), StorageError> {
    let cart = Persisted::<Cart>::load(storage)?;
    let cart = cart.state();

    if cart.is_empty() {
        info!("Cart is empty");
        return Ok(());
    }

    info!("Cart");
    info!("====");
    for item in cart.items() {
        info!(
            "  {} x{} @ {} = {}",
            item.name,
            item.quantity,
            Price::usd(item.price),
            Price::usd(item.line_total())
        );
    }

    let summary = OrderSummary::for_cart(cart);
    info!("Subtotal: {}", Price::usd(summary.subtotal));
    if summary.is_free_shipping() {
        info!("Shipping: Free");
    } else {
        info!("Shipping: {}", Price::usd(summary.shipping));
    }
    info!("Estimated tax: {}", Price::usd(summary.tax));
    info!("Order total: {}", Price::usd(summary.total));
    info!("Items: {}", summary.item_count);
    Ok(())
}

/// Load a snapshot for resetting. An unreadable one counts as empty.
fn load_or_empty<S: Persistable>(storage: Arc<dyn KeyValueStorage>) -> Persisted<S> {
    Persisted::load(Arc::clone(&storage)).unwrap_or_else(|e| {
        warn!(key = S::STORAGE_KEY, error = %e, "Replacing unreadable snapshot");
        Persisted::empty(storage)
    })
}

/// Empty the cart. Returns how many lines were removed.
///
/// # Errors
///
/// Returns an error if the emptied snapshot cannot be written.
pub fn clear_cart(storage: Arc<dyn KeyValueStorage>) -> Result<usize, StorageError> {
    let mut cart = load_or_empty::<Cart>(storage);
    let removed = cart.update(|c| {
        let lines = c.len();
        c.clear();
        lines
    })?;
    info!(removed, "Cart cleared");
    Ok(removed)
}

/// Log the saved products.
///
/// # Errors
///
/// Returns an error if the wishlist snapshot cannot be read.
pub fn show_wishlist(storage: Arc<dyn KeyValueStorage>) -> Result<(), StorageError> {
    let wishlist = Persisted::<Wishlist>::load(storage)?;
    let wishlist = wishlist.state();

    if wishlist.is_empty() {
        info!("Wishlist is empty");
        return Ok(());
    }

    info!("Wishlist ({} items)", wishlist.len());
    for product in wishlist.items() {
        info!("  [{}] {} - {}", product.id, product.name, Price::usd(product.price));
    }
    Ok(())
}

/// Empty the wishlist. Returns how many products were removed.
///
/// # Errors
///
/// Returns an error if the emptied snapshot cannot be written.
pub fn clear_wishlist(storage: Arc<dyn KeyValueStorage>) -> Result<usize, StorageError> {
    let mut wishlist = load_or_empty::<Wishlist>(storage);
    let removed = wishlist.update(|w| {
        let count = w.len();
        w.clear();
        count
    })?;
    info!(removed, "Wishlist cleared");
    Ok(removed)
}
