//! Application state shared across handlers.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use luxemarket_core::persist::{KeyValueStorage, Persistable, Persisted};
use luxemarket_core::{Cart, Wishlist};

use crate::catalog::CatalogProvider;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. The cart and wishlist each
/// sit behind their own mutex; handlers lock, mutate and persist without
/// awaiting while the guard is held.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    catalog: Arc<dyn CatalogProvider>,
    cart: Mutex<Persisted<Cart>>,
    wishlist: Mutex<Persisted<Wishlist>>,
}

impl AppState {
    /// Create a new application state, rehydrating the cart and wishlist
    /// from `storage`.
    ///
    /// A snapshot that cannot be read is logged and replaced by an empty
    /// container on the next write.
    pub fn new(catalog: Arc<dyn CatalogProvider>, storage: Arc<dyn KeyValueStorage>) -> Self {
        let cart = rehydrate::<Cart>(&storage);
        let wishlist = rehydrate::<Wishlist>(&storage);

        tracing::info!(
            cart_lines = cart.state().len(),
            wishlist_items = wishlist.state().len(),
            "Shopper state loaded"
        );

        Self {
            inner: Arc::new(AppStateInner {
                catalog,
                cart: Mutex::new(cart),
                wishlist: Mutex::new(wishlist),
            }),
        }
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub fn catalog(&self) -> &dyn CatalogProvider {
        self.inner.catalog.as_ref()
    }

    /// Lock the persisted cart.
    pub fn cart(&self) -> MutexGuard<'_, Persisted<Cart>> {
        self.inner
            .cart
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Lock the persisted wishlist.
    pub fn wishlist(&self) -> MutexGuard<'_, Persisted<Wishlist>> {
        self.inner
            .wishlist
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

fn rehydrate<S: Persistable>(storage: &Arc<dyn KeyValueStorage>) -> Persisted<S> {
    Persisted::load(Arc::clone(storage)).unwrap_or_else(|e| {
        tracing::warn!(
            key = S::STORAGE_KEY,
            error = %e,
            "Discarding unreadable snapshot"
        );
        Persisted::empty(Arc::clone(storage))
    })
}
