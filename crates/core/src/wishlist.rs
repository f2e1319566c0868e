//! Saved-for-later products.

use serde::{Deserialize, Serialize};

use crate::types::{Product, ProductId};

/// The shopper's wishlist: full product records with set semantics on id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "WishlistState")]
pub struct Wishlist {
    items: Vec<Product>,
}

#[derive(Deserialize)]
struct WishlistState {
    #[serde(default)]
    items: Vec<Product>,
}

impl From<WishlistState> for Wishlist {
    fn from(state: WishlistState) -> Self {
        let mut wishlist = Self::new();
        for product in state.items {
            wishlist.add(product);
        }
        wishlist
    }
}

impl Wishlist {
    /// Create an empty wishlist.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Save a product. Returns `false` if it was already saved.
    pub fn add(&mut self, product: Product) -> bool {
        if self.contains(&product.id) {
            return false;
        }
        self.items.push(product);
        true
    }

    /// Remove the product with `id`. No-op if absent.
    pub fn remove(&mut self, id: &ProductId) {
        self.items.retain(|product| &product.id != id);
    }

    /// Whether a product with `id` is saved.
    #[must_use]
    pub fn contains(&self, id: &ProductId) -> bool {
        self.items.iter().any(|product| &product.id == id)
    }

    /// Remove every product.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    #[must_use]
    pub fn items(&self) -> &[Product] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
