//! Shopping cart state.
//!
//! A [`Cart`] is a flat list of [`CartItem`]s keyed by product id. Adding an
//! id that is already present grows that line's quantity instead of adding a
//! second line, so every id appears at most once.
//!
//! Quantity validation is the caller's job: [`Cart::update_quantity`] stores
//! whatever it is given, and the storefront clamps to at least 1 before
//! calling it.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{CartItem, ProductId};

/// The shopper's cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "CartState")]
pub struct Cart {
    items: Vec<CartItem>,
}

/// Serialized cart shape, folded through [`Cart::add_item`] on the way in so
/// a hand-edited snapshot with repeated ids still yields one line per id.
#[derive(Deserialize)]
struct CartState {
    #[serde(default)]
    items: Vec<CartItem>,
}

impl From<CartState> for Cart {
    fn from(state: CartState) -> Self {
        state.items.into_iter().collect()
    }
}

impl FromIterator<CartItem> for Cart {
    fn from_iter<I: IntoIterator<Item = CartItem>>(iter: I) -> Self {
        let mut cart = Self::new();
        for item in iter {
            cart.add_item(item);
        }
        cart
    }
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Add a line item.
    ///
    /// If the cart already holds `item.id`, that line's quantity becomes
    /// `existing + item.quantity` (saturating at `u32::MAX`) and the rest of
    /// `item` is ignored. Otherwise the item is appended.
    pub fn add_item(&mut self, item: CartItem) {
        match self.items.iter_mut().find(|existing| existing.id == item.id) {
            Some(existing) => {
                existing.quantity = existing.quantity.saturating_add(item.quantity);
            }
            None => self.items.push(item),
        }
    }

    /// Remove the line for `id`. No-op if absent.
    pub fn remove_item(&mut self, id: &ProductId) {
        self.items.retain(|item| &item.id != id);
    }

    /// Set the quantity of the line for `id`. No-op if absent.
    ///
    /// The value is stored as given; callers pass `quantity >= 1`.
    pub fn update_quantity(&mut self, id: &ProductId, quantity: u32) {
        if let Some(item) = self.items.iter_mut().find(|item| &item.id == id) {
            item.quantity = quantity;
        }
    }

    /// Sum of `price × quantity` over every line.
    #[must_use]
    pub fn total_price(&self) -> Decimal {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Total number of units across all lines (the header badge count),
    /// saturating at `u32::MAX`.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items
            .iter()
            .fold(0, |count: u32, item| count.saturating_add(item.quantity))
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Look up the line for `id`.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&CartItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
