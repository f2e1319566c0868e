//! Catalog products and cart line items.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::round_cents;

/// A catalog product.
///
/// Field names serialize in camelCase so persisted wishlist snapshots and
/// API payloads keep the storefront's established JSON shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    /// Current selling price, after any discount.
    pub price: Decimal,
    /// Discount already applied to `price`, in percent (0 when not on sale).
    #[serde(default)]
    pub discount_percentage: Decimal,
    pub rating: f64,
    pub stock: u32,
    pub category: String,
    pub thumbnail: String,
    #[serde(default)]
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Whether the product is currently discounted.
    #[must_use]
    pub fn is_on_sale(&self) -> bool {
        self.discount_percentage > Decimal::ZERO
    }

    /// The pre-discount price, rounded to cents.
    ///
    /// Returns `None` when the product is not on sale, or when the discount
    /// is 100% or more and no original price can be recovered.
    #[must_use]
    pub fn original_price(&self) -> Option<Decimal> {
        if !self.is_on_sale() {
            return None;
        }
        let remaining = Decimal::ONE - self.discount_percentage / Decimal::ONE_HUNDRED;
        if remaining <= Decimal::ZERO {
            return None;
        }
        self.price.checked_div(remaining).map(round_cents)
    }

    /// Whether the product matches a lowercase search needle.
    ///
    /// Matches on name, description or category, case-insensitively.
    #[must_use]
    pub fn matches(&self, needle_lower: &str) -> bool {
        self.name.to_lowercase().contains(needle_lower)
            || self.description.to_lowercase().contains(needle_lower)
            || self.category.to_lowercase().contains(needle_lower)
    }
}

/// A cart line item.
///
/// Identity is `id`; a cart never holds two items with the same id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
    /// Image URL shown next to the line.
    pub image: String,
    pub quantity: u32,
}

impl CartItem {
    /// Build a line item for `quantity` units of a catalog product.
    ///
    /// The product thumbnail becomes the line image.
    #[must_use]
    pub fn from_product(product: &Product, quantity: u32) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            price: product.price,
            image: product.thumbnail.clone(),
            quantity,
        }
    }

    /// Price of the whole line (`price × quantity`).
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}
