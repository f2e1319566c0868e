//! Derived order totals.
//!
//! The cart page, the checkout page and the header badge all show numbers
//! computed from the same cart. [`OrderSummary::for_cart`] is the one place
//! those numbers come from.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cart::Cart;
use crate::types::round_cents;

/// Orders with a subtotal strictly above this ship free.
pub const FREE_SHIPPING_THRESHOLD: Decimal = Decimal::from_parts(100, 0, 0, false, 0);

/// Flat shipping fee below the free-shipping threshold.
pub const FLAT_SHIPPING_FEE: Decimal = Decimal::from_parts(10, 0, 0, false, 0);

/// Estimated sales tax rate (7%).
pub const TAX_RATE: Decimal = Decimal::from_parts(7, 0, 0, false, 2);

/// Subtotal, shipping, tax and grand total for a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub subtotal: Decimal,
    pub shipping: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
    pub item_count: u32,
}

impl OrderSummary {
    /// Compute the summary for the current cart contents.
    #[must_use]
    pub fn for_cart(cart: &Cart) -> Self {
        let subtotal = cart.total_price();
        let shipping = shipping_fee(subtotal);
        let tax = estimated_tax(subtotal);
        Self {
            subtotal,
            shipping,
            tax,
            total: subtotal + shipping + tax,
            item_count: cart.item_count(),
        }
    }

    /// Whether this order ships free.
    #[must_use]
    pub fn is_free_shipping(&self) -> bool {
        self.shipping.is_zero()
    }
}

/// Shipping fee for a subtotal: free above the threshold, flat otherwise.
#[must_use]
pub fn shipping_fee(subtotal: Decimal) -> Decimal {
    if subtotal > FREE_SHIPPING_THRESHOLD {
        Decimal::ZERO
    } else {
        FLAT_SHIPPING_FEE
    }
}

/// Estimated tax on a subtotal, rounded to cents.
#[must_use]
pub fn estimated_tax(subtotal: Decimal) -> Decimal {
    round_cents(subtotal * TAX_RATE)
}
