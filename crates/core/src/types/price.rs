//! Type-safe price representation using decimal arithmetic.
//!
//! All money in LuxeMarket is a [`Decimal`] amount of US dollars. Display
//! rounding happens only at the edges, through [`Price::display`] or
//! [`round_cents`].

use std::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// A US dollar price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price {
    /// Amount in dollars, not cents.
    pub amount: Decimal,
}

impl Price {
    /// Create a price in US dollars.
    #[must_use]
    pub const fn usd(amount: Decimal) -> Self {
        Self { amount }
    }

    /// Format for display (e.g., "$19.99").
    #[must_use]
    pub fn display(&self) -> String {
        format!("${:.2}", round_cents(self.amount))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

/// Round an amount to whole cents, half away from zero.
#[must_use]
pub fn round_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
