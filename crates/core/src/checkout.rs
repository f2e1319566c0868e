//! Checkout flow: shipping address, payment details and order placement.
//!
//! Nothing here charges money. Payment details are checked for shape only,
//! and an order is a confirmation record built from the cart. The caller
//! empties the cart once the order is built.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cart::Cart;
use crate::summary::OrderSummary;
use crate::types::{CartItem, OrderNumber};

/// Errors raised while validating or placing an order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("invalid payment details: {0}")]
    InvalidPayment(&'static str),

    #[error("cart is empty")]
    EmptyCart,
}

/// Where an order ships to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub full_name: String,
    pub address_line1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_line2: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    #[serde(default = "default_country")]
    pub country: String,
    pub phone: String,
}

fn default_country() -> String {
    "US".to_string()
}

impl Address {
    /// Check that every required field is filled in.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::MissingFields`] naming each blank field.
    pub fn validate(&self) -> Result<(), CheckoutError> {
        let required = [
            ("fullName", &self.full_name),
            ("addressLine1", &self.address_line1),
            ("city", &self.city),
            ("state", &self.state),
            ("postalCode", &self.postal_code),
            ("country", &self.country),
            ("phone", &self.phone),
        ];
        let missing: Vec<&'static str> = required
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| *name)
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(CheckoutError::MissingFields(missing))
        }
    }
}

/// How the shopper pays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "paymentMethod",
    rename_all = "snake_case",
    rename_all_fields = "camelCase"
)]
pub enum Payment {
    CreditCard {
        card_number: String,
        card_expiry: String,
        card_cvc: String,
    },
    Paypal,
}

impl Payment {
    /// Check card details for shape. PayPal needs nothing.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::InvalidPayment`] for a malformed card number,
    /// expiry or CVC.
    pub fn validate(&self) -> Result<(), CheckoutError> {
        let Self::CreditCard {
            card_number,
            card_expiry,
            card_cvc,
        } = self
        else {
            return Ok(());
        };

        let digits: String = card_number.chars().filter(|c| !c.is_whitespace()).collect();
        if !(12..=19).contains(&digits.len()) || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(CheckoutError::InvalidPayment("card number"));
        }
        if !is_valid_expiry(card_expiry) {
            return Err(CheckoutError::InvalidPayment("card expiry"));
        }
        if !(3..=4).contains(&card_cvc.len()) || !card_cvc.chars().all(|c| c.is_ascii_digit()) {
            return Err(CheckoutError::InvalidPayment("card CVC"));
        }
        Ok(())
    }

    /// Method name as shown on the confirmation.
    #[must_use]
    pub const fn method(&self) -> PaymentMethod {
        match self {
            Self::CreditCard { .. } => PaymentMethod::CreditCard,
            Self::Paypal => PaymentMethod::Paypal,
        }
    }
}

/// `MM/YY` with a month between 01 and 12.
fn is_valid_expiry(expiry: &str) -> bool {
    let Some((month, year)) = expiry.trim().split_once('/') else {
        return false;
    };
    let month_ok = month.len() == 2 && month.parse::<u8>().is_ok_and(|m| (1..=12).contains(&m));
    let year_ok = year.len() == 2 && year.chars().all(|c| c.is_ascii_digit());
    month_ok && year_ok
}

/// Payment method without card details.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    CreditCard,
    Paypal,
}

/// Checkout wizard position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutStep {
    #[default]
    Shipping,
    Payment,
    Confirmation,
}

impl CheckoutStep {
    /// The next step. Confirmation stays put.
    #[must_use]
    pub const fn advance(self) -> Self {
        match self {
            Self::Shipping => Self::Payment,
            Self::Payment | Self::Confirmation => Self::Confirmation,
        }
    }
}

/// A placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub number: OrderNumber,
    pub items: Vec<CartItem>,
    pub summary: OrderSummary,
    pub shipping_address: Address,
    pub payment_method: PaymentMethod,
    pub placed_at: DateTime<Utc>,
}

/// Format an order number from a sequence value: `ORD-1234`.
#[must_use]
pub fn order_number(sequence: u32) -> OrderNumber {
    OrderNumber::new(format!("ORD-{sequence}"))
}

impl Order {
    /// Validate the checkout form and build an order from the cart.
    ///
    /// The cart is left as is; the caller empties it once the order is built.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::EmptyCart`] for an empty cart, or the first
    /// address or payment validation failure.
    pub fn from_cart(
        cart: &Cart,
        shipping_address: Address,
        payment: &Payment,
        number: OrderNumber,
        placed_at: DateTime<Utc>,
    ) -> Result<Self, CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        shipping_address.validate()?;
        payment.validate()?;

        Ok(Self {
            number,
            items: cart.items().to_vec(),
            summary: OrderSummary::for_cart(cart),
            shipping_address,
            payment_method: payment.method(),
            placed_at,
        })
    }
}
