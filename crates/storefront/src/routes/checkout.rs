//! Checkout route handlers.
//!
//! Checkout is two requests: the shipping step validates the address and
//! returns the totals the payment step will charge, and placing the order
//! validates everything again, records a confirmation and empties the cart.
//! An order that was built stands even if the emptied cart cannot be saved.

use axum::{Json, extract::State, http::StatusCode};
use chrono::Utc;
use luxemarket_core::{Cart, OrderSummary};
use luxemarket_core::checkout::{self, Address, CheckoutError, CheckoutStep, Order, Payment};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::Result;
use crate::state::AppState;

/// Order numbers are drawn from `0..ORDER_NUMBER_RANGE`.
const ORDER_NUMBER_RANGE: u32 = 10_000;

/// Shipping step response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAccepted {
    pub step: CheckoutStep,
    pub summary: OrderSummary,
}

/// Place order request body.
#[derive(Debug, Deserialize)]
pub struct PlaceOrderRequest {
    pub address: Address,
    #[serde(flatten)]
    pub payment: Payment,
}

/// Order confirmation.
#[derive(Debug, Serialize)]
pub struct OrderConfirmation {
    pub step: CheckoutStep,
    pub order: Order,
}

/// Validate the shipping address and move to the payment step.
#[instrument(skip(state, address))]
pub async fn shipping(
    State(state): State<AppState>,
    Json(address): Json<Address>,
) -> Result<Json<ShippingAccepted>> {
    let summary = {
        let cart = state.cart();
        if cart.state().is_empty() {
            return Err(CheckoutError::EmptyCart.into());
        }
        OrderSummary::for_cart(cart.state())
    };
    address.validate()?;

    Ok(Json(ShippingAccepted {
        step: CheckoutStep::Shipping.advance(),
        summary,
    }))
}

/// Place the order.
#[instrument(skip(state, body))]
pub async fn place(
    State(state): State<AppState>,
    Json(body): Json<PlaceOrderRequest>,
) -> Result<(StatusCode, Json<OrderConfirmation>)> {
    let number = checkout::order_number(rand::rng().random_range(0..ORDER_NUMBER_RANGE));

    let order = {
        let mut cart = state.cart();
        let order = Order::from_cart(
            cart.state(),
            body.address,
            &body.payment,
            number,
            Utc::now(),
        )?;
        if let Err(e) = cart.update(Cart::clear) {
            tracing::error!(
                order_number = %order.number,
                error = %e,
                "Failed to save emptied cart after order"
            );
        }
        order
    };

    tracing::info!(
        order_number = %order.number,
        total = %order.summary.total,
        items = order.summary.item_count,
        "Order placed"
    );

    Ok((
        StatusCode::CREATED,
        Json(OrderConfirmation {
            step: CheckoutStep::Payment.advance(),
            order,
        }),
    ))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use luxemarket_core::persist::{
        KeyValueStorage, MemoryStorage, Persistable, StorageError, encode_snapshot,
    };
    use luxemarket_core::{CartItem, ProductId};
    use rust_decimal::Decimal;

    use super::*;
    use crate::catalog::MockCatalog;

    /// Storage that serves what it was seeded with and refuses writes.
    struct ReadOnlyStorage(MemoryStorage);

    impl KeyValueStorage for ReadOnlyStorage {
        fn get(&self, key: &str) -> std::result::Result<Option<String>, StorageError> {
            self.0.get(key)
        }

        fn set(&self, _key: &str, _value: &str) -> std::result::Result<(), StorageError> {
            Err(StorageError::Io(std::io::Error::other("read-only file system")))
        }

        fn remove(&self, _key: &str) -> std::result::Result<(), StorageError> {
            Err(StorageError::Io(std::io::Error::other("read-only file system")))
        }
    }

    fn storage_with_cart() -> MemoryStorage {
        let cart: Cart = std::iter::once(CartItem {
            id: ProductId::new("7"),
            name: "Aromatherapy Candle Set".to_string(),
            price: Decimal::new(8999, 2),
            image: String::new(),
            quantity: 2,
        })
        .collect();
        let storage = MemoryStorage::new();
        storage
            .set(Cart::STORAGE_KEY, &encode_snapshot(&cart).unwrap())
            .unwrap();
        storage
    }

    fn state_over(storage: Arc<dyn KeyValueStorage>) -> AppState {
        let catalog = MockCatalog::from_seed(Duration::ZERO).unwrap();
        AppState::new(Arc::new(catalog), storage)
    }

    fn request() -> PlaceOrderRequest {
        PlaceOrderRequest {
            address: Address {
                full_name: "Grace Hopper".to_string(),
                address_line1: "1 Navy Yard".to_string(),
                address_line2: None,
                city: "Arlington".to_string(),
                state: "VA".to_string(),
                postal_code: "22202".to_string(),
                country: "US".to_string(),
                phone: "555-0100".to_string(),
            },
            payment: Payment::Paypal,
        }
    }

    #[tokio::test]
    async fn test_place_order_empties_cart() {
        let state = state_over(Arc::new(storage_with_cart()));

        let (status, Json(confirmation)) = place(State(state.clone()), Json(request()))
            .await
            .unwrap();

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(confirmation.step, CheckoutStep::Confirmation);
        assert_eq!(confirmation.order.summary.item_count, 2);
        assert!(state.cart().state().is_empty());
    }

    #[tokio::test]
    async fn test_order_is_confirmed_when_cart_save_fails() {
        let state = state_over(Arc::new(ReadOnlyStorage(storage_with_cart())));
        assert_eq!(state.cart().state().len(), 1);

        let (status, Json(confirmation)) = place(State(state.clone()), Json(request()))
            .await
            .unwrap();

        assert_eq!(status, StatusCode::CREATED);
        assert!(confirmation.order.number.as_str().starts_with("ORD-"));
        assert_eq!(confirmation.order.items.len(), 1);
        assert_eq!(
            confirmation.order.summary.subtotal,
            Decimal::new(17_998, 2)
        );
        assert!(state.cart().state().is_empty());
    }

    #[tokio::test]
    async fn test_empty_cart_is_rejected() {
        let state = state_over(Arc::new(MemoryStorage::new()));

        let err = place(State(state), Json(request())).await.unwrap_err();
        assert!(matches!(
            err,
            crate::error::AppError::Checkout(CheckoutError::EmptyCart)
        ));
    }
}
