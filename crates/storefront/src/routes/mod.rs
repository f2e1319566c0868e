//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                      - Health check
//!
//! # Products
//! GET    /api/products                - Listing (?category&search&sort&page&limit)
//! GET    /api/products/featured       - Featured products
//! GET    /api/products/{id}           - Product detail
//! GET    /api/products/{id}/related   - Same-category products
//! GET    /api/search                  - Search bar results (?q)
//!
//! # Cart
//! GET    /api/cart                    - Items and totals
//! POST   /api/cart/items              - Add a product
//! PATCH  /api/cart/items/{id}         - Set quantity (clamped to 1..=stock)
//! DELETE /api/cart/items/{id}         - Remove a line
//! DELETE /api/cart                    - Empty the cart
//! GET    /cart/count                  - Cart count badge (HTML fragment)
//!
//! # Wishlist
//! GET    /api/wishlist                - Saved products
//! POST   /api/wishlist                - Save a product
//! GET    /api/wishlist/{id}           - Membership check
//! DELETE /api/wishlist/{id}           - Remove a product
//! DELETE /api/wishlist                - Empty the wishlist
//!
//! # Checkout
//! POST   /api/checkout/shipping       - Validate address, get totals
//! POST   /api/checkout                - Place the order
//! ```

pub mod cart;
pub mod checkout;
pub mod products;
pub mod wishlist;

use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/featured", get(products::featured))
        .route("/{id}", get(products::show))
        .route("/{id}/related", get(products::related))
}

/// Create the cart API routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show).delete(cart::clear))
        .route("/items", post(cart::add))
        .route("/items/{id}", patch(cart::update).delete(cart::remove))
}

/// Create the wishlist routes router.
pub fn wishlist_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(wishlist::show).post(wishlist::add).delete(wishlist::clear))
        .route("/{id}", get(wishlist::contains).delete(wishlist::remove))
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(checkout::place))
        .route("/shipping", post(checkout::shipping))
}

/// Create the main application router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/api/products", product_routes())
        .route("/api/search", get(products::search))
        .nest("/api/cart", cart_routes())
        .route("/cart/count", get(cart::count))
        .nest("/api/wishlist", wishlist_routes())
        .nest("/api/checkout", checkout_routes())
}
