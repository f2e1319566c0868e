//! LuxeMarket Core - cart, wishlist and order-summary state.
//!
//! This crate holds the state that every storefront surface shares:
//! - `cart` - line items with unique ids and additive quantities
//! - `wishlist` - a saved-for-later set of products
//! - `summary` - subtotal, shipping, tax and total derived from a cart
//! - `checkout` - address/payment validation and order confirmation
//! - `persist` - snapshot encoding and the key-value storage seam
//!
//! # Architecture
//!
//! The core crate contains only types, pure state containers and traits - no
//! file or network I/O. Storage backends implement [`persist::KeyValueStorage`]
//! in the crates that own the I/O.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod checkout;
pub mod persist;
pub mod summary;
pub mod types;
pub mod wishlist;

pub use cart::Cart;
pub use summary::OrderSummary;
pub use types::*;
pub use wishlist::Wishlist;
