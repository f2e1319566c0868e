//! Core types for LuxeMarket.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod price;
pub mod product;

pub use id::*;
pub use price::{Price, round_cents};
pub use product::{CartItem, Product};
