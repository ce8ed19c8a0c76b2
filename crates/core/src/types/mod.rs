//! Core types for ShopHub.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod price;
pub mod product;
pub mod status;

pub use id::{AddressId, OrderId, ProductId, UserId};
pub use price::Price;
pub use product::Product;
pub use status::{DeliverySlot, DeliverySlotError, OrderStatus};
