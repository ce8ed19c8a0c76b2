//! ShopHub Core - Shared types library.
//!
//! This crate provides the common types used across the ShopHub commerce
//! engine:
//! - `commerce` - Cart, profile and checkout state engine
//! - `integration-tests` - Cross-crate flow tests
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access. This
//! keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, prices and statuses, plus the
//!   catalog `Product` record

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
