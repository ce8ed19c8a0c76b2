//! The catalog product record.

use serde::{Deserialize, Serialize};

use crate::types::{Price, ProductId};

/// A catalog product.
///
/// Supplied entirely by the catalog input and never mutated by the
/// engine; carts and orders keep their own snapshots of the fields they
/// need, so later catalog changes never rewrite history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Catalog-assigned id, unique within the catalog.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Longer description shown on the product card.
    pub description: String,
    /// Unit price in whole currency units.
    pub price: Price,
    /// Image reference (url or asset path).
    pub image: String,
    /// Category tag used by the catalog filter.
    pub category: String,
    /// Average rating, 0.0 to 5.0.
    pub rating: f32,
    /// Whether the product is currently in stock. Informational only:
    /// the cart does not enforce stock at this layer.
    pub in_stock: bool,
}
