//! The cart store.
//!
//! Holds the current session's cart items, durable across restarts
//! under the `cart` storage key. The cart is anonymous: it is not
//! parented to a user profile and survives logout untouched.

use serde::{Deserialize, Serialize};
use tracing::debug;

use shophub_core::{Price, Product, ProductId};

use crate::storage::{JsonStore, StorageError, keys};

/// A product snapshot plus the quantity in the cart.
///
/// The snapshot is taken at add time; later catalog changes do not
/// affect lines already in the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    /// The product as it was when first added.
    pub product: Product,
    /// Number of units, always at least 1 while the line exists.
    pub quantity: u32,
}

impl CartItem {
    /// This line's total: unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product.price.times(self.quantity)
    }
}

/// Mutable collection of cart items, persisted after every mutation.
#[derive(Debug)]
pub struct CartStore {
    items: Vec<CartItem>,
    store: JsonStore,
}

impl CartStore {
    /// Open the cart store, loading any persisted cart.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if a persisted cart record exists but
    /// cannot be read.
    pub fn open(store: JsonStore) -> Result<Self, StorageError> {
        let items = store.load(keys::CART)?.unwrap_or_default();
        Ok(Self { items, store })
    }

    /// Cart lines in first-added-first order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Whether the cart holds no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Add one unit of `product`, merging with an existing line for the
    /// same product id.
    ///
    /// Always succeeds, including for out-of-stock products; stock is
    /// not enforced at this layer.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the cart record cannot be written.
    pub fn add(&mut self, product: &Product) -> Result<(), StorageError> {
        if let Some(item) = self
            .items
            .iter_mut()
            .find(|item| item.product.id == product.id)
        {
            item.quantity = item.quantity.saturating_add(1);
        } else {
            self.items.push(CartItem {
                product: product.clone(),
                quantity: 1,
            });
        }
        debug!(product_id = %product.id, "added to cart");
        self.persist()
    }

    /// Remove the whole line for `product_id`, regardless of quantity.
    /// Absent ids are a no-op.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the cart record cannot be written.
    pub fn remove(&mut self, product_id: ProductId) -> Result<(), StorageError> {
        let before = self.items.len();
        self.items.retain(|item| item.product.id != product_id);
        if self.items.len() == before {
            return Ok(());
        }
        debug!(product_id = %product_id, "removed from cart");
        self.persist()
    }

    /// Set the quantity of the line for `product_id`.
    ///
    /// Zero or negative removes the line. Absent ids are a no-op and
    /// never create a line. No upper bound is enforced.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the cart record cannot be written.
    pub fn set_quantity(
        &mut self,
        product_id: ProductId,
        quantity: i64,
    ) -> Result<(), StorageError> {
        if quantity <= 0 {
            return self.remove(product_id);
        }
        let Some(item) = self
            .items
            .iter_mut()
            .find(|item| item.product.id == product_id)
        else {
            return Ok(());
        };
        item.quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        self.persist()
    }

    /// Empty the cart unconditionally.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the cart record cannot be written.
    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.items.clear();
        debug!("cart cleared");
        self.persist()
    }

    /// Σ(price × quantity) over the current lines, recomputed on every
    /// call.
    #[must_use]
    pub fn total_price(&self) -> Price {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Units in the cart, for the badge indicator. O(lines), no price
    /// math.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    fn persist(&self) -> Result<(), StorageError> {
        self.store.save(keys::CART, &self.items)
    }
}
