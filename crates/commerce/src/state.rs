//! Session state shared with the presentation layer.
//!
//! One [`Storefront`] per interactive session: it owns the catalog and
//! both stores and hands the presentation layer everything it needs:
//! cart accessors, profile accessors and the checkout wizard.

use shophub_core::{OrderId, ProductId};

use crate::account::AccountStore;
use crate::cart::CartStore;
use crate::catalog::Catalog;
use crate::checkout::{Checkout, CheckoutError};
use crate::config::CommerceConfig;
use crate::storage::{JsonStore, StorageError};

/// Per-session aggregate of the catalog and the two stores.
#[derive(Debug)]
pub struct Storefront {
    catalog: Catalog,
    cart: CartStore,
    account: AccountStore,
}

impl Storefront {
    /// Open a session: wire storage under the configured data
    /// directory and load both persisted records.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the data directory cannot be
    /// created or a persisted record cannot be read.
    pub fn open(catalog: Catalog, config: &CommerceConfig) -> Result<Self, StorageError> {
        let store = JsonStore::open(&config.data_dir)?;
        let cart = CartStore::open(store.clone())?;
        let account = AccountStore::open(store)?;
        Ok(Self {
            catalog,
            cart,
            account,
        })
    }

    /// The read-only catalog.
    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The cart store.
    #[must_use]
    pub const fn cart(&self) -> &CartStore {
        &self.cart
    }

    /// Mutable cart store access.
    pub fn cart_mut(&mut self) -> &mut CartStore {
        &mut self.cart
    }

    /// The profile store.
    #[must_use]
    pub const fn account(&self) -> &AccountStore {
        &self.account
    }

    /// Mutable profile store access.
    pub fn account_mut(&mut self) -> &mut AccountStore {
        &mut self.account
    }

    /// Add one unit of a catalog product to the cart.
    ///
    /// Returns `false` without touching the cart when the id is not in
    /// the catalog.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the cart record cannot be written.
    pub fn add_to_cart(&mut self, product_id: ProductId) -> Result<bool, StorageError> {
        let Some(product) = self.catalog.get(product_id) else {
            return Ok(false);
        };
        self.cart.add(product)?;
        Ok(true)
    }

    /// Start the checkout wizard, pre-filled from the current profile.
    #[must_use]
    pub fn begin_checkout(&self) -> Checkout {
        Checkout::begin(&self.account)
    }

    /// Commit a checkout against this session's stores.
    ///
    /// # Errors
    ///
    /// Propagates [`CheckoutError`] from the sequencer; see
    /// [`Checkout::confirm`] for the commit-ordering guarantees.
    pub fn confirm_checkout(&mut self, checkout: &mut Checkout) -> Result<OrderId, CheckoutError> {
        checkout.confirm(&mut self.account, &mut self.cart)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use shophub_core::{Price, Product};
    use tempfile::TempDir;

    fn catalog() -> Catalog {
        Catalog::new(
            vec![Product {
                id: ProductId::new(1),
                name: "Wireless Headphones".to_owned(),
                description: "Over-ear, noise cancelling".to_owned(),
                price: Price::from_units(2990),
                image: "/img/headphones.jpg".to_owned(),
                category: "Electronics".to_owned(),
                rating: 4.8,
                in_stock: true,
            }],
            vec!["All categories".to_owned(), "Electronics".to_owned()],
        )
    }

    #[test]
    fn test_add_to_cart_resolves_catalog_products() {
        let dir = TempDir::new().unwrap();
        let config = CommerceConfig::new(dir.path());
        let mut storefront = Storefront::open(catalog(), &config).unwrap();

        assert!(storefront.add_to_cart(ProductId::new(1)).unwrap());
        assert!(!storefront.add_to_cart(ProductId::new(42)).unwrap());

        assert_eq!(storefront.cart().item_count(), 1);
        assert_eq!(storefront.cart().total_price(), Price::from_units(2990));
    }

    #[test]
    fn test_session_state_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let config = CommerceConfig::new(dir.path());
        {
            let mut storefront = Storefront::open(catalog(), &config).unwrap();
            storefront.add_to_cart(ProductId::new(1)).unwrap();
            storefront
                .account_mut()
                .create_user("Ivan", "ivan@example.com", "123")
                .unwrap();
        }

        let storefront = Storefront::open(catalog(), &config).unwrap();
        assert_eq!(storefront.cart().item_count(), 1);
        assert!(storefront.account().is_authenticated());
    }
}
