//! Integration tests for the ShopHub commerce engine.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p shophub-integration-tests
//! ```
//!
//! Every test runs against a fresh [`TestContext`]: a [`Storefront`]
//! session persisting into its own temporary data directory, loaded
//! with a small fixed catalog. `restart` reopens the session from the
//! same directory to exercise durability.

#![cfg_attr(not(test), forbid(unsafe_code))]

use shophub_commerce::catalog::Catalog;
use shophub_commerce::config::CommerceConfig;
use shophub_commerce::state::Storefront;
use shophub_core::{Price, Product, ProductId};
use tempfile::TempDir;

/// A storefront session backed by a temporary data directory.
pub struct TestContext {
    data_dir: TempDir,
    pub storefront: Storefront,
}

impl TestContext {
    /// Open a fresh session with the sample catalog.
    ///
    /// # Panics
    ///
    /// Panics if the temporary directory or the session cannot be
    /// created; tests cannot proceed without either.
    #[must_use]
    pub fn new() -> Self {
        init_tracing();
        let data_dir = TempDir::new().expect("create temp data dir");
        let config = CommerceConfig::new(data_dir.path());
        let storefront =
            Storefront::open(sample_catalog(), &config).expect("open storefront session");
        Self {
            data_dir,
            storefront,
        }
    }

    /// Reopen the session from the same data directory, as a process
    /// restart would.
    ///
    /// # Panics
    ///
    /// Panics if the session cannot be reopened.
    pub fn restart(&mut self) {
        let config = CommerceConfig::new(self.data_dir.path());
        self.storefront =
            Storefront::open(sample_catalog(), &config).expect("reopen storefront session");
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// The catalog every test session starts with.
#[must_use]
pub fn sample_catalog() -> Catalog {
    Catalog::new(
        vec![
            Product {
                id: ProductId::new(1),
                name: "Wireless Headphones".to_owned(),
                description: "Over-ear, noise cancelling".to_owned(),
                price: Price::from_units(1000),
                image: "/img/headphones.jpg".to_owned(),
                category: "Electronics".to_owned(),
                rating: 4.8,
                in_stock: true,
            },
            Product {
                id: ProductId::new(2),
                name: "Mechanical Keyboard".to_owned(),
                description: "Tenkeyless, brown switches".to_owned(),
                price: Price::from_units(4590),
                image: "/img/keyboard.jpg".to_owned(),
                category: "Electronics".to_owned(),
                rating: 4.6,
                in_stock: true,
            },
            Product {
                id: ProductId::new(3),
                name: "Canvas Backpack".to_owned(),
                description: "25L, water resistant".to_owned(),
                price: Price::from_units(2490),
                image: "/img/backpack.jpg".to_owned(),
                category: "Accessories".to_owned(),
                rating: 4.2,
                in_stock: false,
            },
        ],
        vec![
            "All categories".to_owned(),
            "Electronics".to_owned(),
            "Accessories".to_owned(),
        ],
    )
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
