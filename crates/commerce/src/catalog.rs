//! The read-only product catalog input.
//!
//! The catalog is supplied at process start (usually from a bundled
//! JSON file) and never mutated by the engine; carts keep their own
//! product snapshots.

use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use shophub_core::{Product, ProductId};

/// Errors loading a catalog from its JSON form.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog file could not be read.
    #[error("catalog i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The catalog content is not valid.
    #[error("invalid catalog encoding: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Ordered product list plus the parallel category-label list.
///
/// The first category label is the "all categories" sentinel used by
/// the filter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    products: Vec<Product>,
    categories: Vec<String>,
}

impl Catalog {
    /// Build a catalog from its product list and category labels.
    #[must_use]
    pub const fn new(products: Vec<Product>, categories: Vec<String>) -> Self {
        Self {
            products,
            categories,
        }
    }

    /// Load a catalog from a JSON reader.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Parse`] if the content is not a valid
    /// catalog document.
    pub fn from_reader(reader: impl Read) -> Result<Self, CatalogError> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Load a catalog from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Io`] if the file cannot be read and
    /// [`CatalogError::Parse`] if its content is not a valid catalog.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// All products, in catalog order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Category labels, sentinel first.
    #[must_use]
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Look up a product by id.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Products under a category label; the sentinel label matches
    /// everything.
    #[must_use]
    pub fn products_in(&self, category: &str) -> Vec<&Product> {
        if self.categories.first().is_some_and(|all| all == category) {
            self.products.iter().collect()
        } else {
            self.products
                .iter()
                .filter(|p| p.category == category)
                .collect()
        }
    }

    /// Number of products in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog holds no products.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use shophub_core::Price;

    fn product(id: i32, category: &str) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            description: String::new(),
            price: Price::from_units(100),
            image: String::new(),
            category: category.to_owned(),
            rating: 4.5,
            in_stock: true,
        }
    }

    fn catalog() -> Catalog {
        Catalog::new(
            vec![
                product(1, "Electronics"),
                product(2, "Clothing"),
                product(3, "Electronics"),
            ],
            vec![
                "All categories".to_owned(),
                "Electronics".to_owned(),
                "Clothing".to_owned(),
            ],
        )
    }

    #[test]
    fn test_sentinel_label_matches_everything() {
        let catalog = catalog();
        assert_eq!(catalog.products_in("All categories").len(), 3);
    }

    #[test]
    fn test_category_filter() {
        let catalog = catalog();
        let electronics = catalog.products_in("Electronics");
        assert_eq!(electronics.len(), 2);
        assert!(electronics.iter().all(|p| p.category == "Electronics"));
        assert!(catalog.products_in("Groceries").is_empty());
    }

    #[test]
    fn test_get_by_id() {
        let catalog = catalog();
        assert_eq!(catalog.get(ProductId::new(2)).unwrap().name, "Product 2");
        assert!(catalog.get(ProductId::new(42)).is_none());
    }

    #[test]
    fn test_from_reader() {
        let json = r#"{
            "products": [{
                "id": 1,
                "name": "Wireless Headphones",
                "description": "Over-ear, noise cancelling",
                "price": "2990",
                "image": "/img/headphones.jpg",
                "category": "Electronics",
                "rating": 4.8,
                "in_stock": true
            }],
            "categories": ["All categories", "Electronics"]
        }"#;

        let catalog = Catalog::from_reader(json.as_bytes()).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(
            catalog.get(ProductId::new(1)).unwrap().price,
            Price::from_units(2990)
        );
    }
}
