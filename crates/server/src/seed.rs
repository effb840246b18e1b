//! Startup seeding of the inventory store from YAML.
//!
//! ```yaml
//! products:
//!   - id: prod_mug
//!     title: Mug
//!     price: 12
//!     sku: MUG-1
//!     quantity: 4
//! collections:
//!   - title: Kitchen
//! orders:
//!   - id: order_100
//!     total: 24
//! ```

use std::path::Path;

use serde::Deserialize;
use serde_json::{Map, Value};
use stockline_core::{CollectionInput, InventoryStore, ProductInput};
use thiserror::Error;
use tracing::info;

/// Errors that can occur while loading a seed file.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Failed to read seed file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid seed file: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Contents of a seed file. Every section is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SeedData {
    pub products: Vec<ProductInput>,
    pub collections: Vec<CollectionInput>,
    pub orders: Vec<Map<String, Value>>,
}

/// What a seed run inserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SeedSummary {
    pub products: usize,
    pub collections: usize,
    pub orders: usize,
}

impl SeedData {
    /// Parse seed data from YAML text.
    ///
    /// # Errors
    ///
    /// Returns `SeedError::Yaml` if the text is not a valid seed document.
    pub fn from_yaml(content: &str) -> Result<Self, SeedError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Read and parse a seed file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub async fn from_file(path: &Path) -> Result<Self, SeedError> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| SeedError::Io {
                path: path.display().to_string(),
                source,
            })?;
        Self::from_yaml(&content)
    }

    /// Insert everything into `store`, products first.
    pub fn apply(self, store: &InventoryStore) -> SeedSummary {
        let summary = SeedSummary {
            products: self.products.len(),
            collections: self.collections.len(),
            orders: self.orders.len(),
        };

        for product in self.products {
            store.upsert_product(product);
        }
        for collection in self.collections {
            store.upsert_collection(collection);
        }
        for order in self.orders {
            store.record_order(order);
        }

        info!(
            products = summary.products,
            collections = summary.collections,
            orders = summary.orders,
            "Store seeded"
        );
        summary
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use stockline_core::PageOptions;

    use super::*;

    const SEED: &str = r"
products:
  - id: prod_mug
    title: Mug
    price: '12.50'
    sku: MUG-1
    quantity: 4
  - title: Plate
    price: 8
collections:
  - title: Kitchen
orders:
  - total: 24
    email: buyer@example.com
";

    #[test]
    fn test_apply_seed() {
        let store = InventoryStore::new();
        let summary = SeedData::from_yaml(SEED).unwrap().apply(&store);
        assert_eq!(
            summary,
            SeedSummary {
                products: 2,
                collections: 1,
                orders: 1
            }
        );

        let mug = store.get_product("prod_mug").unwrap();
        assert!((mug.price - 12.5).abs() < f64::EPSILON);
        assert_eq!(mug.sku, "MUG-1");

        // Generated ids follow the shared sequence in insertion order
        assert!(store.get_product("prod_1").is_some());
        assert!(store.get_collection("col_2").is_some());
        assert_eq!(store.list_orders(&PageOptions::default()).items[0].id.as_str(), "order_3");
    }

    #[test]
    fn test_empty_seed() {
        let store = InventoryStore::new();
        assert_eq!(SeedData::from_yaml("").unwrap().apply(&store), SeedSummary::default());
        assert_eq!(SeedData::from_yaml("products: []").unwrap().products.len(), 0);
    }

    #[test]
    fn test_invalid_seed() {
        let err = SeedData::from_yaml("products: 12").unwrap_err();
        assert!(matches!(err, SeedError::Yaml(_)));
    }

    #[tokio::test]
    async fn test_missing_file() {
        let err = SeedData::from_file(Path::new("/nonexistent/seed.yaml"))
            .await
            .unwrap_err();
        assert!(err.to_string().starts_with("Failed to read seed file /nonexistent/seed.yaml"));
    }
}
