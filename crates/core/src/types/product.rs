//! Product records and the partial input used to create or update them.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::ProductId;
use crate::validation::lenient;

/// Title given to products created without one.
pub const DEFAULT_PRODUCT_TITLE: &str = "Untitled Product";

/// A stored product.
///
/// `price` and `quantity` are always numbers; a value that could not be read
/// as a number is kept as `NaN` and serialized as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    #[serde(
        serialize_with = "lenient::serialize_number",
        deserialize_with = "lenient::deserialize_number"
    )]
    pub price: f64,
    #[serde(default)]
    pub sku: String,
    #[serde(
        serialize_with = "lenient::serialize_number",
        deserialize_with = "lenient::deserialize_number"
    )]
    pub quantity: f64,
    #[serde(default)]
    pub variants: Vec<Value>,
    #[serde(default)]
    pub collections: Vec<Value>,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

/// Fields supplied when creating or updating a product.
///
/// Every field is optional. Absent and `null` fields leave the stored value
/// untouched; so do empty `title` and `sku` strings.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProductInput {
    #[serde(deserialize_with = "lenient::text")]
    pub id: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub title: Option<String>,
    #[serde(deserialize_with = "lenient::number")]
    pub price: Option<f64>,
    #[serde(deserialize_with = "lenient::text")]
    pub sku: Option<String>,
    #[serde(deserialize_with = "lenient::number")]
    pub quantity: Option<f64>,
    pub variants: Option<Vec<Value>>,
    pub collections: Option<Vec<Value>>,
    pub metadata: Option<Map<String, Value>>,
}

impl ProductInput {
    /// Caller-supplied id, if it is non-empty.
    #[must_use]
    pub fn product_id(&self) -> Option<ProductId> {
        self.id
            .as_deref()
            .filter(|id| !id.is_empty())
            .map(ProductId::from)
    }
}

impl Product {
    /// A product with every field at its default.
    #[must_use]
    pub fn new(id: ProductId) -> Self {
        Self {
            id,
            title: DEFAULT_PRODUCT_TITLE.to_string(),
            price: 0.0,
            sku: String::new(),
            quantity: 0.0,
            variants: Vec::new(),
            collections: Vec::new(),
            metadata: Map::new(),
        }
    }

    /// Apply `input` over this record.
    ///
    /// Supplied fields replace stored ones, except `metadata`, which is merged
    /// key by key with supplied keys taking precedence. The id is never
    /// changed here.
    pub fn merge(&mut self, input: ProductInput) {
        if let Some(title) = input.title.filter(|t| !t.is_empty()) {
            self.title = title;
        }
        if let Some(price) = input.price {
            self.price = price;
        }
        if let Some(sku) = input.sku.filter(|s| !s.is_empty()) {
            self.sku = sku;
        }
        if let Some(quantity) = input.quantity {
            self.quantity = quantity;
        }
        if let Some(variants) = input.variants {
            self.variants = variants;
        }
        if let Some(collections) = input.collections {
            self.collections = collections;
        }
        if let Some(metadata) = input.metadata {
            self.metadata.extend(metadata);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_new_product_defaults() {
        let product = Product::new(ProductId::new("prod_1"));
        assert_eq!(product.title, DEFAULT_PRODUCT_TITLE);
        assert!(product.price.abs() < f64::EPSILON);
        assert!(product.sku.is_empty());
        assert!(product.metadata.is_empty());
    }

    #[test]
    fn test_merge_keeps_unsupplied_fields() {
        let mut product = Product::new(ProductId::new("prod_1"));
        product.merge(serde_json::from_value(json!({ "title": "Hat", "price": "12", "sku": "H1" })).unwrap());
        product.merge(serde_json::from_value(json!({ "title": "", "price": null, "quantity": 4 })).unwrap());

        assert_eq!(product.title, "Hat");
        assert!((product.price - 12.0).abs() < f64::EPSILON);
        assert_eq!(product.sku, "H1");
        assert!((product.quantity - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_merge_metadata_key_wise() {
        let mut product = Product::new(ProductId::new("prod_1"));
        product.merge(serde_json::from_value(json!({ "metadata": { "a": 1, "b": 1 } })).unwrap());
        product.merge(serde_json::from_value(json!({ "metadata": { "b": 2 } })).unwrap());
        assert_eq!(Value::Object(product.metadata), json!({ "a": 1, "b": 2 }));
    }

    #[test]
    fn test_input_accepts_numeric_text_fields() {
        let input: ProductInput = serde_json::from_value(json!({ "id": 42, "sku": 1001 })).unwrap();
        assert_eq!(input.product_id(), Some(ProductId::new("42")));
        assert_eq!(input.sku.as_deref(), Some("1001"));
    }

    #[test]
    fn test_empty_id_is_not_an_id() {
        let input: ProductInput = serde_json::from_value(json!({ "id": "" })).unwrap();
        assert_eq!(input.product_id(), None);
    }

    #[test]
    fn test_unreadable_price_serializes_as_null() {
        let mut product = Product::new(ProductId::new("prod_1"));
        product.merge(serde_json::from_value(json!({ "price": "abc", "quantity": 3 })).unwrap());
        let value = serde_json::to_value(&product).unwrap();
        assert_eq!(value["price"], Value::Null);
        assert_eq!(value["quantity"], json!(3));
    }
}
