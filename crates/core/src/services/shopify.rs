//! Shopify façade.
//!
//! Simulates a subset of the Shopify Admin operations against the in-memory
//! store. Nothing here talks to Shopify; the configuration is only
//! presence-checked, never verified.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, instrument};

use super::{REDACTED, parse};
use crate::error::FunctionError;
use crate::store::InventoryStore;
use crate::types::{Collection, CollectionInput, Order, Product, ProductInput};
use crate::validation::{
    Page, PageOptions, coerce_number, lenient, require_fields, sanitize_string,
};

/// Admin API version used when the caller gives none.
pub const DEFAULT_API_VERSION: &str = "2025-04";

/// Shopify connection settings.
///
/// Implements `Debug` manually to redact the access token.
#[derive(Clone)]
pub struct ShopifyConfig {
    /// Shop domain (e.g., example.myshopify.com)
    pub shop_domain: String,
    /// Admin API access token
    pub access_token: SecretString,
    /// Admin API version (default: 2025-04)
    pub api_version: String,
}

impl std::fmt::Debug for ShopifyConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopifyConfig")
            .field("shop_domain", &self.shop_domain)
            .field("access_token", &REDACTED)
            .field("api_version", &self.api_version)
            .finish()
    }
}

impl ShopifyConfig {
    /// The configuration as echoed back to callers, with the token redacted.
    #[must_use]
    pub fn summary(&self) -> ShopifyConfigSummary {
        ShopifyConfigSummary {
            shop_domain: self.shop_domain.clone(),
            access_token: REDACTED.to_string(),
            api_version: self.api_version.clone(),
        }
    }
}

/// Result of `shopify_configure`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopifyConfigSummary {
    pub shop_domain: String,
    pub access_token: String,
    pub api_version: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct InventoryUpdate {
    #[serde(deserialize_with = "lenient::text")]
    product_id: Option<String>,
    #[serde(deserialize_with = "lenient::present")]
    quantity: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct BulkSyncRequest {
    #[serde(deserialize_with = "lenient::present")]
    products: Option<Value>,
    #[serde(deserialize_with = "lenient::text")]
    sync_mode: Option<String>,
}

/// Shopify façade over the shared store.
#[derive(Debug)]
pub struct ShopifyService {
    store: InventoryStore,
    config: Option<ShopifyConfig>,
}

impl ShopifyService {
    /// Create an unconfigured façade over `store`.
    #[must_use]
    pub const fn new(store: InventoryStore) -> Self {
        Self {
            store,
            config: None,
        }
    }

    /// Current configuration, if `configure` has been called.
    #[must_use]
    pub const fn config(&self) -> Option<&ShopifyConfig> {
        self.config.as_ref()
    }

    /// Set the connection configuration, replacing any earlier one.
    ///
    /// Requires `shopDomain` and `accessToken`; `apiVersion` defaults to
    /// [`DEFAULT_API_VERSION`]. Values are trimmed.
    ///
    /// # Errors
    ///
    /// Returns a validation error if a required field is missing.
    pub fn configure(&mut self, payload: &Value) -> Result<ShopifyConfigSummary, FunctionError> {
        require_fields(payload, &["shopDomain", "accessToken"], "Shopify configuration")?;

        let api_version = sanitize_string(payload.get("apiVersion"));
        let config = ShopifyConfig {
            shop_domain: sanitize_string(payload.get("shopDomain")),
            access_token: SecretString::from(sanitize_string(payload.get("accessToken"))),
            api_version: if api_version.is_empty() {
                DEFAULT_API_VERSION.to_string()
            } else {
                api_version
            },
        };

        info!(
            shop_domain = %config.shop_domain,
            api_version = %config.api_version,
            "Shopify service configured"
        );
        let summary = config.summary();
        self.config = Some(config);
        Ok(summary)
    }

    fn ensure_configured(&self) -> Result<&ShopifyConfig, FunctionError> {
        self.config.as_ref().ok_or(FunctionError::NotConfigured {
            service: "Shopify",
            prefix: "shopify",
        })
    }

    /// Page through every stored product.
    ///
    /// # Errors
    ///
    /// Fails if the service is not configured or the options are malformed.
    #[instrument(skip(self, options))]
    pub fn list_products(&self, options: &Value) -> Result<Page<Product>, FunctionError> {
        self.ensure_configured()?;
        let options: PageOptions = parse(options, "pagination options")?;
        Ok(self.store.list_products(&options))
    }

    /// Fetch one product.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no product has this id.
    #[instrument(skip(self))]
    pub fn get_product(&self, id: &str) -> Result<Product, FunctionError> {
        self.ensure_configured()?;
        self.store
            .get_product(id)
            .ok_or_else(|| FunctionError::product_not_found(id))
    }

    /// Create a product. Requires `title` and `price`.
    ///
    /// A payload carrying the id of an existing product merges into that
    /// product instead of creating a new one.
    ///
    /// # Errors
    ///
    /// Fails on missing fields or a malformed payload.
    #[instrument(skip(self, payload))]
    pub fn create_product(&self, payload: &Value) -> Result<Product, FunctionError> {
        self.ensure_configured()?;
        require_fields(payload, &["title", "price"], "Create product payload")?;
        let input: ProductInput = parse(payload, "product payload")?;

        if let Some(id) = input.product_id()
            && self.store.get_product(id.as_str()).is_some()
        {
            debug!(product_id = %id, "create_product targets an existing id; merging");
        }

        Ok(self.store.upsert_product(input))
    }

    /// Merge `updates` into an existing product, keeping its id.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no product has this id.
    #[instrument(skip(self, updates))]
    pub fn update_product(&self, id: &str, updates: &Value) -> Result<Product, FunctionError> {
        self.get_product(id)?;
        let mut input: ProductInput = parse(updates, "product updates")?;
        input.id = Some(id.to_string());
        Ok(self.store.upsert_product(input))
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if nothing was deleted.
    #[instrument(skip(self))]
    pub fn delete_product(&self, id: &str) -> Result<bool, FunctionError> {
        self.ensure_configured()?;
        if self.store.delete_product(id) {
            Ok(true)
        } else {
            Err(FunctionError::product_not_found(id))
        }
    }

    /// Set the quantity of a product. Requires `productId` and `quantity`.
    ///
    /// # Errors
    ///
    /// Fails on missing fields or if the product does not exist.
    #[instrument(skip(self, payload))]
    pub fn update_inventory(&self, payload: &Value) -> Result<Product, FunctionError> {
        self.ensure_configured()?;
        require_fields(payload, &["productId", "quantity"], "Inventory update")?;
        let update: InventoryUpdate = parse(payload, "inventory update")?;
        let product_id = update.product_id.unwrap_or_default();
        let quantity = coerce_number(update.quantity.as_ref());

        self.store
            .update_inventory(&product_id, quantity)
            .ok_or_else(|| FunctionError::product_not_found(&product_id))
    }

    /// Upsert or delete a batch of products.
    ///
    /// With `syncMode: "delete"` each listed id is removed (missing ids are
    /// ignored) and nothing is returned for it. Any other mode upserts each
    /// entry and returns the stored records in input order.
    ///
    /// # Errors
    ///
    /// Fails with `TypeInput` if `products` is not an array or an entry is
    /// not a product object.
    #[instrument(skip(self, payload))]
    pub fn bulk_sync(&self, payload: &Value) -> Result<Vec<Product>, FunctionError> {
        self.ensure_configured()?;
        let request: BulkSyncRequest = parse(payload, "bulk sync payload")?;

        let entries = match request.products {
            None => Vec::new(),
            Some(Value::Array(entries)) => entries,
            Some(_) => return Err(FunctionError::TypeInput("Products must be an array".to_string())),
        };
        let delete = request.sync_mode.as_deref() == Some("delete");

        let mut results = Vec::with_capacity(entries.len());
        for entry in &entries {
            if !entry.is_object() {
                return Err(FunctionError::TypeInput(
                    "Each bulk sync entry must be a product object".to_string(),
                ));
            }
            let input: ProductInput = parse(entry, "bulk sync product")?;
            if delete {
                if let Some(id) = input.product_id() {
                    self.store.delete_product(id.as_str());
                }
            } else {
                results.push(self.store.upsert_product(input));
            }
        }

        debug!(entries = entries.len(), delete, "bulk sync applied");
        Ok(results)
    }

    /// Page through every stored order.
    ///
    /// # Errors
    ///
    /// Fails if the service is not configured or the options are malformed.
    #[instrument(skip(self, options))]
    pub fn get_orders(&self, options: &Value) -> Result<Page<Order>, FunctionError> {
        self.ensure_configured()?;
        let options: PageOptions = parse(options, "pagination options")?;
        Ok(self.store.list_orders(&options))
    }

    /// Create a collection. Requires `title`.
    ///
    /// # Errors
    ///
    /// Fails on a missing title or a malformed payload.
    #[instrument(skip(self, payload))]
    pub fn create_collection(&self, payload: &Value) -> Result<Collection, FunctionError> {
        self.ensure_configured()?;
        require_fields(payload, &["title"], "Collection payload")?;
        let input: CollectionInput = parse(payload, "collection payload")?;
        Ok(self.store.upsert_collection(input))
    }
}
