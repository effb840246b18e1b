//! Dispatch from function name to façade call.

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::error::FunctionError;
use crate::services::{SheetsService, ShopifyService};
use crate::store::InventoryStore;

/// Owns the two façades over one shared store and routes calls to them.
///
/// Every function takes a single JSON argument. Functions that address a
/// product by id also accept positional forms; see [`FunctionRegistry::call`].
#[derive(Debug)]
pub struct FunctionRegistry {
    store: InventoryStore,
    shopify: ShopifyService,
    sheets: SheetsService,
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        Self::new(InventoryStore::new())
    }
}

impl FunctionRegistry {
    /// Build both façades over `store`.
    #[must_use]
    pub fn new(store: InventoryStore) -> Self {
        Self {
            shopify: ShopifyService::new(store.clone()),
            sheets: SheetsService::new(store.clone()),
            store,
        }
    }

    /// The shared store.
    #[must_use]
    pub const fn store(&self) -> &InventoryStore {
        &self.store
    }

    #[must_use]
    pub const fn shopify(&self) -> &ShopifyService {
        &self.shopify
    }

    #[must_use]
    pub const fn sheets(&self) -> &SheetsService {
        &self.sheets
    }

    /// Empty the store and forget both configurations.
    pub fn reset(&mut self) {
        self.store.reset();
        self.shopify = ShopifyService::new(self.store.clone());
        self.sheets = SheetsService::new(self.store.clone());
        debug!("function registry reset");
    }

    /// Invoke a function by name.
    ///
    /// `shopify_get_product` and `shopify_delete_product` take the product id
    /// as a bare string, a one-element array or `{ "id": .. }`.
    /// `shopify_update_product` takes `[id, updates]` or
    /// `{ "id": .., "updates": {..} }`. Every other function takes its
    /// payload object directly; `null` means no argument.
    ///
    /// # Errors
    ///
    /// Returns `UnknownFunction` for names outside the catalog, and whatever
    /// the façade raises otherwise.
    #[instrument(skip(self, args), fields(function = %name))]
    pub fn call(&mut self, name: &str, args: &Value) -> Result<Value, FunctionError> {
        match name {
            "shopify_configure" => to_json(&self.shopify.configure(args)?),
            "shopify_list_products" => to_json(&self.shopify.list_products(args)?),
            "shopify_get_product" => {
                let id = product_id_arg(name, args)?;
                to_json(&self.shopify.get_product(&id)?)
            }
            "shopify_create_product" => to_json(&self.shopify.create_product(args)?),
            "shopify_update_product" => {
                let (id, updates) = update_args(name, args)?;
                to_json(&self.shopify.update_product(&id, &updates)?)
            }
            "shopify_delete_product" => {
                let id = product_id_arg(name, args)?;
                to_json(&self.shopify.delete_product(&id)?)
            }
            "shopify_update_inventory" => to_json(&self.shopify.update_inventory(args)?),
            "shopify_bulk_sync" => to_json(&self.shopify.bulk_sync(args)?),
            "shopify_get_orders" => to_json(&self.shopify.get_orders(args)?),
            "shopify_create_collection" => to_json(&self.shopify.create_collection(args)?),

            "sheets_configure" => to_json(&self.sheets.configure(args)?),
            "sheets_create_spreadsheet" => to_json(&self.sheets.create_spreadsheet(args)?),
            "sheets_export_inventory" => to_json(&self.sheets.export_inventory(args)?),
            "sheets_import_inventory" => to_json(&self.sheets.import_inventory(args)?),
            "sheets_update_product" => to_json(&self.sheets.update_product(args)?),
            "sheets_bulk_update" => to_json(&self.sheets.bulk_update(args)?),
            "sheets_create_report" => to_json(&self.sheets.create_report(args)?),
            "sheets_get_data" => to_json(&self.sheets.get_data(args)?),
            "sheets_append_data" => to_json(&self.sheets.append_data(args)?),
            "sheets_clear_data" => to_json(&self.sheets.clear_data(args)?),
            "sheets_create_pivot" => to_json(&self.sheets.create_pivot(args)?),
            "sheets_format_sheet" => to_json(&self.sheets.format_sheet(args)?),

            _ => Err(FunctionError::UnknownFunction(name.to_string())),
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<Value, FunctionError> {
    serde_json::to_value(value)
        .map_err(|e| FunctionError::TypeInput(format!("Failed to serialize result: {e}")))
}

/// Split positional arguments into `(id, second)`.
fn positional(args: &Value) -> (Option<&Value>, Option<&Value>) {
    match args {
        Value::Array(values) => (values.first(), values.get(1)),
        Value::Object(map) => (map.get("id"), map.get("updates")),
        Value::Null => (None, None),
        scalar => (Some(scalar), None),
    }
}

fn id_from(function: &str, value: Option<&Value>) -> Result<String, FunctionError> {
    match value {
        None | Some(Value::Null) => Err(FunctionError::Validation {
            context: format!("{function} arguments"),
            missing: vec!["id".to_string()],
        }),
        Some(Value::String(id)) => Ok(id.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(_) => Err(FunctionError::TypeInput(format!(
            "Invalid {function} arguments: id must be a string"
        ))),
    }
}

fn product_id_arg(function: &str, args: &Value) -> Result<String, FunctionError> {
    id_from(function, positional(args).0)
}

fn update_args(function: &str, args: &Value) -> Result<(String, Value), FunctionError> {
    let (id, updates) = positional(args);
    Ok((id_from(function, id)?, updates.cloned().unwrap_or(Value::Null)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::functions::catalog;

    fn configured() -> FunctionRegistry {
        let mut registry = FunctionRegistry::default();
        registry
            .call(
                "shopify_configure",
                &json!({ "shopDomain": "example.myshopify.com", "accessToken": "token" }),
            )
            .unwrap();
        registry
            .call("sheets_configure", &json!({ "credentials": {}, "spreadsheetId": "abc" }))
            .unwrap();
        registry
    }

    #[test]
    fn test_every_catalog_function_is_dispatched() {
        let mut registry = FunctionRegistry::default();
        for function in catalog::all_functions() {
            let result = registry.call(&function.name, &Value::Null);
            assert!(
                !matches!(result, Err(FunctionError::UnknownFunction(_))),
                "{} is not dispatched",
                function.name
            );
        }
    }

    #[test]
    fn test_unknown_function() {
        let mut registry = FunctionRegistry::default();
        let err = registry.call("shopify_launch_rocket", &json!({})).unwrap_err();
        assert_eq!(err.to_string(), "Unknown function: shopify_launch_rocket");
    }

    #[test]
    fn test_configure_echo_is_redacted() {
        let mut registry = FunctionRegistry::default();
        let echoed = registry
            .call("shopify_configure", &json!({ "shopDomain": "s", "accessToken": "secret" }))
            .unwrap();
        assert_eq!(
            echoed,
            json!({ "shopDomain": "s", "accessToken": "[REDACTED]", "apiVersion": "2025-04" })
        );
    }

    #[test]
    fn test_positional_argument_forms() {
        let mut registry = configured();
        let created = registry
            .call("shopify_create_product", &json!({ "id": "p1", "title": "Cap", "price": 12 }))
            .unwrap();
        assert_eq!(created["id"], json!("p1"));

        for args in [json!("p1"), json!(["p1"]), json!({ "id": "p1" })] {
            let product = registry.call("shopify_get_product", &args).unwrap();
            assert_eq!(product["title"], json!("Cap"));
        }

        let updated = registry
            .call("shopify_update_product", &json!(["p1", { "price": 15 }]))
            .unwrap();
        assert_eq!(updated["price"], json!(15));
        let updated = registry
            .call("shopify_update_product", &json!({ "id": "p1", "updates": { "sku": "CAP" } }))
            .unwrap();
        assert_eq!(updated["sku"], json!("CAP"));

        assert_eq!(registry.call("shopify_delete_product", &json!(["p1"])).unwrap(), json!(true));
        assert!(matches!(
            registry.call("shopify_get_product", &json!("p1")),
            Err(FunctionError::NotFound(_))
        ));
    }

    #[test]
    fn test_missing_id_is_validation_error() {
        let mut registry = configured();
        let err = registry.call("shopify_get_product", &Value::Null).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Missing required fields in shopify_get_product arguments: id"
        );
        assert!(matches!(
            registry.call("shopify_delete_product", &json!([{ "nested": true }])),
            Err(FunctionError::TypeInput(_))
        ));
    }

    #[test]
    fn test_facades_share_one_store() {
        let mut registry = configured();
        registry
            .call("shopify_create_product", &json!({ "title": "Mug", "price": 4, "sku": "M", "quantity": 1 }))
            .unwrap();
        let page = registry.call("shopify_list_products", &json!({})).unwrap();
        let rows = registry
            .call("sheets_export_inventory", &json!({ "products": page["items"] }))
            .unwrap();
        assert_eq!(rows, json!([["M", "Mug", 1, 4]]));
        assert_eq!(registry.store().sheet_names(), ["Inventory"]);
    }

    #[test]
    fn test_reset_clears_store_and_configuration() {
        let mut registry = configured();
        registry
            .call("shopify_create_product", &json!({ "title": "Mug", "price": 4 }))
            .unwrap();
        registry.reset();

        assert!(registry.shopify().config().is_none());
        assert!(registry.sheets().config().is_none());
        assert!(matches!(
            registry.call("shopify_list_products", &Value::Null),
            Err(FunctionError::NotConfigured { .. })
        ));
        assert!(registry.store().get_product("prod_1").is_none());
    }
}
