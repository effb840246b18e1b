//! Static discovery metadata for the function surface.
//!
//! Functions are grouped by the server that would host them. The catalog is
//! the single list of names the registry dispatches and the discovery
//! endpoint advertises.

use serde::{Deserialize, Serialize};

/// Id of the Shopify server.
pub const SHOPIFY_SERVER: &str = "shopify";

/// Id of the Google Sheets server.
pub const SHEETS_SERVER: &str = "google-sheets";

/// A single callable function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionInfo {
    pub name: String,
    pub description: String,
}

/// A group of functions under one server id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerInfo {
    pub id: String,
    pub name: String,
    pub description: String,
    pub functions: Vec<FunctionInfo>,
}

fn function(name: &str, description: &str) -> FunctionInfo {
    FunctionInfo {
        name: name.to_string(),
        description: description.to_string(),
    }
}

/// Shopify functions.
#[must_use]
pub fn shopify_functions() -> Vec<FunctionInfo> {
    vec![
        function("shopify_configure", "Configure Shopify connection with store credentials."),
        function("shopify_list_products", "List all products from the Shopify store with pagination."),
        function("shopify_get_product", "Retrieve detailed information for a specific product."),
        function("shopify_create_product", "Create a new product in the Shopify store."),
        function("shopify_update_product", "Update an existing Shopify product."),
        function("shopify_delete_product", "Delete a product from Shopify."),
        function("shopify_update_inventory", "Update inventory levels for a product variant."),
        function("shopify_bulk_sync", "Bulk sync products from local inventory to Shopify."),
        function("shopify_get_orders", "Retrieve orders from Shopify."),
        function("shopify_create_collection", "Create a product collection in Shopify."),
    ]
}

/// Google Sheets functions.
#[must_use]
pub fn sheets_functions() -> Vec<FunctionInfo> {
    vec![
        function("sheets_configure", "Configure Google Sheets connection with credentials."),
        function("sheets_create_spreadsheet", "Create a new Google Sheets spreadsheet."),
        function("sheets_export_inventory", "Export inventory data to Google Sheets."),
        function("sheets_import_inventory", "Import inventory data from Google Sheets."),
        function("sheets_update_product", "Update a single product in Google Sheets."),
        function("sheets_bulk_update", "Bulk update multiple products in a sheet."),
        function("sheets_create_report", "Create inventory reports such as low stock summaries."),
        function("sheets_get_data", "Get data from a specific range in a sheet."),
        function("sheets_append_data", "Append data to the end of a sheet."),
        function("sheets_clear_data", "Clear data from a specified range."),
        function("sheets_create_pivot", "Create a pivot table for inventory analysis."),
        function("sheets_format_sheet", "Apply formatting to inventory sheets."),
    ]
}

/// Every server with its functions, in discovery order.
#[must_use]
pub fn servers() -> Vec<ServerInfo> {
    vec![
        ServerInfo {
            id: SHOPIFY_SERVER.to_string(),
            name: "Shopify MCP Server".to_string(),
            description: "Provides Shopify inventory management and synchronization capabilities."
                .to_string(),
            functions: shopify_functions(),
        },
        ServerInfo {
            id: SHEETS_SERVER.to_string(),
            name: "Google Sheets MCP Server".to_string(),
            description: "Enables inventory data management and reporting through Google Sheets."
                .to_string(),
            functions: sheets_functions(),
        },
    ]
}

/// Every function across all servers.
#[must_use]
pub fn all_functions() -> Vec<FunctionInfo> {
    let mut functions = shopify_functions();
    functions.extend(sheets_functions());
    functions
}

/// Look up a function by name.
#[must_use]
pub fn get_function_by_name(name: &str) -> Option<FunctionInfo> {
    all_functions().into_iter().find(|f| f.name == name)
}

/// Id of the server hosting `name`.
#[must_use]
pub fn server_for_function(name: &str) -> Option<&'static str> {
    if shopify_functions().iter().any(|f| f.name == name) {
        Some(SHOPIFY_SERVER)
    } else if sheets_functions().iter().any(|f| f.name == name) {
        Some(SHEETS_SERVER)
    } else {
        None
    }
}

#[cfg(test)]
#[allow(clippy::indexing_slicing)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_server_counts() {
        let servers = servers();
        assert_eq!(servers.len(), 2);
        assert_eq!(servers[0].id, "shopify");
        assert_eq!(servers[0].functions.len(), 10);
        assert_eq!(servers[1].id, "google-sheets");
        assert_eq!(servers[1].functions.len(), 12);
    }

    #[test]
    fn test_names_are_unique_and_prefixed() {
        let all = all_functions();
        let names: HashSet<&str> = all.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names.len(), all.len());

        for server in servers() {
            let prefix = if server.id == SHOPIFY_SERVER { "shopify_" } else { "sheets_" };
            assert!(server.functions.iter().all(|f| f.name.starts_with(prefix)));
        }
    }

    #[test]
    fn test_lookup() {
        assert_eq!(
            get_function_by_name("sheets_format_sheet").map(|f| f.description),
            Some("Apply formatting to inventory sheets.".to_string())
        );
        assert_eq!(server_for_function("shopify_bulk_sync"), Some(SHOPIFY_SERVER));
        assert_eq!(server_for_function("sheets_get_data"), Some(SHEETS_SERVER));
        assert!(server_for_function("nope").is_none());
    }
}
