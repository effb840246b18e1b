//! End-to-end inventory and sheet workflows over HTTP.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use serde_json::{Value, json};
use stockline_integration_tests::TestServer;

async fn configured_server() -> TestServer {
    let server = TestServer::start().await;
    server
        .call_ok(
            "shopify_configure",
            &json!({ "shopDomain": "example.myshopify.com", "accessToken": "token" }),
        )
        .await;
    server
        .call_ok(
            "sheets_configure",
            &json!({ "credentials": { "client_email": "bot@example.com" }, "spreadsheetId": "sheet_1" }),
        )
        .await;
    server
}

#[tokio::test]
async fn test_create_list_and_restock() {
    let server = configured_server().await;

    let created = server
        .call_ok(
            "shopify_create_product",
            &json!({ "title": "Product 1", "price": 10, "sku": "SKU1", "quantity": 5 }),
        )
        .await;
    assert_eq!(created["title"], "Product 1");
    let id = created["id"].as_str().unwrap().to_string();

    let page = server.call_ok("shopify_list_products", &Value::Null).await;
    assert_eq!(page["total"], 1);

    let updated = server
        .call_ok(
            "shopify_update_inventory",
            &json!({ "productId": id, "quantity": 3 }),
        )
        .await;
    assert_eq!(updated["quantity"].as_f64(), Some(3.0));
}

#[tokio::test]
async fn test_bulk_sync_collapses_duplicate_ids() {
    let server = configured_server().await;

    let synced = server
        .call_ok(
            "shopify_bulk_sync",
            &json!({
                "products": [
                    { "id": "prod_a", "title": "First", "price": 1, "quantity": 1 },
                    { "id": "prod_a", "title": "Second", "price": 2, "quantity": 7 }
                ]
            }),
        )
        .await;
    assert_eq!(synced.as_array().unwrap().len(), 2);

    let page = server.call_ok("shopify_list_products", &Value::Null).await;
    assert_eq!(page["total"], 1);
    let stored = &page["items"][0];
    assert_eq!(stored["id"], "prod_a");
    assert_eq!(stored["title"], "Second");
    assert_eq!(stored["price"].as_f64(), Some(2.0));
    assert_eq!(stored["quantity"].as_f64(), Some(7.0));
}

#[tokio::test]
async fn test_export_then_import() {
    let server = configured_server().await;

    let rows = server
        .call_ok(
            "sheets_export_inventory",
            &json!({
                "products": [
                    { "sku": "SKU1", "title": "Mug", "quantity": 4, "price": 12 },
                    { "sku": "SKU2", "title": "Plate", "quantity": 1, "price": 8 }
                ]
            }),
        )
        .await;
    assert_eq!(rows.as_array().unwrap().len(), 2);

    let imported = server.call_ok("sheets_import_inventory", &json!({})).await;
    let imported = imported.as_array().unwrap();
    assert_eq!(imported.len(), 2);
    assert_eq!(imported[0]["sku"], "SKU1");
    assert_eq!(imported[1]["sku"], "SKU2");
}

#[tokio::test]
async fn test_low_stock_report_and_custom_sheet() {
    let server = configured_server().await;

    let report = server
        .call_ok(
            "sheets_create_report",
            &json!({
                "reportType": "low_stock",
                "data": { "threshold": 2, "products": [{ "sku": "SKU1", "quantity": 1 }] }
            }),
        )
        .await;
    assert_eq!(report["rows"].as_array().unwrap().len(), 1);

    server
        .call_ok(
            "sheets_append_data",
            &json!({ "sheetName": "Custom", "rows": [["x", "y"]] }),
        )
        .await;
    let data = server
        .call_ok("sheets_get_data", &json!({ "sheetName": "Custom" }))
        .await;
    assert_eq!(data, json!([["x", "y"]]));

    let untouched = server
        .call_ok("sheets_get_data", &json!({ "sheetName": "Never Written" }))
        .await;
    assert_eq!(untouched, json!([]));
}

#[tokio::test]
async fn test_create_product_with_existing_id_overwrites() {
    let server = configured_server().await;

    server
        .call_ok(
            "shopify_create_product",
            &json!({ "id": "prod_x", "title": "Old", "price": 1, "metadata": { "a": 1 } }),
        )
        .await;
    let second = server
        .call_ok(
            "shopify_create_product",
            &json!({ "id": "prod_x", "title": "New", "price": 2, "metadata": { "b": 2 } }),
        )
        .await;

    assert_eq!(second["title"], "New");
    assert_eq!(second["metadata"], json!({ "a": 1, "b": 2 }));
    let page = server.call_ok("shopify_list_products", &Value::Null).await;
    assert_eq!(page["total"], 1);
}

#[tokio::test]
async fn test_shopify_products_flow_into_sheet_update() {
    let server = configured_server().await;

    server
        .call_ok(
            "sheets_export_inventory",
            &json!({ "products": [{ "sku": "SKU1", "title": "Mug", "quantity": 4, "price": 12 }] }),
        )
        .await;
    let rows = server
        .call_ok(
            "sheets_update_product",
            &json!({ "sku": "SKU1", "title": "Mug", "quantity": 9, "price": 12 }),
        )
        .await;
    assert_eq!(rows.as_array().unwrap().len(), 1);

    let imported = server.call_ok("sheets_import_inventory", &Value::Null).await;
    assert_eq!(imported[0]["quantity"].as_f64(), Some(9.0));
}
