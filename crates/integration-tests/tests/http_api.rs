//! HTTP tests for discovery and function invocation.
//!
//! Each test starts its own server on an ephemeral port.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use reqwest::StatusCode;
use serde_json::{Value, json};
use stockline_core::FunctionRegistry;
use stockline_integration_tests::TestServer;
use stockline_server::state::AppState;

#[tokio::test]
async fn test_health() {
    let server = TestServer::start().await;
    let resp = server
        .client
        .get(format!("{}/health", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.unwrap(), "ok");
}

#[tokio::test]
async fn test_discovery_lists_every_function() {
    let server = TestServer::start().await;
    let body: Value = server
        .client
        .get(format!("{}/api", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["status"], "ok");
    let servers = body["servers"].as_array().unwrap();
    assert_eq!(servers.len(), 2);
    assert_eq!(servers[0]["id"], "shopify");
    assert_eq!(servers[1]["id"], "google-sheets");

    // Every advertised function can be dispatched
    let mut registry = FunctionRegistry::default();
    for server in servers {
        for function in server["functions"].as_array().unwrap() {
            let name = function["name"].as_str().unwrap();
            let result = registry.call(name, &Value::Null);
            assert!(
                !matches!(result, Err(stockline_core::FunctionError::UnknownFunction(_))),
                "{name} is advertised but not dispatched"
            );
        }
    }
}

#[tokio::test]
async fn test_head_ping() {
    let server = TestServer::start().await;
    let resp = server
        .client
        .head(format!("{}/api", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_error_statuses() {
    let server = TestServer::start().await;

    let resp = server.call("shopify_list_products", &Value::Null).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["kind"], "not_configured");
    assert_eq!(
        body["error"],
        "Shopify service not configured. Call shopify_configure first."
    );

    let resp = server.call("shopify_configure", &json!({ "shopDomain": "s" })).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["kind"], "validation");
    assert!(body["error"].as_str().unwrap().contains("accessToken"));

    let resp = server.call("shopify_teleport", &json!({})).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    server
        .call_ok(
            "shopify_configure",
            &json!({ "shopDomain": "example.myshopify.com", "accessToken": "token" }),
        )
        .await;
    let resp = server.call("shopify_get_product", &json!("prod_missing")).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Product prod_missing not found");
}

#[tokio::test]
async fn test_invalid_json_body() {
    let server = TestServer::start().await;
    let resp = server
        .client
        .post(format!("{}/api/functions/sheets_get_data", server.base_url))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["kind"], "bad_request");
}

#[tokio::test]
async fn test_state_is_shared_across_requests() {
    let server = TestServer::with_state(AppState::default()).await;
    server
        .call_ok(
            "shopify_configure",
            &json!({ "shopDomain": "example.myshopify.com", "accessToken": "token" }),
        )
        .await;
    server
        .call_ok(
            "shopify_create_product",
            &json!({ "id": "prod_mug", "title": "Mug", "price": 12, "sku": "MUG-1", "quantity": 4 }),
        )
        .await;

    // The HTTP surface and the state handle see the same store
    let stored = server.state.store().get_product("prod_mug").unwrap();
    assert_eq!(stored.sku, "MUG-1");

    let page = server.call_ok("shopify_list_products", &json!({ "pageSize": 5 })).await;
    assert_eq!(page["total"], 1);
    assert_eq!(page["pageSize"], 5);
}
