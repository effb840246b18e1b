//! Discovery endpoint listing the available servers and functions.

use axum::{Json, Router, routing::get};
use serde::{Deserialize, Serialize};
use stockline_core::functions::{ServerInfo, servers};

use crate::state::AppState;

/// Build the discovery router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api", get(discover).head(ping))
}

/// Body of `GET /api`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveryResponse {
    pub status: String,
    pub servers: Vec<ServerInfo>,
}

/// Body of `HEAD /api`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
}

/// List every server with its functions.
pub async fn discover() -> Json<DiscoveryResponse> {
    Json(DiscoveryResponse {
        status: "ok".to_string(),
        servers: servers(),
    })
}

/// Availability check without the server list.
pub async fn ping() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "ok".to_string(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use axum::{
        body::{Body, to_bytes},
        http::{Method, Request, StatusCode},
    };
    use tower::ServiceExt;

    use super::*;

    fn app() -> Router {
        router().with_state(AppState::default())
    }

    #[tokio::test]
    async fn test_get_lists_servers() {
        let response = app()
            .oneshot(Request::get("/api").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: DiscoveryResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.status, "ok");
        assert_eq!(body.servers.len(), 2);
        assert_eq!(body.servers[0].name, "Shopify MCP Server");
        assert_eq!(body.servers[1].functions[0].name, "sheets_configure");
    }

    #[tokio::test]
    async fn test_head_is_ok() {
        let response = app()
            .oneshot(
                Request::builder()
                    .method(Method::HEAD)
                    .uri("/api")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_ping_body() {
        let Json(body) = ping().await;
        assert_eq!(body.status, "ok");
    }
}
