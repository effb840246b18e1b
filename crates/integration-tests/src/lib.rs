//! Integration tests for Stockline.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p stockline-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `http_api` - discovery and invocation over a real TCP listener
//! - `workflows` - multi-step inventory and sheet workflows through the
//!   function registry
//!
//! Each test gets its own server and store; nothing is shared between tests.

use reqwest::{Client, Response};
use serde_json::Value;
use stockline_server::state::AppState;

/// A server bound to an ephemeral local port.
pub struct TestServer {
    pub base_url: String,
    pub client: Client,
    pub state: AppState,
}

impl TestServer {
    /// Start a server over a fresh, empty store.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    pub async fn start() -> Self {
        Self::with_state(AppState::default()).await
    }

    /// Start a server over existing state.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    pub async fn with_state(state: AppState) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Listener has no address");
        let app = stockline_server::app(state.clone());

        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Test server error");
        });

        Self {
            base_url: format!("http://{addr}"),
            client: Client::new(),
            state,
        }
    }

    /// `POST /api/functions/{name}` with a JSON body.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    pub async fn call(&self, name: &str, args: &Value) -> Response {
        self.client
            .post(format!("{}/api/functions/{name}", self.base_url))
            .json(args)
            .send()
            .await
            .expect("Failed to send function call")
    }

    /// Call a function that must succeed and return its JSON result.
    ///
    /// # Panics
    ///
    /// Panics if the call fails or the response is not JSON.
    pub async fn call_ok(&self, name: &str, args: &Value) -> Value {
        let response = self.call(name, args).await;
        let status = response.status();
        let body: Value = response.json().await.expect("Response was not JSON");
        assert!(status.is_success(), "{name} failed with {status}: {body}");
        body
    }
}
