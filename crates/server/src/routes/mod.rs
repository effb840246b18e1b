//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//!
//! # Discovery
//! GET  /api                    - Servers and their functions
//! HEAD /api                    - Lightweight availability check
//!
//! # Functions
//! POST /api/functions/{name}   - Invoke a function with a JSON argument
//! ```

pub mod discovery;
pub mod functions;

use axum::{Router, routing::get};

use crate::state::AppState;

/// Build the complete application router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .merge(discovery::router())
        .merge(functions::router())
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running.
async fn health() -> &'static str {
    "ok"
}
