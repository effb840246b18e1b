//! Stockline server library.
//!
//! Serves the function surface of `stockline-core` over HTTP: discovery at
//! `GET /api` and invocation at `POST /api/functions/{name}`. Also carries
//! the Shopify Admin GraphQL client used by the CLI.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod routes;
pub mod seed;
pub mod shopify;
pub mod state;

use axum::Router;
use stockline_core::{FunctionError, FunctionRegistry, InventoryStore};
use thiserror::Error;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use config::ServerConfig;
use seed::{SeedData, SeedError};
use state::AppState;

/// Errors that can occur while preparing application state.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Seed(#[from] SeedError),
    #[error("Shopify configuration rejected: {0}")]
    Shopify(#[from] FunctionError),
}

/// Build application state from configuration.
///
/// Loads the seed file into a fresh store and, when Shopify credentials are
/// configured, runs `shopify_configure` with them.
///
/// # Errors
///
/// Returns `StartupError` if the seed file cannot be loaded or the Shopify
/// credentials are rejected.
pub async fn build_state(config: &ServerConfig) -> Result<AppState, StartupError> {
    let store = InventoryStore::new();

    if let Some(path) = &config.seed_file {
        SeedData::from_file(path).await?.apply(&store);
    }

    let mut registry = FunctionRegistry::new(store);
    if let Some(shopify) = &config.shopify {
        registry.call("shopify_configure", &shopify.configure_payload())?;
        tracing::info!(store = %shopify.store, "Shopify façade configured from environment");
    }

    Ok(AppState::new(registry))
}

/// Build the application router with request tracing.
pub fn app(state: AppState) -> Router {
    routes::routes()
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}
