//! Shopify Admin GraphQL client.
//!
//! A small client for the Admin API operations that have no in-memory
//! counterpart: webhook subscriptions and app billing subscriptions. The
//! façades never call it; the CLI does.
//!
//! # Example
//!
//! ```rust,ignore
//! use stockline_server::shopify::ShopifyClient;
//!
//! let client = ShopifyClient::new(&config)?;
//! let hooks = client.list_webhook_subscriptions(None).await?;
//! ```

mod client;
pub mod types;

pub use client::{DEFAULT_APP_SUBSCRIPTION_LIMIT, DEFAULT_WEBHOOK_LIMIT, MAX_PAGE_LIMIT, ShopifyClient};
pub use types::*;

use thiserror::Error;

/// Errors that can occur when talking to the Shopify Admin API.
#[derive(Debug, Error)]
pub enum ShopifyClientError {
    /// Store domain or access token missing.
    #[error("Missing Shopify config values: {}", .0.join(", "))]
    MissingConfig(Vec<&'static str>),

    /// The store domain does not form a valid endpoint URL.
    #[error("Invalid Shopify endpoint: {0}")]
    InvalidEndpoint(#[from] url::ParseError),

    /// A required argument was not supplied.
    #[error("{0}")]
    MissingArgument(&'static str),

    /// Shopify answered with a non-success HTTP status.
    #[error("Shopify GraphQL error ({status}): {body}")]
    Status { status: u16, body: String },

    /// GraphQL query returned errors.
    #[error("Shopify GraphQL returned errors: {}", format_graphql_errors(.0))]
    GraphQL(Vec<GraphQLError>),

    /// A mutation reported user errors.
    #[error("{operation} error: {}", format_user_errors(.errors))]
    UserErrors {
        operation: &'static str,
        errors: Vec<UserError>,
    },

    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The response carried no data for the operation.
    #[error("No data in response for {0}")]
    MissingData(&'static str),
}

/// A GraphQL error returned by the Shopify Admin API.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct GraphQLError {
    /// Error message.
    pub message: String,
    /// Path to the error in the response.
    #[serde(default)]
    pub path: Vec<serde_json::Value>,
}

fn format_graphql_errors(errors: &[GraphQLError]) -> String {
    errors
        .iter()
        .map(|e| e.message.clone())
        .collect::<Vec<_>>()
        .join("; ")
}

fn format_user_errors(errors: &[UserError]) -> String {
    errors
        .iter()
        .map(|e| match &e.field {
            Some(field) if !field.is_empty() => format!("{}: {}", field.join("."), e.message),
            _ => e.message.clone(),
        })
        .collect::<Vec<_>>()
        .join("; ")
}
