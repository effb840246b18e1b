//! Domain types for the Shopify Admin operations we issue.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// =============================================================================
// Connections
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Connection<T> {
    pub edges: Vec<Edge<T>>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Edge<T> {
    pub node: T,
}

impl<T> Connection<T> {
    pub fn into_nodes(self) -> Vec<T> {
        self.edges.into_iter().map(|edge| edge.node).collect()
    }
}

/// A mutation user error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserError {
    /// Path to the offending input field.
    pub field: Option<Vec<String>>,
    pub message: String,
}

// =============================================================================
// Webhooks
// =============================================================================

/// A webhook subscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookSubscription {
    /// Shopify ID (e.g., `gid://shopify/WebhookSubscription/1`).
    pub id: String,
    /// Event topic (e.g., `ORDERS_CREATE`).
    pub topic: String,
    /// Payload format (`JSON` or `XML`).
    pub format: String,
    pub callback_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input for registering a webhook subscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookSubscriptionInput {
    pub topic: String,
    pub callback_url: String,
    /// Payload format (default: `JSON`).
    #[serde(default = "default_webhook_format")]
    pub format: String,
}

fn default_webhook_format() -> String {
    "JSON".to_string()
}

impl WebhookSubscriptionInput {
    /// Input with the default `JSON` format.
    #[must_use]
    pub fn new(topic: impl Into<String>, callback_url: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            callback_url: callback_url.into(),
            format: default_webhook_format(),
        }
    }
}

// =============================================================================
// App subscriptions
// =============================================================================

/// An app billing subscription.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSubscription {
    pub id: String,
    pub name: String,
    pub status: String,
    pub test: bool,
    pub trial_days: i64,
    pub created_at: DateTime<Utc>,
    pub current_period_end: Option<DateTime<Utc>>,
    /// Line items with their pricing details, as returned.
    #[serde(default)]
    pub line_items: Vec<Value>,
}

/// Input for creating an app subscription.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSubscriptionInput {
    pub name: String,
    /// `AppSubscriptionLineItemInput` objects, passed through unchanged.
    pub line_items: Vec<Value>,
    pub return_url: String,
    #[serde(default)]
    pub trial_days: i64,
    #[serde(default)]
    pub test: bool,
}

/// Summary of a newly created app subscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedAppSubscription {
    pub id: String,
    pub name: String,
    pub status: String,
    pub trial_days: i64,
    pub test: bool,
}

/// Result of creating an app subscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSubscriptionCreated {
    /// URL the merchant must visit to approve the charge.
    pub confirmation_url: Option<String>,
    pub subscription: Option<CreatedAppSubscription>,
}
