//! Shopify Admin API commands: webhooks and app billing subscriptions.
//!
//! # Environment Variables
//!
//! - `SHOPIFY_STORE` - Shopify store domain
//! - `SHOPIFY_ACCESS_TOKEN` - Admin API access token
//! - `SHOPIFY_API_VERSION` - API version (default: 2025-04)

use serde_json::Value;
use stockline_server::config::ShopifyAppConfig;
use stockline_server::shopify::{
    AppSubscriptionInput, ShopifyClient, WebhookSubscriptionInput,
};

fn client() -> Result<ShopifyClient, Box<dyn std::error::Error>> {
    let config = ShopifyAppConfig::require_from_env()?;
    tracing::debug!(store = %config.store, "Connecting to Shopify");
    Ok(ShopifyClient::new(&config)?)
}

/// Print configured webhook subscriptions.
///
/// # Errors
///
/// Returns an error if credentials are missing or the request fails.
pub async fn list_webhooks(limit: Option<u32>) -> Result<(), Box<dyn std::error::Error>> {
    let hooks = client()?.list_webhook_subscriptions(limit).await?;
    tracing::info!(count = hooks.len(), "Fetched webhook subscriptions");
    super::print_json(&hooks);
    Ok(())
}

/// Register a webhook subscription and print it.
///
/// # Errors
///
/// Returns an error if credentials are missing or Shopify rejects the input.
pub async fn register_webhook(
    topic: &str,
    callback_url: &str,
    format: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut input = WebhookSubscriptionInput::new(topic, callback_url);
    format.clone_into(&mut input.format);

    let hook = client()?.register_webhook_subscription(&input).await?;
    tracing::info!(id = %hook.id, topic = %hook.topic, "Registered webhook subscription");
    super::print_json(&hook);
    Ok(())
}

/// Delete a webhook subscription.
///
/// # Errors
///
/// Returns an error if credentials are missing or Shopify refuses.
pub async fn delete_webhook(id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let deleted = client()?.delete_webhook_subscription(id).await?;
    tracing::info!(id = %deleted, "Deleted webhook subscription");
    Ok(())
}

/// Print app subscription contracts.
///
/// # Errors
///
/// Returns an error if credentials are missing or the request fails.
pub async fn list_subscriptions(limit: Option<u32>) -> Result<(), Box<dyn std::error::Error>> {
    let subscriptions = client()?.app_subscriptions_feed(limit).await?;
    super::print_json(&subscriptions);
    Ok(())
}

/// Create an app subscription and print the confirmation URL.
///
/// `line_items` is a JSON array of `AppSubscriptionLineItemInput` objects.
///
/// # Errors
///
/// Returns an error if `line_items` is not a JSON array, credentials are
/// missing, or Shopify rejects the input.
pub async fn create_subscription(
    name: &str,
    line_items: &str,
    return_url: &str,
    trial_days: i64,
    test: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let line_items: Vec<Value> = serde_json::from_str(line_items)
        .map_err(|e| format!("--line-items must be a JSON array: {e}"))?;

    let input = AppSubscriptionInput {
        name: name.to_owned(),
        line_items,
        return_url: return_url.to_owned(),
        trial_days,
        test,
    };

    let created = client()?.create_app_subscription(&input).await?;
    if let Some(url) = &created.confirmation_url {
        tracing::info!(%url, "Merchant must approve the charge");
    }
    super::print_json(&created);
    Ok(())
}
