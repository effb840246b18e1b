//! Shopify Admin API GraphQL client.
//!
//! Queries are plain documents posted as `{query, variables}`; responses are
//! deserialized into the types in [`super::types`].

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::{Value, json};
use tracing::{debug, instrument};
use url::Url;

use crate::config::ShopifyAppConfig;

use super::{
    GraphQLError, ShopifyClientError,
    types::{
        AppSubscription, AppSubscriptionCreated, AppSubscriptionInput, Connection,
        CreatedAppSubscription, UserError, WebhookSubscription, WebhookSubscriptionInput,
    },
};

/// Largest page Shopify serves for a connection.
pub const MAX_PAGE_LIMIT: u32 = 250;

/// Webhook subscriptions fetched when no limit is given.
pub const DEFAULT_WEBHOOK_LIMIT: u32 = 50;

/// App subscriptions fetched when no limit is given.
pub const DEFAULT_APP_SUBSCRIPTION_LIMIT: u32 = 25;

const WEBHOOK_SUBSCRIPTIONS_QUERY: &str = r"
query webhookSubscriptions($first: Int!) {
  webhookSubscriptions(first: $first) {
    edges {
      node {
        id
        topic
        format
        callbackUrl
        createdAt
      }
    }
  }
}";

const WEBHOOK_SUBSCRIPTION_CREATE: &str = r"
mutation webhookSubscriptionCreate($topic: WebhookSubscriptionTopic!, $callbackUrl: URL!, $format: WebhookSubscriptionFormat!) {
  webhookSubscriptionCreate(topic: $topic, webhookSubscription: { callbackUrl: $callbackUrl, format: $format }) {
    userErrors { field message }
    webhookSubscription { id topic format callbackUrl createdAt }
  }
}";

const WEBHOOK_SUBSCRIPTION_DELETE: &str = r"
mutation webhookSubscriptionDelete($id: ID!) {
  webhookSubscriptionDelete(id: $id) {
    userErrors { field message }
    deletedWebhookSubscriptionId
  }
}";

const APP_SUBSCRIPTIONS_QUERY: &str = r"
query appSubscriptions($first: Int!) {
  appSubscriptions(first: $first) {
    edges {
      node {
        id
        name
        status
        test
        trialDays
        createdAt
        currentPeriodEnd
        lineItems {
          plan {
            pricingDetails {
              __typename
              ... on AppSubscriptionPlanFixedPricing {
                price { amount currencyCode }
                interval
              }
              ... on AppSubscriptionPlanUsagePricing {
                cappedAmount { amount currencyCode }
                terms
              }
            }
          }
        }
      }
    }
  }
}";

const APP_SUBSCRIPTION_CREATE: &str = r"
mutation appSubscriptionCreate($name: String!, $returnUrl: URL!, $lineItems: [AppSubscriptionLineItemInput!]!, $trialDays: Int, $test: Boolean) {
  appSubscriptionCreate(name: $name, returnUrl: $returnUrl, lineItems: $lineItems, trialDays: $trialDays, test: $test) {
    userErrors { field message }
    confirmationUrl
    appSubscription { id name status trialDays test }
  }
}";

/// Shopify Admin API client.
///
/// Cheap to clone; clones share one HTTP connection pool.
#[derive(Clone)]
pub struct ShopifyClient {
    inner: Arc<ShopifyClientInner>,
}

struct ShopifyClientInner {
    client: reqwest::Client,
    endpoint: Url,
    access_token: SecretString,
}

impl std::fmt::Debug for ShopifyClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopifyClient")
            .field("endpoint", &self.inner.endpoint.as_str())
            .field("access_token", &"[REDACTED]")
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct GraphQLResponse<T> {
    data: Option<T>,
    errors: Option<Vec<GraphQLError>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WebhookSubscriptionsData {
    webhook_subscriptions: Connection<WebhookSubscription>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WebhookSubscriptionCreateData {
    webhook_subscription_create: WebhookSubscriptionCreatePayload,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WebhookSubscriptionCreatePayload {
    #[serde(default)]
    user_errors: Vec<UserError>,
    webhook_subscription: Option<WebhookSubscription>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WebhookSubscriptionDeleteData {
    webhook_subscription_delete: WebhookSubscriptionDeletePayload,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WebhookSubscriptionDeletePayload {
    #[serde(default)]
    user_errors: Vec<UserError>,
    deleted_webhook_subscription_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppSubscriptionsData {
    app_subscriptions: Connection<AppSubscription>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppSubscriptionCreateData {
    app_subscription_create: AppSubscriptionCreatePayload,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppSubscriptionCreatePayload {
    #[serde(default)]
    user_errors: Vec<UserError>,
    confirmation_url: Option<String>,
    app_subscription: Option<CreatedAppSubscription>,
}

/// Build the Admin GraphQL endpoint for a shop.
///
/// # Errors
///
/// Returns `MissingConfig` for an empty domain and `InvalidEndpoint` if the
/// domain does not form a URL.
fn graphql_endpoint(shop_domain: &str, api_version: &str) -> Result<Url, ShopifyClientError> {
    let shop_domain = shop_domain.trim();
    if shop_domain.is_empty() {
        return Err(ShopifyClientError::MissingConfig(vec!["shopDomain"]));
    }
    Ok(Url::parse(&format!(
        "https://{shop_domain}/admin/api/{api_version}/graphql.json"
    ))?)
}

fn clamp_limit(limit: Option<u32>, default: u32) -> u32 {
    limit.unwrap_or(default).min(MAX_PAGE_LIMIT)
}

fn check_user_errors(
    operation: &'static str,
    errors: Vec<UserError>,
) -> Result<(), ShopifyClientError> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ShopifyClientError::UserErrors { operation, errors })
    }
}

impl ShopifyClient {
    /// Create a client from loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns `MissingConfig` naming every empty credential, or
    /// `InvalidEndpoint` if the store domain is not a valid host.
    pub fn new(config: &ShopifyAppConfig) -> Result<Self, ShopifyClientError> {
        let mut missing = Vec::new();
        if config.store.trim().is_empty() {
            missing.push("shopDomain");
        }
        if config.access_token.expose_secret().trim().is_empty() {
            missing.push("accessToken");
        }
        if !missing.is_empty() {
            return Err(ShopifyClientError::MissingConfig(missing));
        }

        let endpoint = graphql_endpoint(&config.store, &config.api_version)?;
        Ok(Self::with_endpoint(endpoint, config.access_token.clone()))
    }

    /// Create a client that posts to an explicit endpoint.
    #[must_use]
    pub fn with_endpoint(endpoint: Url, access_token: SecretString) -> Self {
        Self {
            inner: Arc::new(ShopifyClientInner {
                client: reqwest::Client::new(),
                endpoint,
                access_token,
            }),
        }
    }

    /// The GraphQL endpoint this client posts to.
    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.inner.endpoint
    }

    /// Execute a GraphQL document.
    async fn execute<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: Value,
    ) -> Result<T, ShopifyClientError> {
        let response = self
            .inner
            .client
            .post(self.inner.endpoint.clone())
            .header("X-Shopify-Access-Token", self.inner.access_token.expose_secret())
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ShopifyClientError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        let graphql_response: GraphQLResponse<T> = serde_json::from_slice(&bytes)?;

        // Check for GraphQL errors
        if let Some(errors) = graphql_response.errors
            && !errors.is_empty()
        {
            return Err(ShopifyClientError::GraphQL(errors));
        }

        graphql_response
            .data
            .ok_or(ShopifyClientError::MissingData("GraphQL request"))
    }

    // =========================================================================
    // Webhook subscriptions
    // =========================================================================

    /// List webhook subscriptions (at most 250; default 50).
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self))]
    pub async fn list_webhook_subscriptions(
        &self,
        limit: Option<u32>,
    ) -> Result<Vec<WebhookSubscription>, ShopifyClientError> {
        let first = clamp_limit(limit, DEFAULT_WEBHOOK_LIMIT);
        let data: WebhookSubscriptionsData = self
            .execute(WEBHOOK_SUBSCRIPTIONS_QUERY, json!({ "first": first }))
            .await?;
        let hooks = data.webhook_subscriptions.into_nodes();
        debug!(count = hooks.len(), "webhook subscriptions fetched");
        Ok(hooks)
    }

    /// Register a webhook subscription.
    ///
    /// # Errors
    ///
    /// Returns `MissingArgument` if the topic or callback URL is empty, and
    /// `UserErrors` if Shopify rejects the subscription.
    #[instrument(skip(self, input), fields(topic = %input.topic))]
    pub async fn register_webhook_subscription(
        &self,
        input: &WebhookSubscriptionInput,
    ) -> Result<WebhookSubscription, ShopifyClientError> {
        if input.topic.trim().is_empty() || input.callback_url.trim().is_empty() {
            return Err(ShopifyClientError::MissingArgument(
                "Both topic and callbackUrl are required to register a webhook.",
            ));
        }

        let data: WebhookSubscriptionCreateData = self
            .execute(
                WEBHOOK_SUBSCRIPTION_CREATE,
                json!({
                    "topic": input.topic,
                    "callbackUrl": input.callback_url,
                    "format": input.format,
                }),
            )
            .await?;
        let result = data.webhook_subscription_create;
        check_user_errors("Webhook subscription", result.user_errors)?;
        result
            .webhook_subscription
            .ok_or(ShopifyClientError::MissingData("webhookSubscriptionCreate"))
    }

    /// Delete a webhook subscription and return its id.
    ///
    /// # Errors
    ///
    /// Returns `MissingArgument` for an empty id and `UserErrors` if Shopify
    /// refuses the deletion.
    #[instrument(skip(self))]
    pub async fn delete_webhook_subscription(&self, id: &str) -> Result<String, ShopifyClientError> {
        if id.trim().is_empty() {
            return Err(ShopifyClientError::MissingArgument(
                "Webhook subscription id is required.",
            ));
        }

        let data: WebhookSubscriptionDeleteData = self
            .execute(WEBHOOK_SUBSCRIPTION_DELETE, json!({ "id": id }))
            .await?;
        let result = data.webhook_subscription_delete;
        check_user_errors("Delete webhook", result.user_errors)?;
        result
            .deleted_webhook_subscription_id
            .ok_or(ShopifyClientError::MissingData("webhookSubscriptionDelete"))
    }

    // =========================================================================
    // App subscriptions
    // =========================================================================

    /// Feed of app subscription contracts (at most 250; default 25).
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self))]
    pub async fn app_subscriptions_feed(
        &self,
        limit: Option<u32>,
    ) -> Result<Vec<AppSubscription>, ShopifyClientError> {
        let first = clamp_limit(limit, DEFAULT_APP_SUBSCRIPTION_LIMIT);
        let data: AppSubscriptionsData = self
            .execute(APP_SUBSCRIPTIONS_QUERY, json!({ "first": first }))
            .await?;
        Ok(data.app_subscriptions.into_nodes())
    }

    /// Create an app subscription contract.
    ///
    /// # Errors
    ///
    /// Returns `MissingArgument` unless name, at least one line item and the
    /// return URL are given, and `UserErrors` if Shopify rejects the input.
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create_app_subscription(
        &self,
        input: &AppSubscriptionInput,
    ) -> Result<AppSubscriptionCreated, ShopifyClientError> {
        if input.name.trim().is_empty()
            || input.line_items.is_empty()
            || input.return_url.trim().is_empty()
        {
            return Err(ShopifyClientError::MissingArgument(
                "name, lineItems, and returnUrl are required to create an app subscription.",
            ));
        }

        let data: AppSubscriptionCreateData = self
            .execute(
                APP_SUBSCRIPTION_CREATE,
                json!({
                    "name": input.name,
                    "returnUrl": input.return_url,
                    "lineItems": input.line_items,
                    "trialDays": input.trial_days,
                    "test": input.test,
                }),
            )
            .await?;
        let result = data.app_subscription_create;
        check_user_errors("App subscription", result.user_errors)?;
        Ok(AppSubscriptionCreated {
            confirmation_url: result.confirmation_url,
            subscription: result.app_subscription,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::sync::Mutex;

    use axum::{Json, Router, http::HeaderMap, http::StatusCode, routing::post};

    use super::*;

    /// Serve one canned GraphQL response and record the requests it sees.
    async fn mock_shopify(
        status: StatusCode,
        response: Value,
    ) -> (ShopifyClient, Arc<Mutex<Vec<(Option<String>, Value)>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let recorder = seen.clone();
        let app = Router::new().route(
            "/admin/api/2025-04/graphql.json",
            post(move |headers: HeaderMap, Json(body): Json<Value>| {
                let recorder = recorder.clone();
                let response = response.clone();
                async move {
                    let token = headers
                        .get("X-Shopify-Access-Token")
                        .and_then(|v| v.to_str().ok())
                        .map(String::from);
                    recorder.lock().unwrap().push((token, body));
                    (status, Json(response))
                }
            }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let endpoint = Url::parse(&format!("http://{addr}/admin/api/2025-04/graphql.json")).unwrap();
        (
            ShopifyClient::with_endpoint(endpoint, SecretString::from("shpat_test")),
            seen,
        )
    }

    fn config(store: &str, token: &str) -> ShopifyAppConfig {
        ShopifyAppConfig {
            store: store.to_string(),
            access_token: SecretString::from(token),
            api_version: "2025-04".to_string(),
        }
    }

    #[test]
    fn test_endpoint_from_config() {
        let client = ShopifyClient::new(&config("shop.myshopify.com", "t")).unwrap();
        assert_eq!(
            client.endpoint().as_str(),
            "https://shop.myshopify.com/admin/api/2025-04/graphql.json"
        );
        assert!(!format!("{client:?}").contains("\"t\""));
    }

    #[test]
    fn test_missing_config_names_every_value() {
        let err = ShopifyClient::new(&config(" ", "")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Missing Shopify config values: shopDomain, accessToken"
        );
    }

    #[test]
    fn test_clamp_limit() {
        assert_eq!(clamp_limit(None, DEFAULT_WEBHOOK_LIMIT), 50);
        assert_eq!(clamp_limit(Some(10), DEFAULT_WEBHOOK_LIMIT), 10);
        assert_eq!(clamp_limit(Some(1000), DEFAULT_APP_SUBSCRIPTION_LIMIT), MAX_PAGE_LIMIT);
    }

    #[tokio::test]
    async fn test_list_webhook_subscriptions() {
        let (client, seen) = mock_shopify(
            StatusCode::OK,
            json!({
                "data": {
                    "webhookSubscriptions": {
                        "edges": [{
                            "node": {
                                "id": "gid://shopify/WebhookSubscription/1",
                                "topic": "ORDERS_CREATE",
                                "format": "JSON",
                                "callbackUrl": "https://example.com/hooks",
                                "createdAt": "2025-01-02T03:04:05Z"
                            }
                        }]
                    }
                }
            }),
        )
        .await;

        let hooks = client.list_webhook_subscriptions(Some(500)).await.unwrap();
        assert_eq!(hooks.len(), 1);
        assert_eq!(hooks[0].topic, "ORDERS_CREATE");

        let seen = seen.lock().unwrap();
        assert_eq!(seen[0].0.as_deref(), Some("shpat_test"));
        assert_eq!(seen[0].1["variables"], json!({ "first": 250 }));
    }

    #[tokio::test]
    async fn test_http_status_error() {
        let (client, _) = mock_shopify(StatusCode::UNAUTHORIZED, json!("bad token")).await;
        let err = client.app_subscriptions_feed(None).await.unwrap_err();
        assert_eq!(err.to_string(), "Shopify GraphQL error (401): \"bad token\"");
    }

    #[tokio::test]
    async fn test_graphql_errors() {
        let (client, _) = mock_shopify(
            StatusCode::OK,
            json!({ "errors": [{ "message": "Throttled" }] }),
        )
        .await;
        let err = client.list_webhook_subscriptions(None).await.unwrap_err();
        assert!(matches!(err, ShopifyClientError::GraphQL(ref errors) if errors[0].message == "Throttled"));
    }

    #[tokio::test]
    async fn test_missing_data() {
        let (client, _) = mock_shopify(StatusCode::OK, json!({ "data": null })).await;
        let err = client.list_webhook_subscriptions(None).await.unwrap_err();
        assert!(matches!(err, ShopifyClientError::MissingData(_)));
    }

    #[tokio::test]
    async fn test_register_webhook_user_errors() {
        let (client, _) = mock_shopify(
            StatusCode::OK,
            json!({
                "data": {
                    "webhookSubscriptionCreate": {
                        "userErrors": [{ "field": ["callbackUrl"], "message": "is invalid" }],
                        "webhookSubscription": null
                    }
                }
            }),
        )
        .await;
        let err = client
            .register_webhook_subscription(&WebhookSubscriptionInput::new("ORDERS_CREATE", "nope"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Webhook subscription error: callbackUrl: is invalid");
    }

    #[tokio::test]
    async fn test_argument_checks_skip_the_network() {
        let (client, seen) = mock_shopify(StatusCode::OK, json!({})).await;

        let err = client
            .register_webhook_subscription(&WebhookSubscriptionInput::new("", "https://x"))
            .await
            .unwrap_err();
        assert!(matches!(err, ShopifyClientError::MissingArgument(_)));

        assert!(client.delete_webhook_subscription(" ").await.is_err());

        let input = AppSubscriptionInput {
            name: "Pro".to_string(),
            line_items: vec![],
            return_url: "https://example.com".to_string(),
            trial_days: 0,
            test: true,
        };
        assert!(client.create_app_subscription(&input).await.is_err());
        assert!(seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_app_subscription() {
        let (client, seen) = mock_shopify(
            StatusCode::OK,
            json!({
                "data": {
                    "appSubscriptionCreate": {
                        "userErrors": [],
                        "confirmationUrl": "https://shop.myshopify.com/confirm",
                        "appSubscription": {
                            "id": "gid://shopify/AppSubscription/9",
                            "name": "Pro",
                            "status": "PENDING",
                            "trialDays": 7,
                            "test": true
                        }
                    }
                }
            }),
        )
        .await;

        let input = AppSubscriptionInput {
            name: "Pro".to_string(),
            line_items: vec![json!({ "plan": { "appRecurringPricingDetails": { "price": { "amount": 10, "currencyCode": "USD" } } } })],
            return_url: "https://example.com/return".to_string(),
            trial_days: 7,
            test: true,
        };
        let created = client.create_app_subscription(&input).await.unwrap();
        assert_eq!(created.confirmation_url.as_deref(), Some("https://shop.myshopify.com/confirm"));
        assert_eq!(created.subscription.unwrap().status, "PENDING");
        assert_eq!(seen.lock().unwrap()[0].1["variables"]["trialDays"], 7);
    }

    #[tokio::test]
    async fn test_delete_webhook_subscription() {
        let (client, _) = mock_shopify(
            StatusCode::OK,
            json!({
                "data": {
                    "webhookSubscriptionDelete": {
                        "userErrors": [],
                        "deletedWebhookSubscriptionId": "gid://shopify/WebhookSubscription/1"
                    }
                }
            }),
        )
        .await;
        let id = client
            .delete_webhook_subscription("gid://shopify/WebhookSubscription/1")
            .await
            .unwrap();
        assert_eq!(id, "gid://shopify/WebhookSubscription/1");
    }
}
