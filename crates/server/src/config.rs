//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `STOCKLINE_HOST` - Bind address (default: 127.0.0.1)
//! - `STOCKLINE_PORT` - Listen port (default: 3000)
//! - `STOCKLINE_SEED_FILE` - YAML file loaded into the store at startup
//! - `SHOPIFY_STORE` - Shopify store domain (e.g., your-store.myshopify.com)
//! - `SHOPIFY_ACCESS_TOKEN` - Admin API access token
//! - `SHOPIFY_API_VERSION` - API version (default: 2025-04)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Traces sample rate (default: 1.0)
//!
//! `SHOPIFY_STORE` and `SHOPIFY_ACCESS_TOKEN` must be set together. When they
//! are, the Shopify façade starts out configured with them.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use secrecy::{ExposeSecret, SecretString};
use serde_json::{Value, json};
use stockline_core::services::shopify::DEFAULT_API_VERSION;
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// YAML seed file loaded at startup
    pub seed_file: Option<PathBuf>,
    /// Shopify credentials (optional)
    pub shopify: Option<ShopifyAppConfig>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "staging", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate for performance monitoring (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
}

/// Shopify Admin API credentials.
///
/// Implements `Debug` manually to redact the access token.
#[derive(Clone)]
pub struct ShopifyAppConfig {
    /// Shopify store domain (e.g., your-store.myshopify.com)
    pub store: String,
    /// Admin API access token
    pub access_token: SecretString,
    /// Shopify API version (e.g., 2025-04)
    pub api_version: String,
}

impl std::fmt::Debug for ShopifyAppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopifyAppConfig")
            .field("store", &self.store)
            .field("access_token", &"[REDACTED]")
            .field("api_version", &self.api_version)
            .finish()
    }
}

impl ShopifyAppConfig {
    /// Load Shopify credentials from environment.
    ///
    /// Returns `None` if neither variable is set.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if only one of the two variables is set.
    pub fn from_env() -> Result<Option<Self>, ConfigError> {
        Self::from_lookup(&env_lookup)
    }

    /// Load Shopify credentials that must be present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` if the credentials are not set.
    pub fn require_from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_env()?.ok_or_else(|| ConfigError::MissingEnvVar("SHOPIFY_STORE".to_string()))
    }

    fn from_lookup(lookup: &dyn Fn(&str) -> Option<String>) -> Result<Option<Self>, ConfigError> {
        let store = get_optional_env(lookup, "SHOPIFY_STORE");
        let access_token = get_optional_env(lookup, "SHOPIFY_ACCESS_TOKEN");

        match (store, access_token) {
            (Some(store), Some(token)) => Ok(Some(Self {
                store,
                access_token: SecretString::from(token),
                api_version: get_env_or_default(lookup, "SHOPIFY_API_VERSION", DEFAULT_API_VERSION),
            })),
            (None, None) => Ok(None),
            _ => Err(ConfigError::InvalidEnvVar(
                "SHOPIFY_*".to_string(),
                "Both SHOPIFY_STORE and SHOPIFY_ACCESS_TOKEN must be set together".to_string(),
            )),
        }
    }

    /// Payload for the `shopify_configure` function.
    #[must_use]
    pub fn configure_payload(&self) -> Value {
        json!({
            "shopDomain": self.store,
            "accessToken": self.access_token.expose_secret(),
            "apiVersion": self.api_version,
        })
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(&env_lookup)
    }

    fn from_lookup(lookup: &dyn Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = get_env_or_default(lookup, "STOCKLINE_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("STOCKLINE_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default(lookup, "STOCKLINE_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("STOCKLINE_PORT".to_string(), e.to_string()))?;
        let seed_file = get_optional_env(lookup, "STOCKLINE_SEED_FILE").map(PathBuf::from);
        let shopify = ShopifyAppConfig::from_lookup(lookup)?;
        let sentry_dsn = get_optional_env(lookup, "SENTRY_DSN");
        let sentry_environment = get_optional_env(lookup, "SENTRY_ENVIRONMENT");
        let sentry_sample_rate = get_optional_env(lookup, "SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let sentry_traces_sample_rate = get_optional_env(lookup, "SENTRY_TRACES_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);

        Ok(Self {
            host,
            port,
            seed_file,
            shopify,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an optional variable; empty values count as unset.
fn get_optional_env(lookup: &dyn Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key).filter(|value| !value.trim().is_empty())
}

/// Get a variable with a default value.
fn get_env_or_default(lookup: &dyn Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    get_optional_env(lookup, key).unwrap_or_else(|| default.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        ServerConfig::from_lookup(&move |key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3000");
        assert!(config.seed_file.is_none());
        assert!(config.shopify.is_none());
        assert!(config.sentry_dsn.is_none());
        assert!((config.sentry_sample_rate - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("STOCKLINE_HOST", "0.0.0.0"),
            ("STOCKLINE_PORT", "8080"),
            ("STOCKLINE_SEED_FILE", "seed.yaml"),
            ("SENTRY_TRACES_SAMPLE_RATE", "0.25"),
        ])
        .unwrap();
        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:8080");
        assert_eq!(config.seed_file, Some(PathBuf::from("seed.yaml")));
        assert!((config.sentry_traces_sample_rate - 0.25).abs() < f32::EPSILON);
    }

    #[test]
    fn test_invalid_port() {
        let err = load(&[("STOCKLINE_PORT", "http")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "STOCKLINE_PORT"));
    }

    #[test]
    fn test_shopify_requires_both_variables() {
        let err = load(&[("SHOPIFY_STORE", "shop.myshopify.com")]).unwrap_err();
        assert!(err.to_string().contains("must be set together"));

        let config = load(&[
            ("SHOPIFY_STORE", "shop.myshopify.com"),
            ("SHOPIFY_ACCESS_TOKEN", "shpat_abc123"),
        ])
        .unwrap();
        let shopify = config.shopify.unwrap();
        assert_eq!(shopify.api_version, DEFAULT_API_VERSION);
        assert_eq!(shopify.configure_payload()["accessToken"], "shpat_abc123");
    }

    #[test]
    fn test_debug_redacts_token() {
        let shopify = ShopifyAppConfig {
            store: "shop.myshopify.com".to_string(),
            access_token: SecretString::from("shpat_abc123"),
            api_version: DEFAULT_API_VERSION.to_string(),
        };
        let debug = format!("{shopify:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("shpat_abc123"));
    }
}
