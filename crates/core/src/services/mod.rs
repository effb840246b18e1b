//! Façade services over the inventory store.
//!
//! Each façade holds its own configuration and a handle to the shared store.
//! Payloads arrive as JSON; the façade checks required fields, reads the
//! payload into a typed request and delegates to the store.

pub mod sheets;
pub mod shopify;

pub use sheets::{SheetsConfig, SheetsService};
pub use shopify::{ShopifyConfig, ShopifyService};

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::FunctionError;

/// Placeholder shown instead of secrets when a configuration is echoed back.
pub const REDACTED: &str = "[REDACTED]";

/// Read a payload into a typed request.
///
/// A missing (`null`) payload reads as an empty object so that every
/// optional field falls back to its default.
fn parse<T: DeserializeOwned>(payload: &Value, context: &str) -> Result<T, FunctionError> {
    let payload = if payload.is_null() {
        Value::Object(Map::new())
    } else {
        payload.clone()
    };
    serde_json::from_value(payload)
        .map_err(|e| FunctionError::TypeInput(format!("Invalid {context}: {e}")))
}
