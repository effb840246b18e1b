//! Errors raised by the function surface.
//!
//! The store never fails; every variant here originates in the validation,
//! façade or registry layers.

use thiserror::Error;

/// Errors returned by façade operations and the function registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FunctionError {
    /// One or more required fields were absent (or `null`) in a payload.
    #[error("Missing required fields in {context}: {}", .missing.join(", "))]
    Validation {
        /// Human-readable name of the payload being checked.
        context: String,
        /// Every missing field name, in the order they were requested.
        missing: Vec<String>,
    },

    /// An operation was invoked before the service's `configure` call.
    #[error("{service} service not configured. Call {prefix}_configure first.")]
    NotConfigured {
        /// Display name of the service (e.g. "Shopify").
        service: &'static str,
        /// Function-name prefix of the service (e.g. "shopify").
        prefix: &'static str,
    },

    /// Lookup, update or delete targeted a nonexistent entity.
    #[error("{0} not found")]
    NotFound(String),

    /// Structurally wrong input, such as a non-array where an array is required.
    #[error("{0}")]
    TypeInput(String),

    /// No function with this name exists in the catalog.
    #[error("Unknown function: {0}")]
    UnknownFunction(String),
}

impl FunctionError {
    /// Not-found error for a product id.
    #[must_use]
    pub fn product_not_found(id: impl std::fmt::Display) -> Self {
        Self::NotFound(format!("Product {id}"))
    }

    /// Short machine-readable name of the error kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "validation",
            Self::NotConfigured { .. } => "not_configured",
            Self::NotFound(_) => "not_found",
            Self::TypeInput(_) => "type_input",
            Self::UnknownFunction(_) => "unknown_function",
        }
    }
}
