//! Product collections.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::CollectionId;
use crate::validation::lenient;

/// Title given to collections created without one.
pub const DEFAULT_COLLECTION_TITLE: &str = "Untitled Collection";

/// A stored collection. `handle` defaults to the id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    pub id: CollectionId,
    pub title: String,
    #[serde(default)]
    pub products: Vec<Value>,
    pub handle: String,
}

/// Fields supplied when creating a collection.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CollectionInput {
    #[serde(deserialize_with = "lenient::text")]
    pub id: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub title: Option<String>,
    pub products: Option<Vec<Value>>,
    #[serde(deserialize_with = "lenient::text")]
    pub handle: Option<String>,
}

impl CollectionInput {
    /// Caller-supplied id, if it is non-empty.
    #[must_use]
    pub fn collection_id(&self) -> Option<CollectionId> {
        self.id
            .as_deref()
            .filter(|id| !id.is_empty())
            .map(CollectionId::from)
    }
}

impl Collection {
    /// Normalize `input` into a collection stored under `id`.
    ///
    /// Collections are replaced wholesale; nothing is merged from an earlier
    /// record with the same id.
    #[must_use]
    pub fn normalize(id: CollectionId, input: CollectionInput) -> Self {
        let handle = input
            .handle
            .filter(|h| !h.is_empty())
            .unwrap_or_else(|| id.to_string());

        Self {
            title: input
                .title
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| DEFAULT_COLLECTION_TITLE.to_string()),
            products: input.products.unwrap_or_default(),
            handle,
            id,
        }
    }
}
