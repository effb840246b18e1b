//! Free-form order records.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::OrderId;
use crate::validation::lenient;

/// A recorded order: an id plus whatever fields the caller supplied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Order {
    /// Split a free-form payload into its id (if any, non-empty) and the
    /// remaining fields.
    #[must_use]
    pub fn split_id(mut fields: Map<String, Value>) -> (Option<OrderId>, Map<String, Value>) {
        let id = fields
            .remove("id")
            .and_then(|value| lenient::text(value).ok().flatten())
            .filter(|id| !id.is_empty())
            .map(OrderId::from);
        (id, fields)
    }
}
