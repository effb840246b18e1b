//! Spreadsheet-like rows.
//!
//! A sheet is a named, ordered list of rows; each row is an ordered list of
//! scalar cells. Rows have no fixed width.

use serde_json::Value;

/// A single cell value (string, number, boolean or null).
pub type Cell = Value;

/// An ordered sequence of cells.
pub type Row = Vec<Cell>;

/// Header row seeded into a freshly created spreadsheet.
#[must_use]
pub fn inventory_header() -> Row {
    ["SKU", "Title", "Quantity", "Price"]
        .into_iter()
        .map(|label| Value::String(label.to_string()))
        .collect()
}
