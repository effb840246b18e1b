//! CLI command implementations.

pub mod functions;
pub mod script;
pub mod shopify;

use serde::Serialize;

/// Pretty-print a value as JSON on stdout.
#[allow(clippy::print_stdout)]
fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{json}"),
        Err(e) => tracing::error!("Failed to serialize output: {e}"),
    }
}
