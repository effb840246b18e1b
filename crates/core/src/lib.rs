//! Stockline Core - inventory store, façades and function surface.
//!
//! This crate holds everything behind the named functions:
//! - [`store`] - the shared in-memory inventory (products, orders,
//!   collections, sheets)
//! - [`services`] - the Shopify and Google Sheets façades over the store
//! - [`functions`] - the function catalog and the registry that dispatches
//!   calls by name
//!
//! # Architecture
//!
//! Core performs no I/O. The HTTP server, the CLI and the real Shopify
//! GraphQL client live in other crates and drive this one.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod error;
pub mod functions;
pub mod services;
pub mod store;
pub mod types;
pub mod validation;

pub use error::FunctionError;
pub use functions::FunctionRegistry;
pub use store::InventoryStore;
pub use types::*;
pub use validation::{Page, PageOptions};
