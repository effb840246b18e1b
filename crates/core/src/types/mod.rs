//! Entity types for Stockline.
//!
//! This module provides the records held by the inventory store and the
//! loosely-typed inputs the façades accept for them.

pub mod collection;
pub mod id;
pub mod order;
pub mod product;
pub mod sheet;

pub use collection::{Collection, CollectionInput};
pub use id::*;
pub use order::Order;
pub use product::{Product, ProductInput};
pub use sheet::{Cell, Row, inventory_header};
