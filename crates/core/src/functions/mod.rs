//! The named function surface.
//!
//! [`catalog`] lists the functions each server advertises; [`registry`]
//! dispatches calls to the façades.

pub mod catalog;
pub mod registry;

pub use catalog::{FunctionInfo, ServerInfo, all_functions, servers};
pub use registry::FunctionRegistry;
