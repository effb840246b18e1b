//! Application state shared across handlers.

use std::sync::Arc;

use stockline_core::{FunctionRegistry, InventoryStore};
use tokio::sync::Mutex;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. Function calls lock the
/// registry, so they run one at a time.
#[derive(Debug, Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

#[derive(Debug)]
struct AppStateInner {
    store: InventoryStore,
    registry: Mutex<FunctionRegistry>,
}

impl AppState {
    /// Create application state around an existing registry.
    #[must_use]
    pub fn new(registry: FunctionRegistry) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                store: registry.store().clone(),
                registry: Mutex::new(registry),
            }),
        }
    }

    /// Get a handle to the inventory store.
    #[must_use]
    pub fn store(&self) -> &InventoryStore {
        &self.inner.store
    }

    /// Get the function registry.
    #[must_use]
    pub fn registry(&self) -> &Mutex<FunctionRegistry> {
        &self.inner.registry
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(FunctionRegistry::default())
    }
}
