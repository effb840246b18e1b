//! In-memory inventory store.
//!
//! The store is the single source of truth for products, orders, collections
//! and named sheets. It is a cheap-to-clone handle: every clone sees the same
//! state, which is how the Shopify and Sheets façades share one store.
//!
//! Every value handed out is an owned copy. Callers can mutate what they get
//! back without touching stored state, and vice versa.
//!
//! The store never fails. Absence is reported with `Option` or `bool` and the
//! façades decide whether that is an error.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde_json::{Map, Value};
use tracing::debug;

use crate::types::{
    Collection, CollectionId, CollectionInput, Order, OrderId, Product, ProductId, ProductInput,
    Row,
};
use crate::validation::{Page, PageOptions, paginate};

/// Shared handle to the inventory state.
#[derive(Debug, Clone, Default)]
pub struct InventoryStore {
    inner: Arc<RwLock<StoreState>>,
}

#[derive(Debug)]
struct StoreState {
    products: Table<ProductId, Product>,
    orders: Table<OrderId, Order>,
    collections: Table<CollectionId, Collection>,
    sheets: HashMap<String, Vec<Row>>,
    /// Next sequence number; shared by every generated id regardless of kind.
    sequence: u64,
}

impl Default for StoreState {
    fn default() -> Self {
        Self {
            products: Table::default(),
            orders: Table::default(),
            collections: Table::default(),
            sheets: HashMap::new(),
            sequence: 1,
        }
    }
}

impl StoreState {
    fn next_sequence(&mut self) -> u64 {
        let sequence = self.sequence;
        self.sequence += 1;
        sequence
    }
}

/// A map that remembers first-insertion order.
///
/// Replacing an existing key keeps its original position.
#[derive(Debug)]
struct Table<K, V> {
    entries: HashMap<K, V>,
    order: Vec<K>,
}

impl<K, V> Default for Table<K, V> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            order: Vec::new(),
        }
    }
}

impl<K, V> Table<K, V>
where
    K: Eq + Hash + Clone + Borrow<str>,
{
    fn get(&self, key: &str) -> Option<&V> {
        self.entries.get(key)
    }

    fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        self.entries.get_mut(key)
    }

    fn insert(&mut self, key: K, value: V) {
        if self.entries.insert(key.clone(), value).is_none() {
            self.order.push(key);
        }
    }

    fn remove(&mut self, key: &str) -> bool {
        if self.entries.remove(key).is_some() {
            self.order.retain(|k| k.borrow() != key);
            true
        } else {
            false
        }
    }

    fn values(&self) -> impl Iterator<Item = &V> {
        self.order.iter().filter_map(|key| self.entries.get(key.borrow()))
    }
}

impl InventoryStore {
    /// Create an empty store with the id sequence starting at 1.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, StoreState> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, StoreState> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Drop every entity and sheet and restart the id sequence at 1.
    pub fn reset(&self) {
        *self.write() = StoreState::default();
        debug!("inventory store reset");
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// Create or update a product.
    ///
    /// With an id that is already stored, supplied fields are merged over the
    /// existing record. Otherwise a new record is created with defaults, under
    /// the supplied id or a generated `prod_<seq>` one.
    pub fn upsert_product(&self, input: ProductInput) -> Product {
        let mut state = self.write();
        let id = match input.product_id() {
            Some(id) => id,
            None => ProductId::generated(state.next_sequence()),
        };

        let mut product = state
            .products
            .get(id.as_str())
            .cloned()
            .unwrap_or_else(|| Product::new(id.clone()));
        product.merge(input);

        state.products.insert(id, product.clone());
        product
    }

    /// Look up a product by id.
    #[must_use]
    pub fn get_product(&self, id: &str) -> Option<Product> {
        self.read().products.get(id).cloned()
    }

    /// Page through products in insertion order.
    #[must_use]
    pub fn list_products(&self, options: &PageOptions) -> Page<Product> {
        let products: Vec<Product> = self.read().products.values().cloned().collect();
        paginate(products, options)
    }

    /// Remove a product. Returns whether it existed.
    pub fn delete_product(&self, id: &str) -> bool {
        self.write().products.remove(id)
    }

    /// Replace only the quantity of a stored product.
    ///
    /// Returns `None` when the product does not exist.
    pub fn update_inventory(&self, product_id: &str, quantity: f64) -> Option<Product> {
        let mut state = self.write();
        let product = state.products.get_mut(product_id)?;
        product.quantity = quantity;
        Some(product.clone())
    }

    // =========================================================================
    // Collections
    // =========================================================================

    /// Create or replace a collection.
    pub fn upsert_collection(&self, input: CollectionInput) -> Collection {
        let mut state = self.write();
        let id = match input.collection_id() {
            Some(id) => id,
            None => CollectionId::generated(state.next_sequence()),
        };

        let collection = Collection::normalize(id.clone(), input);
        state.collections.insert(id, collection.clone());
        collection
    }

    /// Look up a collection by id.
    #[must_use]
    pub fn get_collection(&self, id: &str) -> Option<Collection> {
        self.read().collections.get(id).cloned()
    }

    /// Page through collections in insertion order.
    #[must_use]
    pub fn list_collections(&self, options: &PageOptions) -> Page<Collection> {
        let collections: Vec<Collection> = self.read().collections.values().cloned().collect();
        paginate(collections, options)
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// Record an order from a free-form payload.
    ///
    /// The payload's `id` is used when present and non-empty; otherwise
    /// `order_<seq>` is generated.
    pub fn record_order(&self, fields: Map<String, Value>) -> Order {
        let mut state = self.write();
        let (id, fields) = Order::split_id(fields);
        let id = match id {
            Some(id) => id,
            None => OrderId::generated(state.next_sequence()),
        };

        let order = Order { id: id.clone(), fields };
        state.orders.insert(id, order.clone());
        order
    }

    /// Look up an order by id.
    #[must_use]
    pub fn get_order(&self, id: &str) -> Option<Order> {
        self.read().orders.get(id).cloned()
    }

    /// Page through orders in insertion order.
    #[must_use]
    pub fn list_orders(&self, options: &PageOptions) -> Page<Order> {
        let orders: Vec<Order> = self.read().orders.values().cloned().collect();
        paginate(orders, options)
    }

    // =========================================================================
    // Sheets
    // =========================================================================

    /// Replace a sheet's rows wholesale and return the stored rows.
    pub fn set_sheet(&self, name: &str, rows: Vec<Row>) -> Vec<Row> {
        self.write().sheets.insert(name.to_string(), rows.clone());
        rows
    }

    /// Rows of a sheet; a sheet that was never written is empty.
    #[must_use]
    pub fn get_sheet(&self, name: &str) -> Vec<Row> {
        self.read().sheets.get(name).cloned().unwrap_or_default()
    }

    /// Append rows to the end of a sheet, creating it if needed, and return
    /// the whole sheet.
    pub fn append_sheet(&self, name: &str, rows: Vec<Row>) -> Vec<Row> {
        let mut state = self.write();
        let sheet = state.sheets.entry(name.to_string()).or_default();
        sheet.extend(rows);
        sheet.clone()
    }

    /// Empty a sheet. The name stays known; reads return no rows.
    pub fn clear_sheet(&self, name: &str) -> Vec<Row> {
        self.write().sheets.insert(name.to_string(), Vec::new());
        Vec::new()
    }

    /// Names of every sheet written so far, sorted.
    #[must_use]
    pub fn sheet_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.read().sheets.keys().cloned().collect();
        names.sort();
        names
    }
}
