//! Application state shared across handlers.

use std::sync::Arc;

use crate::store::OrderStore;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. It holds no order data of its
/// own; every request goes through the [`OrderStore`].
#[derive(Clone, Debug)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

#[derive(Debug)]
struct AppStateInner {
    store: OrderStore,
}

impl AppState {
    /// Create a new application state around an order store.
    #[must_use]
    pub fn new(store: OrderStore) -> Self {
        Self {
            inner: Arc::new(AppStateInner { store }),
        }
    }

    /// Get a reference to the order store.
    #[must_use]
    pub fn store(&self) -> &OrderStore {
        &self.inner.store
    }
}
