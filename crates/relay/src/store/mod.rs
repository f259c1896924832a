//! Order store backed by a single JSON document.
//!
//! Every operation loads the whole document, mutates it in memory, and writes
//! it back. A per-store mutex serializes those cycles so two requests in the
//! same process can never interleave and lose a write.
//!
//! # Document layout
//!
//! ```json
//! { "pedidos": [ { "id": "...", "storeId": "...", "receivedByPOS": false, ... } ] }
//! ```

pub mod storage;

use std::path::PathBuf;

use chrono::{DateTime, SubsecRound, Utc};
use thiserror::Error;
use tokio::sync::Mutex;

use pedidos_core::{NewOrder, Order, OrderId, OrdersDocument};

pub use storage::{DocumentStorage, FileStorage, MemoryStorage};

/// Errors raised by [`OrderStore`] operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The storage backend failed (permissions, disk full, ...).
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The persisted document exists but cannot be parsed.
    #[error("order document is corrupt: {0}")]
    Corrupt(#[source] serde_json::Error),

    /// The in-memory document could not be serialized.
    #[error("failed to serialize order document: {0}")]
    Serialize(#[source] serde_json::Error),

    /// No order carries the requested id.
    #[error("order not found: {0}")]
    OrderNotFound(OrderId),
}

/// Source of the current time. Swappable so tests can pin the clock.
pub type Clock = fn() -> DateTime<Utc>;

/// The order store.
///
/// Holds no cached state: the storage backend is the only source of truth.
pub struct OrderStore {
    storage: Mutex<Box<dyn DocumentStorage>>,
    clock: Clock,
}

impl std::fmt::Debug for OrderStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderStore").finish_non_exhaustive()
    }
}

impl OrderStore {
    /// Create a store over any backend.
    #[must_use]
    pub fn new(storage: impl DocumentStorage + 'static) -> Self {
        Self {
            storage: Mutex::new(Box::new(storage)),
            clock: Utc::now,
        }
    }

    /// Create a store persisted to the JSON file at `path`.
    #[must_use]
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::new(FileStorage::new(path))
    }

    /// Create a store that lives only in memory.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(MemoryStorage::new())
    }

    /// Replace the clock used to stamp ids and creation times.
    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Read the full document.
    ///
    /// A missing document is an empty collection. A document that exists but
    /// does not parse is reported as [`StoreError::Corrupt`] and left as is.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` or `StoreError::Corrupt`.
    pub async fn load(&self) -> Result<OrdersDocument, StoreError> {
        let storage = self.storage.lock().await;
        read_document(&**storage).await
    }

    /// Every order in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` or `StoreError::Corrupt`.
    pub async fn list_all(&self) -> Result<Vec<Order>, StoreError> {
        Ok(self.load().await?.pedidos)
    }

    /// Look up a single order.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` or `StoreError::Corrupt`.
    pub async fn get(&self, id: &OrderId) -> Result<Option<Order>, StoreError> {
        Ok(self.load().await?.find(id).cloned())
    }

    /// Create a pending order from `payload` and persist it.
    ///
    /// The id is derived from the current time in milliseconds; if that id is
    /// already taken the next free millisecond is used instead.
    ///
    /// # Errors
    ///
    /// Returns any load or write error. Nothing is persisted on error.
    pub async fn append(&self, payload: NewOrder) -> Result<Order, StoreError> {
        let storage = self.storage.lock().await;
        let mut doc = read_document(&**storage).await?;

        let now = (self.clock)().trunc_subsecs(3);
        let id = next_free_id(&doc, now.timestamp_millis());
        let order = Order::new(id, now, payload);

        doc.pedidos.push(order.clone());
        write_document(&**storage, &doc).await?;

        tracing::debug!(
            order_id = %order.id,
            total = doc.pedidos.len(),
            "order appended"
        );
        Ok(order)
    }

    /// Orders for `store_id` not yet acknowledged, in insertion order.
    ///
    /// An unknown store and a store with nothing pending look the same: both
    /// return an empty list.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` or `StoreError::Corrupt`.
    pub async fn list_unreceived(&self, store_id: &str) -> Result<Vec<Order>, StoreError> {
        let doc = self.load().await?;
        Ok(doc.unreceived_for(store_id).cloned().collect())
    }

    /// Mark an order as received by the point-of-sale.
    ///
    /// Idempotent: marking an already-received order succeeds and returns it
    /// unchanged. The document is only rewritten when it actually changes.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::OrderNotFound` if no order has `id`; the document
    /// is not touched in that case.
    pub async fn mark_received(&self, id: &OrderId) -> Result<Order, StoreError> {
        let storage = self.storage.lock().await;
        let mut doc = read_document(&**storage).await?;

        let order = doc
            .find_mut(id)
            .ok_or_else(|| StoreError::OrderNotFound(id.clone()))?;
        let changed = order.mark_received();
        let order = order.clone();

        if changed {
            write_document(&**storage, &doc).await?;
        }

        tracing::debug!(order_id = %id, changed, "order marked received");
        Ok(order)
    }

    /// Remove every received order, returning how many were dropped.
    ///
    /// The HTTP API never calls this; it exists for operators who want to
    /// keep the document from growing forever.
    ///
    /// # Errors
    ///
    /// Returns any load or write error.
    pub async fn purge_received(&self) -> Result<usize, StoreError> {
        let storage = self.storage.lock().await;
        let mut doc = read_document(&**storage).await?;

        let removed = doc.purge_received();
        if removed > 0 {
            write_document(&**storage, &doc).await?;
        }

        tracing::info!(
            removed,
            remaining = doc.pedidos.len(),
            location = %storage.location(),
            "purged received orders"
        );
        Ok(removed)
    }
}

async fn read_document(storage: &dyn DocumentStorage) -> Result<OrdersDocument, StoreError> {
    let Some(bytes) = storage.read().await? else {
        return Ok(OrdersDocument::default());
    };

    serde_json::from_slice(&bytes).map_err(|e| {
        tracing::error!(
            error = %e,
            location = %storage.location(),
            "order document is corrupt"
        );
        StoreError::Corrupt(e)
    })
}

async fn write_document(
    storage: &dyn DocumentStorage,
    doc: &OrdersDocument,
) -> Result<(), StoreError> {
    let bytes = serde_json::to_vec_pretty(doc).map_err(StoreError::Serialize)?;
    storage.write(&bytes).await?;
    Ok(())
}

fn next_free_id(doc: &OrdersDocument, millis: i64) -> OrderId {
    let mut candidate = millis;
    loop {
        let id = OrderId::from_millis(candidate);
        if !doc.contains(&id) {
            return id;
        }
        candidate += 1;
    }
}
