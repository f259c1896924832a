//! Order record, creation payload, and the persisted order document.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use super::id::{OrderId, StoreId};
use super::status::ReceiptStatus;

/// Field names controlled by the relay. Values supplied by a caller under
/// these keys are discarded when an order is created.
///
/// `recebidoPeloPDV` and `dataCriacao` are the names used by documents
/// written before the fields were renamed.
pub const RESERVED_FIELDS: &[&str] = &[
    "id",
    "receivedByPOS",
    "createdAt",
    "recebidoPeloPDV",
    "dataCriacao",
];

/// A customer order relayed from the menu front-end to a point-of-sale.
///
/// Everything the caller sent besides `storeId` is kept verbatim in
/// [`Order::fields`] and flattened back into the JSON object.
///
/// Stored records are read leniently: a `storeId` that is not a string (only
/// possible in documents edited by hand or by older writers) is kept as an
/// opaque field, so the record survives but is never listed for a store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "StoredOrder")]
pub struct Order {
    /// Relay-assigned unique id.
    pub id: OrderId,
    /// Store the order belongs to. Orders without one are never listed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_id: Option<StoreId>,
    /// Whether the point-of-sale has acknowledged the order.
    #[serde(rename = "receivedByPOS")]
    pub received_by_pos: bool,
    /// Creation time, immutable.
    pub created_at: DateTime<Utc>,
    /// Opaque order contents (items, customer, notes...).
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// On-disk shape of an [`Order`], accepting legacy names and any JSON
/// under `storeId`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredOrder {
    id: OrderId,
    #[serde(default)]
    store_id: Option<Value>,
    #[serde(rename = "receivedByPOS", alias = "recebidoPeloPDV", default)]
    received_by_pos: bool,
    #[serde(alias = "dataCriacao")]
    created_at: DateTime<Utc>,
    #[serde(flatten)]
    fields: Map<String, Value>,
}

impl From<StoredOrder> for Order {
    fn from(stored: StoredOrder) -> Self {
        let StoredOrder {
            id,
            store_id,
            received_by_pos,
            created_at,
            mut fields,
        } = stored;

        let store_id = match store_id {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(StoreId::from(s)),
            Some(other) => {
                fields.insert("storeId".to_string(), other);
                None
            }
        };

        Self {
            id,
            store_id,
            received_by_pos,
            created_at,
            fields,
        }
    }
}

impl Order {
    /// Build a pending order from a creation payload.
    ///
    /// Reserved fields in the payload are dropped so callers cannot spoof
    /// the id, the receipt flag, or the creation time.
    #[must_use]
    pub fn new(id: OrderId, created_at: DateTime<Utc>, payload: NewOrder) -> Self {
        let NewOrder {
            store_id,
            mut fields,
        } = payload;
        for key in RESERVED_FIELDS {
            fields.remove(*key);
        }

        Self {
            id,
            store_id,
            received_by_pos: false,
            created_at,
            fields,
        }
    }

    /// Current receipt status.
    #[must_use]
    pub const fn status(&self) -> ReceiptStatus {
        ReceiptStatus::from_flag(self.received_by_pos)
    }

    /// Whether this order is still waiting to be picked up by `store`.
    #[must_use]
    pub fn is_pending_for(&self, store: &str) -> bool {
        !self.received_by_pos && self.store_id.as_ref().is_some_and(|s| s.as_str() == store)
    }

    /// Move the order to `Received`.
    ///
    /// Returns `true` when the status changed, `false` if it was already
    /// received. Calling it again is harmless.
    pub const fn mark_received(&mut self) -> bool {
        let changed = !self.received_by_pos;
        self.received_by_pos = true;
        changed
    }
}

/// Errors turning an arbitrary JSON value into a [`NewOrder`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PayloadError {
    #[error("order payload must be a JSON object")]
    NotAnObject,
    #[error("storeId must be a string")]
    InvalidStoreId,
}

/// Payload posted by the menu front-end to create an order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    /// Store the order is meant for.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_id: Option<StoreId>,
    /// All other fields, uninterpreted.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl NewOrder {
    /// Create a payload for `store` with no extra fields.
    #[must_use]
    pub fn for_store(store: impl Into<StoreId>) -> Self {
        Self {
            store_id: Some(store.into()),
            fields: Map::new(),
        }
    }

    /// Add an opaque field.
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }
}

impl TryFrom<Value> for NewOrder {
    type Error = PayloadError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let Value::Object(mut fields) = value else {
            return Err(PayloadError::NotAnObject);
        };

        let store_id = match fields.remove("storeId") {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(StoreId::from(s)),
            Some(_) => return Err(PayloadError::InvalidStoreId),
        };

        Ok(Self { store_id, fields })
    }
}

/// The persisted document: every order ever created, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrdersDocument {
    #[serde(default)]
    pub pedidos: Vec<Order>,
}

impl OrdersDocument {
    /// Whether an order with `id` exists.
    #[must_use]
    pub fn contains(&self, id: &OrderId) -> bool {
        self.pedidos.iter().any(|o| &o.id == id)
    }

    /// Find an order by exact id.
    #[must_use]
    pub fn find(&self, id: &OrderId) -> Option<&Order> {
        self.pedidos.iter().find(|o| &o.id == id)
    }

    /// Find an order by exact id for mutation.
    pub fn find_mut(&mut self, id: &OrderId) -> Option<&mut Order> {
        self.pedidos.iter_mut().find(|o| &o.id == id)
    }

    /// Orders for `store` not yet acknowledged, in insertion order.
    pub fn unreceived_for<'a>(&'a self, store: &'a str) -> impl Iterator<Item = &'a Order> + 'a {
        self.pedidos.iter().filter(move |o| o.is_pending_for(store))
    }

    /// Drop every received order, returning how many were removed.
    pub fn purge_received(&mut self) -> usize {
        let before = self.pedidos.len();
        self.pedidos.retain(|o| !o.status().is_received());
        before - self.pedidos.len()
    }
}
