//! Order document commands.
//!
//! Output goes to the supplied writer so the commands can be tested without
//! capturing stdout. Orders are written one JSON object per line.

use std::io::Write;

use pedidos_core::{Order, OrderId, ReceiptStatus};
use pedidos_relay::store::{OrderStore, StoreError};
use thiserror::Error;

/// Errors that can occur while running an order command.
#[derive(Debug, Error)]
pub enum OrdersError {
    /// The order store failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Writing output failed.
    #[error("Output error: {0}")]
    Output(#[from] std::io::Error),

    /// An order could not be rendered as JSON.
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Which orders `list` prints.
#[derive(Debug, Default)]
pub struct ListFilter {
    /// Only orders for this store.
    pub store_id: Option<String>,
    /// Only orders in this state.
    pub status: Option<ReceiptStatus>,
}

impl ListFilter {
    fn matches(&self, order: &Order) -> bool {
        let store_matches = self.store_id.as_deref().is_none_or(|wanted| {
            order.store_id.as_ref().is_some_and(|s| s.as_str() == wanted)
        });
        store_matches && self.status.is_none_or(|wanted| order.status() == wanted)
    }
}

/// Print orders matching `filter`, returning how many were printed.
///
/// # Errors
///
/// Returns `OrdersError` if the document cannot be loaded or output fails.
pub async fn list(
    store: &OrderStore,
    filter: &ListFilter,
    out: &mut impl Write,
) -> Result<usize, OrdersError> {
    let orders = store.list_all().await?;

    let mut printed = 0;
    for order in orders.iter().filter(|o| filter.matches(o)) {
        serde_json::to_writer(&mut *out, order)?;
        writeln!(out)?;
        printed += 1;
    }

    tracing::info!(printed, total = orders.len(), "Listed orders");
    Ok(printed)
}

/// Mark an order as received and print it.
///
/// An order that is already received is printed as-is and the document is
/// left alone.
///
/// # Errors
///
/// Returns `OrdersError::Store` with `StoreError::OrderNotFound` for an
/// unknown id.
pub async fn receive(
    store: &OrderStore,
    id: &str,
    out: &mut impl Write,
) -> Result<Order, OrdersError> {
    let id = OrderId::new(id);
    let current = store
        .get(&id)
        .await?
        .ok_or_else(|| StoreError::OrderNotFound(id.clone()))?;

    let order = if current.status().is_received() {
        tracing::info!(order_id = %id, status = %current.status(), "Order already received");
        current
    } else {
        let order = store.mark_received(&id).await?;
        tracing::info!(order_id = %order.id, status = %order.status(), "Order marked as received");
        order
    };

    serde_json::to_writer(&mut *out, &order)?;
    writeln!(out)?;
    Ok(order)
}

/// Remove received orders and print how many were dropped.
///
/// # Errors
///
/// Returns `OrdersError` if the document cannot be loaded or written.
pub async fn prune(store: &OrderStore, out: &mut impl Write) -> Result<usize, OrdersError> {
    let removed = store.purge_received().await?;
    writeln!(out, "removed {removed} received order(s)")?;
    Ok(removed)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pedidos_core::NewOrder;
    use serde_json::Value;

    use super::*;

    async fn seeded() -> (OrderStore, Vec<Order>) {
        let store = OrderStore::in_memory();
        let mut orders = Vec::new();
        for s in ["loja1", "loja2", "loja1"] {
            orders.push(store.append(NewOrder::for_store(s)).await.unwrap());
        }
        (store, orders)
    }

    fn lines(out: &[u8]) -> Vec<Value> {
        std::str::from_utf8(out)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_list_all() {
        let (store, orders) = seeded().await;
        let mut out = Vec::new();

        let printed = list(&store, &ListFilter::default(), &mut out).await.unwrap();

        assert_eq!(printed, 3);
        let ids: Vec<String> = lines(&out)
            .iter()
            .map(|v| v["id"].as_str().unwrap().to_string())
            .collect();
        let expected: Vec<String> = orders.iter().map(|o| o.id.to_string()).collect();
        assert_eq!(ids, expected);
    }

    #[tokio::test]
    async fn test_list_pending_for_store() {
        let (store, orders) = seeded().await;
        store.mark_received(&orders[0].id).await.unwrap();

        let filter = ListFilter {
            store_id: Some("loja1".to_string()),
            status: Some(ReceiptStatus::Pending),
        };
        let mut out = Vec::new();
        assert_eq!(list(&store, &filter, &mut out).await.unwrap(), 1);
        assert_eq!(lines(&out)[0]["id"].as_str(), Some(orders[2].id.as_str()));
    }

    #[tokio::test]
    async fn test_list_received_only() {
        let (store, orders) = seeded().await;
        store.mark_received(&orders[1].id).await.unwrap();

        let filter = ListFilter {
            store_id: None,
            status: Some("received".parse().unwrap()),
        };
        let mut out = Vec::new();
        assert_eq!(list(&store, &filter, &mut out).await.unwrap(), 1);
        assert_eq!(lines(&out)[0]["id"].as_str(), Some(orders[1].id.as_str()));
    }

    #[tokio::test]
    async fn test_receive_prints_order() {
        let (store, orders) = seeded().await;
        let mut out = Vec::new();

        let order = receive(&store, orders[1].id.as_str(), &mut out).await.unwrap();

        assert!(order.received_by_pos);
        assert_eq!(lines(&out)[0]["receivedByPOS"], Value::Bool(true));
    }

    #[tokio::test]
    async fn test_receive_already_received_prints_order() {
        let (store, orders) = seeded().await;
        store.mark_received(&orders[0].id).await.unwrap();
        let mut out = Vec::new();

        let order = receive(&store, orders[0].id.as_str(), &mut out).await.unwrap();

        assert_eq!(order.status(), ReceiptStatus::Received);
        assert_eq!(lines(&out).len(), 1);
        assert_eq!(store.list_all().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_receive_unknown_fails() {
        let (store, _) = seeded().await;
        let mut out = Vec::new();

        let err = receive(&store, "missing", &mut out).await.unwrap_err();
        assert!(matches!(
            err,
            OrdersError::Store(StoreError::OrderNotFound(_))
        ));
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn test_prune_reports_count() {
        let (store, orders) = seeded().await;
        store.mark_received(&orders[0].id).await.unwrap();
        let mut out = Vec::new();

        assert_eq!(prune(&store, &mut out).await.unwrap(), 1);
        assert_eq!(String::from_utf8(out).unwrap(), "removed 1 received order(s)\n");
        assert_eq!(store.list_all().await.unwrap().len(), 2);
    }
}
