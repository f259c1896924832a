//! Integration tests for the file-backed order store.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::sync::Arc;

use pedidos_core::{NewOrder, OrderId, ReceiptStatus, StoreId};
use pedidos_relay::store::{OrderStore, StoreError};
use serde_json::json;

fn temp_store() -> (tempfile::TempDir, std::path::PathBuf, OrderStore) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("db.json");
    let store = OrderStore::file(&path);
    (dir, path, store)
}

#[tokio::test]
async fn test_document_layout_on_disk() {
    let (_dir, path, store) = temp_store();
    let order = store
        .append(NewOrder::for_store("loja1").with_field("items", json!(["burger"])))
        .await
        .unwrap();

    let on_disk: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(on_disk["pedidos"][0]["id"], json!(order.id.as_str()));
    assert_eq!(on_disk["pedidos"][0]["receivedByPOS"], json!(false));
    assert_eq!(on_disk["pedidos"][0]["items"], json!(["burger"]));
}

#[tokio::test]
async fn test_reload_returns_identical_orders() {
    let (_dir, path, store) = temp_store();
    let a = store
        .append(NewOrder::for_store("loja1").with_field("total", json!(31.5)))
        .await
        .unwrap();
    let b = store.append(NewOrder::for_store("loja2")).await.unwrap();

    let fresh = OrderStore::file(&path);
    assert_eq!(fresh.list_all().await.unwrap(), vec![a, b]);
}

#[tokio::test]
async fn test_legacy_document_is_readable() {
    let (_dir, path, store) = temp_store();
    std::fs::write(
        &path,
        r#"{
  "pedidos": [
    {
      "id": "1700000000000",
      "recebidoPeloPDV": false,
      "dataCriacao": "2023-11-14T22:13:20.000Z",
      "storeId": "loja1",
      "itens": ["pastel"]
    },
    {
      "id": "1700000000001",
      "recebidoPeloPDV": true,
      "dataCriacao": "2023-11-14T22:13:20.001Z",
      "storeId": "loja1"
    }
  ]
}"#,
    )
    .unwrap();

    let pending = store.list_unreceived("loja1").await.unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].id, OrderId::new("1700000000000"));
    assert_eq!(pending[0].store_id, Some(StoreId::new("loja1")));

    // A write re-emits the document with current field names
    store.mark_received(&OrderId::new("1700000000000")).await.unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("receivedByPOS"));
    assert!(!text.contains("recebidoPeloPDV"));
    assert!(store.list_unreceived("loja1").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_legacy_numeric_store_id_does_not_break_document() {
    let (_dir, path, store) = temp_store();
    std::fs::write(
        &path,
        r#"{
  "pedidos": [
    { "id": "1700000000000", "storeId": 7, "recebidoPeloPDV": false,
      "dataCriacao": "2023-11-14T22:13:20.000Z" },
    { "id": "1700000000001", "storeId": "loja1", "recebidoPeloPDV": false,
      "dataCriacao": "2023-11-14T22:13:20.001Z" }
  ]
}"#,
    )
    .unwrap();

    let pending = store.list_unreceived("loja1").await.unwrap();
    assert_eq!(pending.len(), 1);
    assert!(store.list_unreceived("7").await.unwrap().is_empty());

    // The odd record is kept verbatim across a rewrite
    store.append(NewOrder::for_store("loja1")).await.unwrap();
    let on_disk: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(on_disk["pedidos"].as_array().unwrap().len(), 3);
    assert_eq!(on_disk["pedidos"][0]["storeId"], json!(7));
}

#[tokio::test]
async fn test_new_order_after_legacy_ids_is_unique() {
    let (_dir, path, store) = temp_store();
    std::fs::write(&path, r#"{"pedidos": []}"#).unwrap();

    let first = store.append(NewOrder::for_store("loja1")).await.unwrap();
    let second = store.append(NewOrder::for_store("loja1")).await.unwrap();
    assert_ne!(first.id, second.id);
}

#[tokio::test]
async fn test_corrupt_file_is_reported() {
    let (_dir, path, store) = temp_store();
    std::fs::write(&path, "not json at all").unwrap();

    assert!(matches!(
        store.load().await.unwrap_err(),
        StoreError::Corrupt(_)
    ));
    assert!(matches!(
        store.mark_received(&OrderId::new("1")).await.unwrap_err(),
        StoreError::Corrupt(_)
    ));
}

#[tokio::test]
async fn test_concurrent_appends_on_file_are_not_lost() {
    let (_dir, _path, store) = temp_store();
    let store = Arc::new(store);

    let mut handles = Vec::new();
    for i in 0..20 {
        let store = Arc::clone(&store);
        handles.push(tokio::spawn(async move {
            store
                .append(NewOrder::for_store("loja1").with_field("seq", json!(i)))
                .await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let pending = store.list_unreceived("loja1").await.unwrap();
    assert_eq!(pending.len(), 20);
    assert!(pending.iter().all(|o| o.status() == ReceiptStatus::Pending));
}

#[tokio::test]
async fn test_purge_received_on_file() {
    let (_dir, path, store) = temp_store();
    let a = store.append(NewOrder::for_store("loja1")).await.unwrap();
    let b = store.append(NewOrder::for_store("loja1")).await.unwrap();
    store.mark_received(&a.id).await.unwrap();

    assert_eq!(store.purge_received().await.unwrap(), 1);
    assert_eq!(OrderStore::file(&path).list_all().await.unwrap(), vec![b]);
}
