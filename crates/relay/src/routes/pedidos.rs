//! Order relay endpoints.
//!
//! The menu front-end creates orders; the point-of-sale polls for new ones
//! per store and acknowledges each order it has pulled.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde_json::Value;

use pedidos_core::{NewOrder, Order, OrderId};

use crate::error::{ApiMessage, AppError, Result};
use crate::state::AppState;

/// Message returned when a store has nothing to pick up.
pub const NO_NEW_ORDERS: &str = "no new order found";

/// Message returned after an order is acknowledged.
pub const ORDER_MARKED_RECEIVED: &str = "order marked as received";

/// Create an order.
///
/// POST /pedidos
///
/// Accepts any JSON object. `storeId` should be a string; every other field
/// is stored untouched. Returns 201 with the created order.
///
/// # Errors
///
/// Returns `AppError::Rejected` when axum refuses the body (bad JSON, wrong
/// content type, over the size limit), `AppError::BadRequest` when the JSON
/// is not an order object, and `AppError::Store` if the document cannot be
/// read or written.
pub async fn create(
    State(state): State<AppState>,
    payload: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Order>)> {
    let Json(value) = payload?;
    let new_order = NewOrder::try_from(value).map_err(|e| AppError::BadRequest(e.to_string()))?;

    let order = state.store().append(new_order).await?;

    tracing::info!(
        order_id = %order.id,
        store_id = order.store_id.as_ref().map_or("-", |s| s.as_str()),
        "new order received"
    );
    Ok((StatusCode::CREATED, Json(order)))
}

/// List orders not yet received by a store's point-of-sale.
///
/// GET /pedidos/novos/{storeId}
///
/// # Errors
///
/// Returns `AppError::NotFound` when there is nothing pending for the store
/// (an unknown store looks the same).
pub async fn list_new(
    State(state): State<AppState>,
    Path(store_id): Path<String>,
) -> Result<Json<Vec<Order>>> {
    let orders = state.store().list_unreceived(&store_id).await?;

    if orders.is_empty() {
        return Err(AppError::NotFound(NO_NEW_ORDERS.to_string()));
    }

    tracing::info!(
        store_id = %store_id,
        count = orders.len(),
        "sending new orders to store"
    );
    Ok(Json(orders))
}

/// Acknowledge an order.
///
/// PUT /pedidos/{id}/recebido
///
/// Repeating the call for an order already received succeeds again.
///
/// # Errors
///
/// Returns `AppError::Store(StoreError::OrderNotFound)` (404) for an
/// unknown id.
pub async fn mark_received(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiMessage>> {
    let order = state.store().mark_received(&OrderId::from(id)).await?;

    tracing::info!(order_id = %order.id, "order marked as received by PDV");
    Ok(Json(ApiMessage::new(ORDER_MARKED_RECEIVED)))
}
