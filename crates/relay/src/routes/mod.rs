//! HTTP route handlers for the relay.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                          - Liveness message
//! GET  /health                    - Health check
//! GET  /health/ready              - Readiness (order document loads)
//!
//! # Orders
//! POST /pedidos                   - Create order (menu front-end)
//! GET  /pedidos/novos/{storeId}   - Unreceived orders for a store (PDV)
//! PUT  /pedidos/{id}/recebido     - Acknowledge an order (PDV)
//! ```
//!
//! Anything else gets a 404 `{"message": "route not found"}`.

pub mod home;
pub mod pedidos;

use axum::{
    Router,
    body::Body,
    extract::DefaultBodyLimit,
    http::Request,
    middleware::from_fn,
    routing::{get, post, put},
};
use tower_http::trace::TraceLayer;

use crate::middleware::{cors_layer, request_id_middleware};
use crate::state::AppState;

/// Largest accepted request body.
pub const MAX_BODY_BYTES: usize = 100 * 1024;

/// Create the order routes router.
pub fn pedido_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(pedidos::create))
        .route("/novos/{store_id}", get(pedidos::list_new))
        .route("/{id}/recebido", put(pedidos::mark_received))
}

/// Create all routes for the relay.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/health", get(home::health))
        .route("/health/ready", get(home::readiness))
        .nest("/pedidos", pedido_routes())
        .fallback(home::not_found)
}

/// Build the full application: routes, state, and middleware.
///
/// Sentry layers are added by the binary on top of this.
pub fn app(state: AppState) -> Router {
    routes()
        .with_state(state)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(cors_layer())
        .layer(from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                )
            }),
        )
}
