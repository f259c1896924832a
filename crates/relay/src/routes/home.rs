//! Liveness and readiness endpoints, plus the JSON 404 for unmatched paths.

use axum::{extract::State, http::StatusCode};

use crate::error::AppError;
use crate::state::AppState;

/// Text served at `/` so operators can see the relay is up.
pub const LIVENESS_MESSAGE: &str = "Order relay API is running";

/// Message for requests that match no route.
pub const ROUTE_NOT_FOUND: &str = "route not found";

/// Root liveness message.
///
/// GET /
pub async fn home() -> &'static str {
    LIVENESS_MESSAGE
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check the store.
pub async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Verifies the order document can be read and parsed.
/// Returns 503 Service Unavailable otherwise.
pub async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.store().load().await {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

/// Router fallback so unmatched paths answer with a `{message}` body like
/// every other error.
pub async fn not_found() -> AppError {
    AppError::NotFound(ROUTE_NOT_FOUND.to_string())
}
