//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server errors to Sentry
//! before responding. Every error reaches the client as a JSON body of the
//! form `{"message": "..."}`, never as a raw error chain.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::store::StoreError;

/// Message returned when an order id is unknown.
pub const ORDER_NOT_FOUND: &str = "order not found";

/// JSON body carrying a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiMessage {
    pub message: String,
}

impl ApiMessage {
    /// Wrap a message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Application-level error type for the relay.
#[derive(Debug, Error)]
pub enum AppError {
    /// Order store operation failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Resource not found (or nothing to deliver).
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Request body rejected by an extractor, with the status it chose
    /// (413 over the size limit, 415 without a JSON content type, ...).
    #[error("Rejected ({0}): {1}")]
    Rejected(StatusCode, String),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Rejected(rejection.status(), rejection.body_text())
    }
}

impl AppError {
    /// Whether the error is the server's fault rather than the caller's.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        matches!(
            self,
            Self::Store(StoreError::Io(_) | StoreError::Corrupt(_) | StoreError::Serialize(_))
        )
    }

    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Store(StoreError::OrderNotFound(_)) | Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Rejected(status, _) => *status,
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Store(StoreError::OrderNotFound(_)) => ORDER_NOT_FOUND.to_string(),
            Self::Store(_) => "internal server error".to_string(),
            Self::NotFound(msg) | Self::BadRequest(msg) | Self::Rejected(_, msg) => msg.clone(),
        };

        (self.status(), Json(ApiMessage::new(message))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
