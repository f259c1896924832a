//! Integration tests for the Pedidos relay.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p pedidos-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `orders_api` - HTTP surface against a file-backed store
//! - `file_store` - Order store persistence and legacy documents
//!
//! Every test gets its own temporary directory; nothing binds a socket.

use std::path::PathBuf;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use pedidos_relay::routes;
use pedidos_relay::state::AppState;
use pedidos_relay::store::OrderStore;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

/// A relay wired to a document inside a private temp directory.
pub struct TestContext {
    pub app: Router,
    pub db_file: PathBuf,
    _dir: TempDir,
}

/// Response captured from the router.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl TestResponse {
    /// Parse the body as JSON.
    ///
    /// # Panics
    ///
    /// Panics if the body is not valid JSON.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("response body is JSON")
    }

    /// Body as UTF-8 text.
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

impl TestContext {
    /// Fresh relay with no document on disk.
    ///
    /// # Panics
    ///
    /// Panics if the temp directory cannot be created.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let db_file = dir.path().join("db.json");
        let app = routes::app(AppState::new(OrderStore::file(&db_file)));

        Self {
            app,
            db_file,
            _dir: dir,
        }
    }

    /// A second store over the same document, as a restarted process would see it.
    #[must_use]
    pub fn reopen_store(&self) -> OrderStore {
        OrderStore::file(&self.db_file)
    }

    /// Send a request with an optional JSON body.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or the router fails.
    #[allow(clippy::expect_used)]
    pub async fn send(&self, method: Method, uri: &str, body: Option<&Value>) -> TestResponse {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("build request");

        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body")
            .to_vec();

        TestResponse { status, body }
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}
