//! CORS policy for the browser-based menu.
//!
//! The menu is served from a different origin than the relay, and the PDV
//! poller may be a browser app too, so the policy is fully open. There are no
//! credentials to protect.

use tower_http::cors::{Any, CorsLayer};

/// Allow any origin, method, and header.
#[must_use]
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}
