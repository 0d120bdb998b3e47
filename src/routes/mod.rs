//! Router Module Index
//!
//! The catalog exposes a single, unauthenticated route table plus a health
//! probe.

/// Catalog CRUD endpoints for authors, books and publishers.
pub mod catalog;

use crate::AppState;
use axum::{Router, routing::get};

/// Routes that are not part of the catalog itself.
pub fn service_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Used for monitoring and load balancer checks.
        .route("/health", get(|| async { "ok" }))
}
