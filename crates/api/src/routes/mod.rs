//! HTTP routes for the storefront API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /         - Catalog reads, dispatched by the `action` query param:
//!                    ?action=places
//!                    ?action=categories&place=<id>
//!                    ?action=products&place=<id>&category=<name>
//!                    ?action=search&place=<id>&q=<term>
//!                    ?grouped=true&place=<id>   (legacy, no action)
//! POST /         - Order submission (JSON payload)
//! GET  /health   - Liveness check
//! ```
//!
//! The storefront frontend predates path-based routing here: it calls one
//! endpoint with an `action` parameter, so the router dispatches on that.
//! Unknown actions get a structured payload listing valid ones, never a
//! transport-level failure.

pub mod catalog;
pub mod orders;

use axum::{Router, routing::get};

use crate::state::AppState;

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Create all routes for the API.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(catalog::dispatch).post(orders::submit))
        .route("/health", get(health))
}
