//! Unified error handling with Sentry integration.
//!
//! Every failure crossing the request boundary becomes a structured JSON
//! payload; nothing is allowed to crash the process. The write path keeps
//! the `{success:false, error}` shape the checkout form expects, the read
//! path a plain `{error}`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::catalog::CatalogError;
use crate::orders::OrderError;

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Catalog read failed.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Order submission failed.
    #[error(transparent)]
    Order(#[from] OrderError),
}

impl AppError {
    const fn store_failure(&self) -> bool {
        matches!(
            self,
            Self::Catalog(CatalogError::Store(_)) | Self::Order(OrderError::Store(_))
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture backing-store failures to Sentry
        if self.store_failure() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        match self {
            Self::Catalog(CatalogError::UnknownPlace(id)) => (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": format!("unknown place: {id}") })),
            )
                .into_response(),
            Self::Catalog(CatalogError::Store(_)) => (
                StatusCode::BAD_GATEWAY,
                Json(json!({ "error": backing_store_message() })),
            )
                .into_response(),
            Self::Order(OrderError::Invalid(message)) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "success": false, "error": message })),
            )
                .into_response(),
            Self::Order(OrderError::Store(_)) => (
                StatusCode::BAD_GATEWAY,
                Json(json!({ "success": false, "error": backing_store_message() })),
            )
                .into_response(),
        }
    }
}

/// Don't expose backend details to clients.
fn backing_store_message() -> &'static str {
    "backing store unavailable"
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
