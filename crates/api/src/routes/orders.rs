//! Order submission handler.

use almacen_core::OrderRequest;
use axum::Json;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::instrument;

use crate::error::Result;
use crate::orders::OrderError;
use crate::state::AppState;

/// Accept an order payload and append it to the orders workbook.
///
/// The payload is taken as raw JSON first so shape problems (`items` not a
/// sequence, wrong field types) come back in the same
/// `{success:false, error}` envelope as semantic validation failures.
#[instrument(skip(state, payload))]
pub async fn submit(
    State(state): State<AppState>,
    Json(payload): Json<serde_json::Value>,
) -> Result<Response> {
    let order: OrderRequest = serde_json::from_value(payload)
        .map_err(|e| OrderError::Invalid(format!("malformed order payload: {e}")))?;

    let receipt = state.orders().submit(&order).await?;

    Ok(Json(json!({
        "success": true,
        "message": "order saved",
        "result": receipt,
    }))
    .into_response())
}
