//! Catalog read dispatch.

use axum::Json;
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use crate::error::Result;
use crate::state::AppState;

/// Everything the read endpoint accepts, old and new.
#[derive(Debug, Deserialize)]
pub struct CatalogQuery {
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub place: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub q: String,
    /// Legacy flag: `grouped=true` with no action returns the full
    /// grouped catalog.
    #[serde(default)]
    pub grouped: String,
    /// Legacy alias: `meta=places` predates `action=places`.
    #[serde(default)]
    pub meta: String,
}

const VALID_ACTIONS: [&str; 4] = ["places", "categories", "products", "search"];

fn unknown_action_payload(message: &str) -> serde_json::Value {
    json!({
        "error": message,
        "validActions": VALID_ACTIONS,
        "example": "?action=categories&place=santafe",
    })
}

/// Dispatch a read request by its `action` parameter.
///
/// Underspecified or unrecognized requests answer HTTP 200 with a payload
/// enumerating the valid actions; the storefront frontend renders that
/// instead of treating it as a transport failure.
#[instrument(skip(state))]
pub async fn dispatch(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> Result<Response> {
    let action = query.action.trim().to_lowercase();
    let place = query.place.trim().to_lowercase();
    let category = query.category.trim();

    if action == "places" || query.meta.trim().to_lowercase() == "places" {
        return Ok(Json(state.catalog().list_places()).into_response());
    }

    if action == "categories" && !place.is_empty() {
        let data = state.catalog().list_categories(&place).await?;
        return Ok(Json(data).into_response());
    }

    if action == "products" && !place.is_empty() && !category.is_empty() {
        let data = state.catalog().list_products(&place, category).await?;
        return Ok(Json(data).into_response());
    }

    if action == "search" && !place.is_empty() {
        let term = query.q.trim();
        if term.is_empty() {
            return Ok(Json(unknown_action_payload("search requires a q parameter")).into_response());
        }
        let data = state.catalog().search(&place, term).await?;
        return Ok(Json(data).into_response());
    }

    // Old storefront builds fetch the whole catalog in one call
    if action.is_empty() && query.grouped.trim() == "true" && !place.is_empty() {
        let data = state.catalog().grouped_catalog(&place).await?;
        return Ok(Json(data).into_response());
    }

    Ok(Json(unknown_action_payload(
        "unrecognized action or missing parameters",
    ))
    .into_response())
}
