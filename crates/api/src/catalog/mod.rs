//! Catalog read path.
//!
//! Composes the row parser across all non-hidden tabs of a place's backing
//! spreadsheet, with the short-TTL response cache in front. Tabs whose
//! title starts with [`HIDDEN_PREFIX`] are invisible to every operation.

pub mod parse;

use std::sync::Arc;

use almacen_core::{CategoryGroup, Place, PlaceSummary, Product};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::cache::ResponseCache;
use crate::config::UnknownPlacePolicy;
use crate::store::{SheetStore, StoreError};

use parse::{parse_sheet, parse_sheet_meta};

/// Tabs starting with this prefix are ignored by all read operations.
pub const HIDDEN_PREFIX: &str = "_";

/// Catalog read failures.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("unknown place: {0}")]
    UnknownPlace(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Read-side service over the place table, backing store, and cache.
#[derive(Clone)]
pub struct CatalogService {
    store: Arc<dyn SheetStore>,
    cache: Arc<dyn ResponseCache>,
    places: Arc<Vec<Place>>,
    unknown_place: UnknownPlacePolicy,
}

impl CatalogService {
    pub fn new(
        store: Arc<dyn SheetStore>,
        cache: Arc<dyn ResponseCache>,
        places: Arc<Vec<Place>>,
        unknown_place: UnknownPlacePolicy,
    ) -> Self {
        Self {
            store,
            cache,
            places,
            unknown_place,
        }
    }

    /// All configured places, public fields only.
    #[must_use]
    pub fn list_places(&self) -> Vec<PlaceSummary> {
        self.places.iter().map(Place::summary).collect()
    }

    /// Resolve a place id per the configured unknown-place policy:
    /// fall back to the first configured place, or reject.
    fn resolve_place(&self, place_id: &str) -> Result<&Place, CatalogError> {
        let wanted = place_id.trim().to_lowercase();
        if let Some(place) = self.places.iter().find(|p| p.id == wanted) {
            return Ok(place);
        }
        match self.unknown_place {
            UnknownPlacePolicy::Fallback => self
                .places
                .first()
                .ok_or_else(|| CatalogError::UnknownPlace(wanted.clone())),
            UnknownPlacePolicy::Reject => Err(CatalogError::UnknownPlace(wanted)),
        }
    }

    /// Titles of the place's visible catalog tabs, in tab order.
    async fn visible_sheets(&self, place: &Place) -> Result<Vec<String>, CatalogError> {
        let titles = self.store.sheet_titles(&place.sheet_id).await?;
        Ok(titles
            .into_iter()
            .filter(|t| !t.starts_with(HIDDEN_PREFIX))
            .collect())
    }

    async fn cached(&self, key: &str) -> Option<Value> {
        let hit = self.cache.get(key).await;
        if hit.is_some() {
            debug!(key, "cache hit");
        }
        hit
    }

    /// Category listing: tab name -> `{cover, count}`.
    #[instrument(skip(self))]
    pub async fn list_categories(&self, place_id: &str) -> Result<Value, CatalogError> {
        let place = self.resolve_place(place_id)?;
        let key = format!("categories:{}", place.id);
        if let Some(hit) = self.cached(&key).await {
            return Ok(hit);
        }

        let mut out = serde_json::Map::new();
        for title in self.visible_sheets(place).await? {
            let grid = self.store.read_grid(&place.sheet_id, &title).await?;
            let summary = parse_sheet_meta(&grid);
            out.insert(title, serde_json::to_value(summary).unwrap_or(Value::Null));
        }

        let value = Value::Object(out);
        self.cache.put(key, value.clone()).await;
        Ok(value)
    }

    /// Products of one category tab. Unknown categories are an empty list,
    /// not an error.
    #[instrument(skip(self))]
    pub async fn list_products(
        &self,
        place_id: &str,
        category: &str,
    ) -> Result<Value, CatalogError> {
        let place = self.resolve_place(place_id)?;
        let category = category.trim();
        let key = format!("products:{}:{category}", place.id);
        if let Some(hit) = self.cached(&key).await {
            return Ok(hit);
        }

        let items: Vec<Product> = if self
            .visible_sheets(place)
            .await?
            .iter()
            .any(|t| t == category)
        {
            let grid = self.store.read_grid(&place.sheet_id, category).await?;
            parse_sheet(category, &grid).items
        } else {
            Vec::new()
        };

        let value = serde_json::to_value(items).unwrap_or_else(|_| Value::Array(Vec::new()));
        self.cache.put(key, value.clone()).await;
        Ok(value)
    }

    /// Case-insensitive substring search over product names and
    /// descriptions, across every visible tab. Matches are concatenated in
    /// tab order, then row order.
    #[instrument(skip(self))]
    pub async fn search(&self, place_id: &str, term: &str) -> Result<Value, CatalogError> {
        let place = self.resolve_place(place_id)?;
        let needle = term.trim().to_lowercase();
        let key = format!("search:{}:{needle}", place.id);
        if let Some(hit) = self.cached(&key).await {
            return Ok(hit);
        }

        let mut matches: Vec<Product> = Vec::new();
        for title in self.visible_sheets(place).await? {
            let grid = self.store.read_grid(&place.sheet_id, &title).await?;
            matches.extend(parse_sheet(&title, &grid).items.into_iter().filter(|p| {
                p.name.to_lowercase().contains(&needle)
                    || p.description.to_lowercase().contains(&needle)
            }));
        }

        let value = serde_json::to_value(matches).unwrap_or_else(|_| Value::Array(Vec::new()));
        self.cache.put(key, value.clone()).await;
        Ok(value)
    }

    /// Legacy grouped catalog: tab name -> `{cover, items}` with full
    /// product lists. Kept for older storefront builds.
    #[instrument(skip(self))]
    pub async fn grouped_catalog(&self, place_id: &str) -> Result<Value, CatalogError> {
        let place = self.resolve_place(place_id)?;
        let key = format!("grouped:{}", place.id);
        if let Some(hit) = self.cached(&key).await {
            return Ok(hit);
        }

        let mut out = serde_json::Map::new();
        for title in self.visible_sheets(place).await? {
            let grid = self.store.read_grid(&place.sheet_id, &title).await?;
            let block = parse_sheet(&title, &grid);
            let group = CategoryGroup {
                cover: block.cover,
                items: block.items,
            };
            out.insert(title, serde_json::to_value(group).unwrap_or(Value::Null));
        }

        let value = Value::Object(out);
        self.cache.put(key, value.clone()).await;
        Ok(value)
    }
}
