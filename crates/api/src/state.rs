//! Application state shared across handlers.

use std::sync::Arc;

use crate::cache::MokaCache;
use crate::catalog::CatalogService;
use crate::config::ApiConfig;
use crate::orders::OrderService;
use crate::store::{GoogleSheetsStore, SheetStore};

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`; holds the configuration and the two
/// services every request dispatches into.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ApiConfig,
    catalog: CatalogService,
    orders: OrderService,
}

impl AppState {
    /// Create state backed by the Google Sheets API.
    #[must_use]
    pub fn new(config: ApiConfig) -> Self {
        let store = Arc::new(GoogleSheetsStore::new(config.sheets_token.clone()));
        Self::with_store(config, store)
    }

    /// Create state over any backing store. Tests inject the in-memory
    /// fake through here.
    #[must_use]
    pub fn with_store(config: ApiConfig, store: Arc<dyn SheetStore>) -> Self {
        let cache = Arc::new(MokaCache::new(config.cache_ttl));
        let catalog = CatalogService::new(
            Arc::clone(&store),
            cache,
            Arc::clone(&config.places),
            config.unknown_place,
        );
        let orders = OrderService::new(
            store,
            config.orders_sheet_id.clone(),
            Arc::clone(&config.places),
            config.order_layout,
        );

        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                orders,
            }),
        }
    }

    /// Get a reference to the API configuration.
    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.inner.config
    }

    /// Get a reference to the catalog read service.
    #[must_use]
    pub fn catalog(&self) -> &CatalogService {
        &self.inner.catalog
    }

    /// Get a reference to the order write service.
    #[must_use]
    pub fn orders(&self) -> &OrderService {
        &self.inner.orders
    }
}
