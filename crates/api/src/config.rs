//! API configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `ALMACEN_PLACES` - JSON array of places:
//!   `[{"id":"santafe","name":"Santa Fe","sheetId":"<spreadsheet id>"}, ...]`
//! - `ALMACEN_ORDERS_SHEET_ID` - Spreadsheet id for the orders workbook
//! - `SHEETS_ACCESS_TOKEN` - OAuth bearer token for the Sheets API
//!
//! ## Optional
//! - `ALMACEN_HOST` - Bind address (default: 127.0.0.1)
//! - `ALMACEN_PORT` - Listen port (default: 3000)
//! - `ALMACEN_CACHE_TTL_SECS` - Catalog cache TTL (default: 300)
//! - `ALMACEN_UNKNOWN_PLACE` - `fallback` (default) or `reject`
//! - `ALMACEN_ORDER_LAYOUT` - `per-item` (default) or `merged`
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use almacen_core::Place;
use secrecy::SecretString;
use thiserror::Error;

use crate::cache::DEFAULT_TTL;
use crate::orders::OrderLayout;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// What to do when a read request names an unknown place id.
///
/// `Fallback` serves the first configured place, which keeps old storefront
/// builds with stale place ids working but can mask misconfiguration;
/// `Reject` surfaces a not-found error instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownPlacePolicy {
    #[default]
    Fallback,
    Reject,
}

impl FromStr for UnknownPlacePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fallback" => Ok(Self::Fallback),
            "reject" => Ok(Self::Reject),
            other => Err(format!("expected 'fallback' or 'reject', got '{other}'")),
        }
    }
}

impl FromStr for OrderLayout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "merged" => Ok(Self::Merged),
            "per-item" => Ok(Self::PerItem),
            other => Err(format!("expected 'merged' or 'per-item', got '{other}'")),
        }
    }
}

/// API application configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Configured places, in priority order (first is the fallback)
    pub places: Arc<Vec<Place>>,
    /// Spreadsheet id of the orders workbook
    pub orders_sheet_id: String,
    /// Sheets API bearer token
    pub sheets_token: SecretString,
    /// Catalog response cache TTL
    pub cache_ttl: Duration,
    /// Unknown place handling on the read path
    pub unknown_place: UnknownPlacePolicy,
    /// Order row layout
    pub order_layout: OrderLayout,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

impl ApiConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid,
    /// or if the place table is empty.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("ALMACEN_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("ALMACEN_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("ALMACEN_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("ALMACEN_PORT".to_string(), e.to_string()))?;

        let places = parse_places(&get_required_env("ALMACEN_PLACES")?)
            .map_err(|e| ConfigError::InvalidEnvVar("ALMACEN_PLACES".to_string(), e))?;

        let orders_sheet_id = get_required_env("ALMACEN_ORDERS_SHEET_ID")?;
        let sheets_token = SecretString::from(get_required_env("SHEETS_ACCESS_TOKEN")?);

        let cache_ttl = match get_optional_env("ALMACEN_CACHE_TTL_SECS") {
            Some(raw) => Duration::from_secs(raw.parse::<u64>().map_err(|e| {
                ConfigError::InvalidEnvVar("ALMACEN_CACHE_TTL_SECS".to_string(), e.to_string())
            })?),
            None => DEFAULT_TTL,
        };

        let unknown_place = get_env_or_default("ALMACEN_UNKNOWN_PLACE", "fallback")
            .parse()
            .map_err(|e| ConfigError::InvalidEnvVar("ALMACEN_UNKNOWN_PLACE".to_string(), e))?;
        let order_layout = get_env_or_default("ALMACEN_ORDER_LAYOUT", "per-item")
            .parse()
            .map_err(|e| ConfigError::InvalidEnvVar("ALMACEN_ORDER_LAYOUT".to_string(), e))?;

        let sentry_dsn = get_optional_env("SENTRY_DSN");

        Ok(Self {
            host,
            port,
            places: Arc::new(places),
            orders_sheet_id,
            sheets_token,
            cache_ttl,
            unknown_place,
            order_layout,
            sentry_dsn,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Parse and validate the place table.
fn parse_places(raw: &str) -> Result<Vec<Place>, String> {
    let places: Vec<Place> = serde_json::from_str(raw).map_err(|e| e.to_string())?;
    if places.is_empty() {
        return Err("at least one place must be configured".to_string());
    }
    for place in &places {
        if place.id.trim().is_empty() || place.sheet_id.trim().is_empty() {
            return Err(format!("place '{}' needs both id and sheetId", place.name));
        }
        if place.id != place.id.to_lowercase() {
            return Err(format!("place id '{}' must be lowercase", place.id));
        }
    }
    Ok(places)
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
