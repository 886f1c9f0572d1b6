//! Order submission payload and receipt types.
//!
//! Orders are write-once: the API appends rows to the destination sheet and
//! never mutates or deletes them. The payload shape matches what the
//! checkout form posts, so everything except `place` and `items` is
//! tolerated as missing.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A submitted customer order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    /// Place id the order belongs to (required).
    #[serde(default)]
    pub place: String,
    /// Display name of the place as shown at checkout.
    #[serde(default)]
    pub place_name: String,
    #[serde(default)]
    pub customer: Customer,
    /// Ordered line items (required, non-empty).
    #[serde(default)]
    pub items: Vec<OrderItem>,
    #[serde(default)]
    pub subtotal: Option<Decimal>,
    #[serde(default)]
    pub shipping: Option<Shipping>,
    #[serde(default)]
    pub total: Option<Decimal>,
    /// Client-side ISO 8601 timestamp; server time is used when absent.
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// Customer contact details collected at checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub area: String,
    #[serde(default)]
    pub notes: String,
}

/// One ordered line item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub variant: Option<String>,
    #[serde(default)]
    pub qty: u32,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub subtotal: Option<Decimal>,
}

/// Shipping option chosen at checkout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shipping {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub price: Option<Decimal>,
}

/// What the writer reports back after appending an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderReceipt {
    /// Timestamp as written to the sheet (`YYYY-MM-DD - HH:MM:SS`).
    pub timestamp: String,
    /// Physical rows appended, separators included.
    pub rows_inserted: u32,
    /// Destination tab name.
    pub sheet_name: String,
}
