//! Order write path.
//!
//! Validates a submitted order and appends it to the per-place orders tab,
//! creating the tab with its header row on first use. Rows are append-only;
//! nothing here updates or deletes existing data.

use std::sync::Arc;

use almacen_core::{OrderItem, OrderReceipt, OrderRequest, Place};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;
use tracing::instrument;

use crate::store::{SheetStore, StoreError};

/// Destination tab for orders whose place id is not configured.
const FALLBACK_SHEET: &str = "Otros";

/// Order submission failures.
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("invalid order: {0}")]
    Invalid(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// How an order is laid out as sheet rows.
///
/// Both shapes exist in live order sheets; which one a deployment writes
/// is configuration, not code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrderLayout {
    /// One row per order; items rendered into a single detail cell.
    Merged,
    /// One row per item, customer fields only on the first, the whole
    /// order bracketed by blank separator rows.
    #[default]
    PerItem,
}

impl OrderLayout {
    /// Header row written when the destination tab is created.
    #[must_use]
    pub fn headers(self) -> &'static [&'static str] {
        match self {
            Self::Merged => &[
                "Fecha y Hora",
                "Nombre",
                "Teléfono",
                "Dirección",
                "Zona",
                "Lugar",
                "Notas",
                "Detalle Productos",
                "Subtotal",
                "Envío",
                "Total",
            ],
            Self::PerItem => &[
                "Fecha y Hora",
                "Nombre",
                "Teléfono",
                "Dirección",
                "Zona",
                "Lugar",
                "Notas",
                "Detalle Producto",
                "Codigo Producto",
                "Cantidad",
            ],
        }
    }
}

/// Write-side service over the orders spreadsheet.
#[derive(Clone)]
pub struct OrderService {
    store: Arc<dyn SheetStore>,
    spreadsheet_id: String,
    places: Arc<Vec<Place>>,
    layout: OrderLayout,
}

impl OrderService {
    pub fn new(
        store: Arc<dyn SheetStore>,
        spreadsheet_id: String,
        places: Arc<Vec<Place>>,
        layout: OrderLayout,
    ) -> Self {
        Self {
            store,
            spreadsheet_id,
            places,
            layout,
        }
    }

    /// Validate and append one order. Returns what was written and where.
    #[instrument(skip(self, order), fields(place = %order.place, items = order.items.len()))]
    pub async fn submit(&self, order: &OrderRequest) -> Result<OrderReceipt, OrderError> {
        if order.place.trim().is_empty() {
            return Err(OrderError::Invalid("missing place".to_string()));
        }
        if order.items.is_empty() {
            return Err(OrderError::Invalid(
                "items must be a non-empty list".to_string(),
            ));
        }

        let sheet_name = self.destination_sheet(&order.place);
        self.ensure_sheet(&sheet_name).await?;

        let timestamp = format_timestamp(order.timestamp.as_deref());
        let rows = match self.layout {
            OrderLayout::Merged => vec![merged_row(order, &timestamp)],
            OrderLayout::PerItem => per_item_rows(order, &timestamp),
        };

        let rows_inserted = self
            .store
            .append_rows(&self.spreadsheet_id, &sheet_name, &rows)
            .await?;

        Ok(OrderReceipt {
            timestamp,
            rows_inserted,
            sheet_name,
        })
    }

    /// Orders for unconfigured places land in a shared overflow tab rather
    /// than being dropped.
    fn destination_sheet(&self, place_id: &str) -> String {
        let wanted = place_id.trim().to_lowercase();
        self.places
            .iter()
            .find(|p| p.id == wanted)
            .map_or_else(|| FALLBACK_SHEET.to_string(), |p| p.name.clone())
    }

    async fn ensure_sheet(&self, sheet_name: &str) -> Result<(), StoreError> {
        let titles = self.store.sheet_titles(&self.spreadsheet_id).await?;
        if titles.iter().any(|t| t == sheet_name) {
            return Ok(());
        }
        self.store
            .create_sheet(&self.spreadsheet_id, sheet_name)
            .await?;
        let header: Vec<String> = self
            .layout
            .headers()
            .iter()
            .map(ToString::to_string)
            .collect();
        self.store
            .append_rows(&self.spreadsheet_id, sheet_name, &[header])
            .await?;
        Ok(())
    }
}

/// `YYYY-MM-DD - HH:MM:SS`, or the raw input when it does not parse.
fn format_timestamp(iso: Option<&str>) -> String {
    const FORMAT: &str = "%Y-%m-%d - %H:%M:%S";
    iso.map_or_else(
        || Utc::now().format(FORMAT).to_string(),
        |raw| {
            DateTime::parse_from_rfc3339(raw)
                .map_or_else(|_| raw.to_string(), |dt| dt.format(FORMAT).to_string())
        },
    )
}

/// Human-readable rendering of one item:
/// `[code] name (variant) xqty = $subtotal`, optional parts omitted.
fn item_detail(item: &OrderItem) -> String {
    let mut out = String::new();
    if let Some(code) = item.code.as_deref().filter(|c| !c.is_empty()) {
        out.push_str(&format!("[{code}] "));
    }
    out.push_str(&item.name);
    if let Some(variant) = item.variant.as_deref().filter(|v| !v.is_empty()) {
        out.push_str(&format!(" ({variant})"));
    }
    out.push_str(&format!(" x{}", item.qty));
    if let Some(subtotal) = item.subtotal {
        out.push_str(&format!(" = ${subtotal}"));
    }
    out
}

fn shipping_cell(order: &OrderRequest) -> String {
    order.shipping.as_ref().map_or_else(String::new, |s| {
        s.price
            .filter(|p| !p.is_zero())
            .map_or_else(|| s.label.clone(), |p| format!("{} - ${p}", s.label))
    })
}

fn amount_cell(amount: Option<rust_decimal::Decimal>) -> String {
    amount.map_or_else(String::new, |a| format!("${a}"))
}

fn merged_row(order: &OrderRequest, timestamp: &str) -> Vec<String> {
    let detail = order
        .items
        .iter()
        .map(item_detail)
        .collect::<Vec<_>>()
        .join("\n");
    vec![
        timestamp.to_string(),
        order.customer.name.clone(),
        order.customer.phone.clone(),
        order.customer.address.clone(),
        order.customer.area.clone(),
        order.place_name.clone(),
        order.customer.notes.clone(),
        detail,
        amount_cell(order.subtotal),
        shipping_cell(order),
        amount_cell(order.total),
    ]
}

fn per_item_rows(order: &OrderRequest, timestamp: &str) -> Vec<Vec<String>> {
    let width = OrderLayout::PerItem.headers().len();
    // A single space in the first cell keeps the blank row from being
    // collapsed by the backing store.
    let mut separator = vec![String::new(); width];
    if let Some(first) = separator.first_mut() {
        first.push(' ');
    }

    let mut rows = Vec::with_capacity(order.items.len() + 2);
    rows.push(separator.clone());
    for (index, item) in order.items.iter().enumerate() {
        let mut row = if index == 0 {
            vec![
                timestamp.to_string(),
                order.customer.name.clone(),
                order.customer.phone.clone(),
                order.customer.address.clone(),
                order.customer.area.clone(),
                order.place_name.clone(),
                order.customer.notes.clone(),
            ]
        } else {
            vec![String::new(); 7]
        };
        row.push(item.name.clone());
        row.push(item.code.clone().unwrap_or_default());
        row.push(item.qty.to_string());
        rows.push(row);
    }
    rows.push(separator);
    rows
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use almacen_core::{Customer, Shipping};
    use rust_decimal::Decimal;

    const ORDERS_ID: &str = "orders-store";

    fn places() -> Arc<Vec<Place>> {
        Arc::new(vec![Place {
            id: "santafe".to_string(),
            name: "Santa Fe".to_string(),
            sheet_id: "catalog-sf".to_string(),
        }])
    }

    fn service(store: &MemoryStore, layout: OrderLayout) -> OrderService {
        OrderService::new(
            Arc::new(store.clone()),
            ORDERS_ID.to_string(),
            places(),
            layout,
        )
    }

    fn sample_order() -> OrderRequest {
        OrderRequest {
            place: "santafe".to_string(),
            place_name: "Santa Fe".to_string(),
            customer: Customer {
                name: "Test Usuario".to_string(),
                phone: "3425123456".to_string(),
                address: "Calle Falsa 123".to_string(),
                area: "Centro".to_string(),
                notes: "timbre roto".to_string(),
            },
            items: vec![
                OrderItem {
                    code: Some("ALM001".to_string()),
                    name: "Almendras".to_string(),
                    variant: Some("500g".to_string()),
                    qty: 2,
                    price: Some(Decimal::new(1500, 0)),
                    subtotal: Some(Decimal::new(3000, 0)),
                },
                OrderItem {
                    code: None,
                    name: "Granola".to_string(),
                    variant: None,
                    qty: 1,
                    price: None,
                    subtotal: None,
                },
            ],
            subtotal: Some(Decimal::new(5500, 0)),
            shipping: Some(Shipping {
                label: "Envío sin costo".to_string(),
                price: Some(Decimal::ZERO),
            }),
            total: Some(Decimal::new(5500, 0)),
            timestamp: Some("2026-08-26T14:30:05-03:00".to_string()),
        }
    }

    #[tokio::test]
    async fn rejects_missing_place() {
        let store = MemoryStore::new();
        let svc = service(&store, OrderLayout::PerItem);
        let mut order = sample_order();
        order.place = String::new();

        let err = svc.submit(&order).await.unwrap_err();
        assert!(matches!(err, OrderError::Invalid(msg) if msg.contains("place")));
        assert!(store.grid(ORDERS_ID, "Santa Fe").is_none());
    }

    #[tokio::test]
    async fn rejects_empty_items() {
        let store = MemoryStore::new();
        let svc = service(&store, OrderLayout::PerItem);
        let mut order = sample_order();
        order.items.clear();

        let err = svc.submit(&order).await.unwrap_err();
        assert!(matches!(err, OrderError::Invalid(msg) if msg.contains("items")));
    }

    #[tokio::test]
    async fn creates_sheet_with_headers_on_first_order() {
        let store = MemoryStore::new();
        let svc = service(&store, OrderLayout::PerItem);

        let receipt = svc.submit(&sample_order()).await.unwrap();
        assert_eq!(receipt.sheet_name, "Santa Fe");
        assert_eq!(receipt.timestamp, "2026-08-26 - 14:30:05");

        let grid = store.grid(ORDERS_ID, "Santa Fe").unwrap();
        assert_eq!(grid[0][0], "Fecha y Hora");
        assert_eq!(grid[0].len(), 10);
    }

    #[tokio::test]
    async fn per_item_layout_brackets_items_with_separators() {
        let store = MemoryStore::new();
        let svc = service(&store, OrderLayout::PerItem);

        let receipt = svc.submit(&sample_order()).await.unwrap();
        // two items + two separators
        assert_eq!(receipt.rows_inserted, 4);

        let grid = store.grid(ORDERS_ID, "Santa Fe").unwrap();
        // header, separator, first item, second item, separator
        assert_eq!(grid.len(), 5);
        assert_eq!(grid[1][0], " ");
        assert_eq!(grid[2][1], "Test Usuario");
        assert_eq!(grid[2][7], "Almendras");
        assert_eq!(grid[2][9], "2");
        // subsequent item rows leave customer fields blank
        assert_eq!(grid[3][1], "");
        assert_eq!(grid[3][7], "Granola");
        assert_eq!(grid[4][0], " ");
    }

    #[tokio::test]
    async fn merged_layout_writes_one_row_per_order() {
        let store = MemoryStore::new();
        let svc = service(&store, OrderLayout::Merged);

        let receipt = svc.submit(&sample_order()).await.unwrap();
        assert_eq!(receipt.rows_inserted, 1);

        let grid = store.grid(ORDERS_ID, "Santa Fe").unwrap();
        assert_eq!(grid.len(), 2);
        let detail = &grid[1][7];
        assert_eq!(
            detail,
            "[ALM001] Almendras (500g) x2 = $3000\nGranola x1"
        );
        assert_eq!(grid[1][8], "$5500");
        assert_eq!(grid[1][9], "Envío sin costo");
    }

    #[tokio::test]
    async fn unknown_place_lands_in_overflow_sheet() {
        let store = MemoryStore::new();
        let svc = service(&store, OrderLayout::PerItem);
        let mut order = sample_order();
        order.place = "rosario".to_string();

        let receipt = svc.submit(&order).await.unwrap();
        assert_eq!(receipt.sheet_name, "Otros");
        assert!(store.grid(ORDERS_ID, "Otros").is_some());
    }

    #[tokio::test]
    async fn existing_sheet_does_not_get_a_second_header() {
        let store = MemoryStore::new();
        let svc = service(&store, OrderLayout::Merged);

        svc.submit(&sample_order()).await.unwrap();
        svc.submit(&sample_order()).await.unwrap();

        let grid = store.grid(ORDERS_ID, "Santa Fe").unwrap();
        let header_rows = grid.iter().filter(|r| r[0] == "Fecha y Hora").count();
        assert_eq!(header_rows, 1);
    }

    #[test]
    fn unparseable_timestamp_passes_through() {
        assert_eq!(format_timestamp(Some("mañana")), "mañana");
    }

    #[test]
    fn shipping_with_price_is_rendered_with_amount() {
        let mut order = sample_order();
        order.shipping = Some(Shipping {
            label: "Moto".to_string(),
            price: Some(Decimal::new(800, 0)),
        });
        assert_eq!(shipping_cell(&order), "Moto - $800");
    }
}
