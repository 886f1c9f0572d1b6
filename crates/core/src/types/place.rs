//! Storefront locations.

use serde::{Deserialize, Serialize};

/// One storefront location with its own catalog spreadsheet.
///
/// Places are static deployment configuration; the table never changes at
/// runtime. The public API only exposes `id` and `name` - the backing
/// spreadsheet id stays server-side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    /// Stable lowercase identifier used in query parameters (e.g. `santafe`).
    pub id: String,
    /// Human-readable name, also the orders tab title (e.g. `Santa Fe`).
    pub name: String,
    /// Backing spreadsheet id for this place's catalog.
    #[serde(skip_serializing)]
    pub sheet_id: String,
}

impl Place {
    /// Public listing entry: id and name only.
    #[must_use]
    pub fn summary(&self) -> PlaceSummary {
        PlaceSummary {
            id: self.id.clone(),
            name: self.name.clone(),
        }
    }
}

/// Wire shape for `?action=places`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceSummary {
    pub id: String,
    pub name: String,
}
