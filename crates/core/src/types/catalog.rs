//! Catalog wire types.
//!
//! One spreadsheet tab per category; one row per product. Field names match
//! the sheet header row (`id,name,imageUrl,description,variants`) so the
//! JSON responses read the same as the stored data.

use serde::{Deserialize, Serialize};

/// A single catalog product.
///
/// Identity is `id` within its category tab. The parser guarantees both
/// `id` and `name` are non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    /// Normalized thumbnail URL (see [`crate::media::thumbnail_url`]).
    pub image_url: String,
    pub description: String,
    /// Free-form variant data from the `variants` column. Malformed JSON
    /// parses to an empty sequence.
    pub variants: Vec<serde_json::Value>,
    /// Tab name the product was read from.
    pub category: String,
}

/// Category listing entry: cover image plus product count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub cover: String,
    pub count: u32,
}

/// Legacy grouped-catalog entry: cover image plus full product list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryGroup {
    pub cover: String,
    pub items: Vec<Product>,
}
