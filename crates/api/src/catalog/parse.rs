//! Row parsing for catalog tabs.
//!
//! A tab's first row is the header row and must contain all five required
//! column names by exact match; otherwise the whole tab parses to an empty
//! result, never partial data. Data rows become products only when both
//! `id` and `name` are non-empty after trimming. A sentinel "cover" row
//! supplies the category image and is never materialized as a product.

use almacen_core::media::{DEFAULT_THUMB_SIZE, thumbnail_url};
use almacen_core::{CategorySummary, Product};

const COVER_ID: &str = "_cover";
const COVER_NAME: &str = "categoryimage";

/// Full parse result for one tab.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SheetBlock {
    pub category: String,
    pub cover: String,
    pub items: Vec<Product>,
}

struct HeaderIndex {
    id: usize,
    name: usize,
    image_url: usize,
    description: usize,
    variants: usize,
}

fn locate_headers(header_row: &[String]) -> Option<HeaderIndex> {
    let find = |wanted: &str| header_row.iter().position(|cell| cell == wanted);
    Some(HeaderIndex {
        id: find("id")?,
        name: find("name")?,
        image_url: find("imageUrl")?,
        description: find("description")?,
        variants: find("variants")?,
    })
}

fn cell<'a>(row: &'a [String], idx: usize) -> &'a str {
    row.get(idx).map_or("", String::as_str)
}

/// Parse the serialized variants column. Any failure, and any JSON value
/// that is not an array, yields an empty sequence; malformed variant data
/// is swallowed rather than surfaced.
fn parse_variants(raw: &str) -> Vec<serde_json::Value> {
    if raw.trim().is_empty() {
        return Vec::new();
    }
    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(serde_json::Value::Array(items)) => items,
        _ => Vec::new(),
    }
}

/// Parse one tab's grid into its cover image and product list.
#[must_use]
pub fn parse_sheet(category: &str, grid: &[Vec<String>]) -> SheetBlock {
    let mut block = SheetBlock {
        category: category.to_string(),
        ..SheetBlock::default()
    };

    let Some(headers) = grid.first().and_then(|row| locate_headers(row)) else {
        return block;
    };

    for (i, row) in grid.iter().enumerate().skip(1) {
        let id = cell(row, headers.id).trim();
        let name = cell(row, headers.name).trim();
        let image = thumbnail_url(cell(row, headers.image_url), DEFAULT_THUMB_SIZE);
        let description = cell(row, headers.description).trim();
        let variants = parse_variants(cell(row, headers.variants));

        let is_cover = id.to_lowercase() == COVER_ID
            || name.to_lowercase() == COVER_NAME
            || (i == 1
                && !image.is_empty()
                && id.is_empty()
                && name.is_empty()
                && description.is_empty()
                && variants.is_empty());

        if is_cover {
            // A later cover-like row overwrites an earlier one. Quirk kept
            // from the sheet conventions in the field.
            if !image.is_empty() {
                block.cover = image;
            }
            continue;
        }

        if !id.is_empty() && !name.is_empty() {
            block.items.push(Product {
                id: id.to_string(),
                name: name.to_string(),
                image_url: image,
                description: description.to_string(),
                variants,
                category: category.to_string(),
            });
        }
    }

    block
}

/// Metadata-only parse: cover and product count without materializing rows.
///
/// Only the first data row is inspected for an explicit cover marker
/// (`_cover` id or `categoryImage` name with an image present), so a
/// cover-like row further down makes the count one higher than the full
/// parse would report. Category listings tolerate that.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn parse_sheet_meta(grid: &[Vec<String>]) -> CategorySummary {
    if grid.len() < 2 {
        return CategorySummary {
            cover: String::new(),
            count: 0,
        };
    }
    let data_rows = (grid.len() - 1) as u32;

    let Some(headers) = grid.first().and_then(|row| locate_headers(row)) else {
        return CategorySummary {
            cover: String::new(),
            count: data_rows,
        };
    };

    let mut cover = String::new();
    if let Some(row) = grid.get(1) {
        let id = cell(row, headers.id).trim().to_lowercase();
        let name = cell(row, headers.name).trim().to_lowercase();
        let image = thumbnail_url(cell(row, headers.image_url), DEFAULT_THUMB_SIZE);
        if (id == COVER_ID || name == COVER_NAME) && !image.is_empty() {
            cover = image;
        }
    }

    let cover_offset = u32::from(!cover.is_empty());
    CategorySummary {
        cover,
        count: data_rows.saturating_sub(cover_offset),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|row| row.iter().map(ToString::to_string).collect())
            .collect()
    }

    const HEADERS: &[&str] = &["id", "name", "imageUrl", "description", "variants"];

    #[test]
    fn missing_header_returns_empty_result() {
        let g = grid(&[
            &["id", "name", "imageUrl", "description"], // no variants column
            &["p1", "Almendras", "", "", ""],
        ]);
        let block = parse_sheet("Frutos secos", &g);
        assert!(block.items.is_empty());
        assert!(block.cover.is_empty());
    }

    #[test]
    fn reordered_headers_are_located_by_name() {
        let g = grid(&[
            &["variants", "description", "imageUrl", "name", "id"],
            &["", "crudas", "", "Almendras", "p1"],
        ]);
        let block = parse_sheet("Frutos secos", &g);
        assert_eq!(block.items.len(), 1);
        let item = &block.items[0];
        assert_eq!(item.id, "p1");
        assert_eq!(item.name, "Almendras");
        assert_eq!(item.description, "crudas");
    }

    #[test]
    fn rows_without_id_or_name_are_dropped() {
        let g = grid(&[
            HEADERS,
            &["", "Sin id", "", "desc", ""],
            &["p2", "", "", "desc", ""],
            &["p3", "Nueces", "", "", ""],
        ]);
        let block = parse_sheet("Frutos secos", &g);
        assert_eq!(block.items.len(), 1);
        assert_eq!(block.items[0].id, "p3");
    }

    #[test]
    fn cover_id_row_sets_cover_and_is_not_a_product() {
        let g = grid(&[
            HEADERS,
            &["_COVER", "", "fileId123", "", ""],
            &["p1", "Almendras", "", "", ""],
        ]);
        let block = parse_sheet("Frutos secos", &g);
        assert_eq!(
            block.cover,
            "https://drive.google.com/thumbnail?id=fileId123&sz=w800"
        );
        assert_eq!(block.items.len(), 1);
    }

    #[test]
    fn cover_name_row_is_detected_case_insensitively() {
        let g = grid(&[HEADERS, &["x", "CategoryImage", "fileId123", "", ""]]);
        let block = parse_sheet("Frutos secos", &g);
        assert!(!block.cover.is_empty());
        assert!(block.items.is_empty());
    }

    #[test]
    fn image_only_first_data_row_is_a_cover() {
        let g = grid(&[
            HEADERS,
            &["", "", "fileId123", "", ""],
            &["p1", "Almendras", "", "", ""],
        ]);
        let block = parse_sheet("Frutos secos", &g);
        assert!(!block.cover.is_empty());
        assert_eq!(block.items.len(), 1);
    }

    #[test]
    fn image_only_row_past_the_first_is_not_a_cover() {
        let g = grid(&[
            HEADERS,
            &["p1", "Almendras", "", "", ""],
            &["", "", "fileId123", "", ""],
        ]);
        let block = parse_sheet("Frutos secos", &g);
        assert!(block.cover.is_empty());
        assert_eq!(block.items.len(), 1);
    }

    #[test]
    fn later_cover_row_overwrites_earlier_one() {
        let g = grid(&[
            HEADERS,
            &["_cover", "", "firstId", "", ""],
            &["_cover", "", "secondId", "", ""],
        ]);
        let block = parse_sheet("Frutos secos", &g);
        assert!(block.cover.contains("secondId"));
    }

    #[test]
    fn malformed_variants_parse_to_empty() {
        let g = grid(&[
            HEADERS,
            &["p1", "Almendras", "", "", "{not json"],
            &["p2", "Nueces", "", "", r#"{"kg": 1}"#], // valid JSON, not an array
            &["p3", "Miel", "", "", r#"[{"size":"500g","price":1200}]"#],
        ]);
        let block = parse_sheet("Frutos secos", &g);
        assert!(block.items[0].variants.is_empty());
        assert!(block.items[1].variants.is_empty());
        assert_eq!(block.items[2].variants.len(), 1);
    }

    #[test]
    fn short_rows_read_as_empty_cells() {
        let g = grid(&[HEADERS, &["p1", "Almendras"]]);
        let block = parse_sheet("Frutos secos", &g);
        assert_eq!(block.items.len(), 1);
        assert!(block.items[0].description.is_empty());
    }

    #[test]
    fn meta_counts_exclude_header_and_cover() {
        let g = grid(&[
            HEADERS,
            &["_cover", "", "fileId123", "", ""],
            &["p1", "Almendras", "", "", ""],
            &["p2", "Nueces", "", "", ""],
        ]);
        let meta = parse_sheet_meta(&g);
        assert_eq!(meta.count, 2);
        assert!(meta.cover.contains("fileId123"));
    }

    #[test]
    fn meta_without_cover_counts_all_data_rows() {
        let g = grid(&[HEADERS, &["p1", "Almendras", "", "", ""]]);
        let meta = parse_sheet_meta(&g);
        assert_eq!(meta.count, 1);
        assert!(meta.cover.is_empty());
    }

    #[test]
    fn meta_on_header_only_tab_is_empty() {
        let g = grid(&[HEADERS]);
        let meta = parse_sheet_meta(&g);
        assert_eq!(meta.count, 0);
    }

    #[test]
    fn meta_missing_headers_still_counts_rows() {
        let g = grid(&[&["a", "b"], &["1", "2"], &["3", "4"]]);
        let meta = parse_sheet_meta(&g);
        assert_eq!(meta.count, 2);
        assert!(meta.cover.is_empty());
    }
}
