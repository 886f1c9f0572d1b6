//! Image reference normalization.
//!
//! Catalog sheets store image references in whatever shape the person
//! editing the sheet pasted in: a full Drive share link, a `?id=` download
//! link, a bare file id, or an already-normalized thumbnail URL. Everything
//! is canonicalized to the Drive thumbnail endpoint so the frontend gets
//! one predictable URL shape.

use std::sync::LazyLock;

use regex::Regex;

/// Default thumbnail width in pixels.
pub const DEFAULT_THUMB_SIZE: u32 = 800;

// Patterns are compile-time constants
#[allow(clippy::unwrap_used)]
static PATH_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/d/([A-Za-z0-9_-]+)").unwrap());

#[allow(clippy::unwrap_used)]
static QUERY_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[?&]id=([A-Za-z0-9_-]+)").unwrap());

#[allow(clippy::unwrap_used)]
static BARE_ID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").unwrap());

/// Canonicalize a raw image reference into a thumbnail URL.
///
/// Recognized inputs:
/// - an existing `drive.google.com/thumbnail` URL (returned unchanged)
/// - a share link with a `/d/<id>` path segment
/// - a download link with an `?id=<id>` query parameter
/// - a bare file id (alphanumeric, `-`, `_`)
///
/// Anything else - including the empty string - is returned unchanged; the
/// caller may have stored a direct URL to some other host.
#[must_use]
pub fn thumbnail_url(raw: &str, size: u32) -> String {
    if raw.is_empty() || raw.contains("drive.google.com/thumbnail") {
        return raw.to_string();
    }

    let id = PATH_ID
        .captures(raw)
        .or_else(|| QUERY_ID.captures(raw))
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .or_else(|| BARE_ID.is_match(raw).then_some(raw));

    id.map_or_else(
        || raw.to_string(),
        |id| format!("https://drive.google.com/thumbnail?id={id}&sz=w{size}"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_stays_empty() {
        assert_eq!(thumbnail_url("", DEFAULT_THUMB_SIZE), "");
    }

    #[test]
    fn existing_thumbnail_passes_through() {
        let url = "https://drive.google.com/thumbnail?id=abc123&sz=w400";
        assert_eq!(thumbnail_url(url, 800), url);
    }

    #[test]
    fn share_link_path_segment() {
        let url = "https://drive.google.com/file/d/1AbC_d-9/view?usp=sharing";
        assert_eq!(
            thumbnail_url(url, 800),
            "https://drive.google.com/thumbnail?id=1AbC_d-9&sz=w800"
        );
    }

    #[test]
    fn download_link_query_parameter() {
        let url = "https://drive.google.com/uc?export=view&id=XyZ-42_q";
        assert_eq!(
            thumbnail_url(url, 800),
            "https://drive.google.com/thumbnail?id=XyZ-42_q&sz=w800"
        );
    }

    #[test]
    fn bare_file_id() {
        assert_eq!(
            thumbnail_url("1Ip039frWoi6pFtBDV-uWq5yKet1D", 400),
            "https://drive.google.com/thumbnail?id=1Ip039frWoi6pFtBDV-uWq5yKet1D&sz=w400"
        );
    }

    #[test]
    fn unrecognized_reference_unchanged() {
        let url = "https://example.com/photos/almendras.jpg";
        assert_eq!(thumbnail_url(url, 800), url);
    }

    #[test]
    fn requested_size_is_embedded() {
        let out = thumbnail_url("someFileId", 1200);
        assert!(out.ends_with("&sz=w1200"));
    }
}
