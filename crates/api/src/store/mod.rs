//! Backing-store access.
//!
//! Every catalog read and order write goes through the [`SheetStore`]
//! capability: list the tabs of a spreadsheet, read a tab's used grid,
//! append rows, create a tab. The production implementation talks to the
//! Google Sheets v4 REST API; tests run against [`memory::MemoryStore`].

pub mod google;
pub mod memory;

use async_trait::async_trait;
use thiserror::Error;

pub use google::GoogleSheetsStore;
pub use memory::MemoryStore;

/// Failures talking to the storage backend.
///
/// These are transient by nature; there is no retry layer, a single hiccup
/// surfaces to the caller as a structured error payload.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("backing store request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("backing store rejected request ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("unexpected backing store response: {0}")]
    Malformed(String),
}

/// Access to one or more spreadsheet-shaped stores, keyed by store id.
///
/// Grids are returned as the used range only, every cell stringified. Row
/// and column indices are zero-based from the used range's origin; the
/// first returned row is the header row.
#[async_trait]
pub trait SheetStore: Send + Sync {
    /// Titles of all tabs in the store, in tab order.
    async fn sheet_titles(&self, store_id: &str) -> Result<Vec<String>, StoreError>;

    /// The used cell grid of one tab. Empty if the tab has no content.
    async fn read_grid(&self, store_id: &str, sheet: &str) -> Result<Vec<Vec<String>>, StoreError>;

    /// Append rows after the last row with content. Returns rows written.
    async fn append_rows(
        &self,
        store_id: &str,
        sheet: &str,
        rows: &[Vec<String>],
    ) -> Result<u32, StoreError>;

    /// Create a new empty tab with the given title.
    async fn create_sheet(&self, store_id: &str, sheet: &str) -> Result<(), StoreError>;
}
