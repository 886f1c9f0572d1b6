//! In-memory [`SheetStore`] for unit tests.
//!
//! Preserves tab insertion order (the catalog concatenates search results
//! in sheet-iteration order, so tests depend on it) and counts grid reads
//! so cache behavior can be asserted.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::{SheetStore, StoreError};

type Grid = Vec<Vec<String>>;

#[derive(Default)]
struct StoreState {
    // store id -> ordered (title, grid) pairs
    stores: HashMap<String, Vec<(String, Grid)>>,
}

/// In-memory spreadsheet fake.
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<StoreState>>,
    grid_reads: Arc<AtomicU64>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed or replace a tab's grid.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn insert_sheet(&self, store_id: &str, sheet: &str, grid: Grid) {
        #[allow(clippy::unwrap_used)]
        let mut state = self.state.lock().unwrap();
        let tabs = state.stores.entry(store_id.to_string()).or_default();
        match tabs.iter_mut().find(|(title, _)| title == sheet) {
            Some(existing) => existing.1 = grid,
            None => tabs.push((sheet.to_string(), grid)),
        }
    }

    /// Snapshot of one tab's grid, if it exists.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn grid(&self, store_id: &str, sheet: &str) -> Option<Grid> {
        #[allow(clippy::unwrap_used)]
        let state = self.state.lock().unwrap();
        state
            .stores
            .get(store_id)?
            .iter()
            .find(|(title, _)| title == sheet)
            .map(|(_, grid)| grid.clone())
    }

    /// Number of `read_grid` calls served so far.
    #[must_use]
    pub fn grid_reads(&self) -> u64 {
        self.grid_reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SheetStore for MemoryStore {
    async fn sheet_titles(&self, store_id: &str) -> Result<Vec<String>, StoreError> {
        #[allow(clippy::unwrap_used)]
        let state = self.state.lock().unwrap();
        Ok(state
            .stores
            .get(store_id)
            .map(|tabs| tabs.iter().map(|(title, _)| title.clone()).collect())
            .unwrap_or_default())
    }

    async fn read_grid(&self, store_id: &str, sheet: &str) -> Result<Vec<Vec<String>>, StoreError> {
        self.grid_reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.grid(store_id, sheet).unwrap_or_default())
    }

    async fn append_rows(
        &self,
        store_id: &str,
        sheet: &str,
        rows: &[Vec<String>],
    ) -> Result<u32, StoreError> {
        #[allow(clippy::unwrap_used)]
        let mut state = self.state.lock().unwrap();
        let tabs = state.stores.entry(store_id.to_string()).or_default();
        let index = tabs
            .iter()
            .position(|(title, _)| title == sheet)
            .unwrap_or_else(|| {
                tabs.push((sheet.to_string(), Vec::new()));
                tabs.len() - 1
            });
        if let Some((_, grid)) = tabs.get_mut(index) {
            grid.extend(rows.iter().cloned());
        }
        #[allow(clippy::cast_possible_truncation)]
        Ok(rows.len() as u32)
    }

    async fn create_sheet(&self, store_id: &str, sheet: &str) -> Result<(), StoreError> {
        #[allow(clippy::unwrap_used)]
        let mut state = self.state.lock().unwrap();
        let tabs = state.stores.entry(store_id.to_string()).or_default();
        if !tabs.iter().any(|(title, _)| title == sheet) {
            tabs.push((sheet.to_string(), Vec::new()));
        }
        Ok(())
    }
}
