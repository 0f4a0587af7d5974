//! Row selection bookkeeping.

use std::collections::BTreeSet;

use crate::api::models::{CsvRow, RowId};

/// Set of checked row ids for the currently loaded dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: BTreeSet<RowId>,
}

impl Selection {
    /// Creates an empty selection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `id` when absent, removes it when present.
    ///
    /// Returns true when the row is selected afterwards.
    pub fn toggle(&mut self, id: &RowId) -> bool {
        if self.ids.remove(id) {
            false
        } else {
            self.ids.insert(id.clone())
        }
    }

    /// Clears the selection when every row is selected, otherwise selects
    /// every row in `rows`.
    ///
    /// The comparison is made against the rows currently loaded, which may
    /// be a filtered subset of the file.
    pub fn toggle_all(&mut self, rows: &[CsvRow]) {
        if self.ids.len() == rows.len() {
            self.ids.clear();
        } else {
            self.ids = rows.iter().map(|row| row.id.clone()).collect();
        }
    }

    /// Deselects everything.
    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Returns true when `id` is selected.
    #[must_use]
    pub fn contains(&self, id: &RowId) -> bool {
        self.ids.contains(id)
    }

    /// Number of selected rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns true when nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Returns true when every row in `rows` is selected and there is at
    /// least one row.
    #[must_use]
    pub fn covers(&self, rows: &[CsvRow]) -> bool {
        !rows.is_empty() && self.ids.len() == rows.len()
    }

    /// Selected ids in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = &RowId> {
        self.ids.iter()
    }

    /// Selected ids collected for a request body.
    #[must_use]
    pub fn to_vec(&self) -> Vec<RowId> {
        self.ids.iter().cloned().collect()
    }
}
