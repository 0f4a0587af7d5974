//! Two-stage picker for staging a column filter.
//!
//! The user first chooses a column, then one of its catalog values. Only the
//! first [`PREVIEW_LIMIT`] values are offered; the remainder is reported as a
//! count. The leading "All values" option removes the column's filter.

use crate::api::models::ColumnCatalog;

use super::cursor::ListCursor;

/// Maximum number of catalog values offered per column.
pub const PREVIEW_LIMIT: usize = 50;

/// Label of the option that clears a column's filter.
pub const ALL_VALUES_LABEL: &str = "All values";

/// Which list the picker is showing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerStage {
    /// Choosing a column.
    Column,
    /// Choosing a value of `header`.
    Value {
        /// Column being filtered.
        header: String,
    },
}

/// Result of confirming the highlighted option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerChoice {
    /// The picker moved on to the value stage.
    Continue,
    /// A value was chosen; empty means "All values".
    Chosen {
        /// Column being filtered.
        header: String,
        /// Chosen value.
        value: String,
    },
    /// Nothing to choose from.
    Empty,
}

/// State of the column filter picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnPicker {
    stage: PickerStage,
    columns: Vec<String>,
    values: Vec<String>,
    hidden_values: usize,
    /// Highlighted option.
    pub cursor: ListCursor,
}

impl ColumnPicker {
    /// Opens the picker at the column stage.
    #[must_use]
    pub fn for_columns(columns: Vec<String>) -> Self {
        Self {
            stage: PickerStage::Column,
            columns,
            values: Vec::new(),
            hidden_values: 0,
            cursor: ListCursor::default(),
        }
    }

    /// Opens the picker directly at the value stage for `header`.
    ///
    /// The cursor starts on `current` when it is among the offered values.
    #[must_use]
    pub fn for_values(header: &str, catalog: &ColumnCatalog, current: Option<&str>) -> Self {
        let mut picker = Self::for_columns(Vec::new());
        picker.enter_values(header, catalog, current);
        picker
    }

    /// Current stage.
    #[must_use]
    pub const fn stage(&self) -> &PickerStage {
        &self.stage
    }

    /// Catalog values beyond the preview limit.
    #[must_use]
    pub const fn hidden_values(&self) -> usize {
        self.hidden_values
    }

    /// Number of options in the current stage.
    #[must_use]
    pub fn option_count(&self) -> usize {
        match self.stage {
            PickerStage::Column => self.columns.len(),
            PickerStage::Value { .. } => self.values.len().saturating_add(1),
        }
    }

    /// Full option labels for the current stage, in display order.
    #[must_use]
    pub fn options(&self) -> Vec<&str> {
        match self.stage {
            PickerStage::Column => self.columns.iter().map(String::as_str).collect(),
            PickerStage::Value { .. } => std::iter::once(ALL_VALUES_LABEL)
                .chain(self.values.iter().map(String::as_str))
                .collect(),
        }
    }

    /// Confirms the highlighted option.
    pub fn choose(&mut self, catalog: &ColumnCatalog, current: Option<&str>) -> PickerChoice {
        match &self.stage {
            PickerStage::Column => {
                let Some(header) = self.columns.get(self.cursor.position).cloned() else {
                    return PickerChoice::Empty;
                };
                self.enter_values(&header, catalog, current);
                PickerChoice::Continue
            }
            PickerStage::Value { header } => {
                let value = self
                    .cursor
                    .position
                    .checked_sub(1)
                    .and_then(|index| self.values.get(index))
                    .cloned()
                    .unwrap_or_default();
                PickerChoice::Chosen {
                    header: header.clone(),
                    value,
                }
            }
        }
    }

    /// Steps back from the value stage. Returns false when already at the
    /// column stage or opened directly on a column, meaning the picker should
    /// close.
    pub fn back(&mut self) -> bool {
        if matches!(self.stage, PickerStage::Value { .. }) && !self.columns.is_empty() {
            self.stage = PickerStage::Column;
            self.values.clear();
            self.hidden_values = 0;
            self.cursor = ListCursor::default();
            return true;
        }
        false
    }

    fn enter_values(&mut self, header: &str, catalog: &ColumnCatalog, current: Option<&str>) {
        let all_values = catalog.values(header);
        self.values = all_values.iter().take(PREVIEW_LIMIT).cloned().collect();
        self.hidden_values = all_values.len().saturating_sub(PREVIEW_LIMIT);
        let position = current
            .and_then(|value| self.values.iter().position(|candidate| candidate == value))
            .map_or(0, |index| index.saturating_add(1));
        self.cursor = ListCursor {
            position,
            scroll_offset: 0,
        };
        self.stage = PickerStage::Value {
            header: header.to_owned(),
        };
    }
}
