//! Overlay listing the options of the column filter picker.

use crate::tui::state::{ColumnPicker, PickerStage};

use super::text_truncate::{fit_to_width, preview_value};

/// Context for rendering the picker overlay.
#[derive(Debug, Clone, Copy)]
pub struct ColumnPickerViewContext<'a> {
    /// Picker state.
    pub picker: &'a ColumnPicker,
    /// Overlay width in columns.
    pub width: usize,
    /// Lines available for options.
    pub visible_height: usize,
}

/// Component for displaying the column filter picker.
#[derive(Debug, Clone, Copy, Default)]
pub struct ColumnPickerComponent;

impl ColumnPickerComponent {
    /// Renders the stage title, the visible options, and the hidden-value
    /// count.
    #[must_use]
    pub fn view(ctx: &ColumnPickerViewContext<'_>) -> Vec<String> {
        let picker = ctx.picker;
        let title = match picker.stage() {
            PickerStage::Column => "Filter by column:".to_owned(),
            PickerStage::Value { header } => format!("Values of {header}:"),
        };
        let mut lines = vec![fit_to_width(&title, ctx.width)];

        let options = picker.options();
        if options.is_empty() {
            lines.push(fit_to_width("  No columns", ctx.width));
        }
        let visible = options
            .iter()
            .enumerate()
            .skip(picker.cursor.scroll_offset)
            .take(ctx.visible_height.max(1));
        for (index, option) in visible {
            let pointer = if index == picker.cursor.position { '>' } else { ' ' };
            lines.push(fit_to_width(
                &format!("{pointer} {}", preview_value(option)),
                ctx.width,
            ));
        }

        if picker.hidden_values() > 0 {
            let more = format!("  ... and {} more", picker.hidden_values());
            lines.push(fit_to_width(&more, ctx.width));
        }
        lines.push(fit_to_width("Enter choose  Esc back", ctx.width));
        lines
    }
}
