//! Width-aware truncation and padding for fixed-width terminal cells.
//!
//! Widths are measured in terminal columns rather than Unicode scalar count,
//! so wide glyphs in cell values do not break table alignment.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const ELLIPSIS: &str = "...";

/// Maximum characters of a catalog value shown in the column picker.
pub(crate) const PREVIEW_VALUE_CHARS: usize = 25;

/// Truncates text to `max_width` columns, ending with `...` when cut.
///
/// Widths of three or fewer columns fall back to dots only.
pub(crate) fn truncate_to_width(text: &str, max_width: usize) -> String {
    if max_width == 0 {
        return String::new();
    }
    if text.width() <= max_width {
        return text.to_owned();
    }
    if max_width <= ELLIPSIS.len() {
        return ".".repeat(max_width);
    }

    let budget = max_width.saturating_sub(ELLIPSIS.len());
    let mut truncated = String::new();
    let mut used = 0_usize;
    for ch in text.chars() {
        let width = UnicodeWidthChar::width(ch).unwrap_or(0);
        if used.saturating_add(width) > budget {
            break;
        }
        truncated.push(ch);
        used = used.saturating_add(width);
    }
    truncated.push_str(ELLIPSIS);
    truncated
}

/// Truncates then right-pads text so it occupies exactly `width` columns.
pub(crate) fn fit_to_width(text: &str, width: usize) -> String {
    let mut fitted = truncate_to_width(text, width);
    let padding = width.saturating_sub(fitted.width());
    fitted.extend(std::iter::repeat_n(' ', padding));
    fitted
}

/// Shortens a catalog value for the picker: at most
/// [`PREVIEW_VALUE_CHARS`] characters followed by `...` when longer.
pub(crate) fn preview_value(value: &str) -> String {
    if value.chars().count() <= PREVIEW_VALUE_CHARS {
        return value.to_owned();
    }
    let mut preview: String = value.chars().take(PREVIEW_VALUE_CHARS).collect();
    preview.push_str(ELLIPSIS);
    preview
}

/// Keeps at most `max_lines` lines, replacing the last kept line with `...`
/// when anything was cut.
pub(crate) fn truncate_lines(lines: &mut Vec<String>, max_lines: usize) {
    if max_lines == 0 || lines.len() <= max_lines {
        return;
    }
    lines.truncate(max_lines.saturating_sub(1));
    lines.push(ELLIPSIS.to_owned());
}
