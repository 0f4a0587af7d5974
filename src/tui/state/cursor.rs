//! Cursor and scroll tracking for vertical lists.
//!
//! The cursor is retained when the list changes length and clamped to the
//! valid range.

/// Cursor position and scroll offset within a list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListCursor {
    /// Current cursor position (0-indexed).
    pub position: usize,
    /// Index of the first visible item.
    pub scroll_offset: usize,
}

impl ListCursor {
    /// Clamps the cursor to a list of `count` items.
    pub const fn clamp(&mut self, count: usize) {
        if count == 0 {
            self.position = 0;
            self.scroll_offset = 0;
        } else if self.position >= count {
            self.position = count.saturating_sub(1);
        }
    }

    /// Moves up by `step`, stopping at the first item.
    pub const fn up(&mut self, step: usize) {
        self.position = self.position.saturating_sub(step);
    }

    /// Moves down by `step`, stopping at the last of `count` items.
    pub fn down(&mut self, step: usize, count: usize) {
        let max_index = count.saturating_sub(1);
        self.position = self.position.saturating_add(step).min(max_index);
    }

    /// Moves to the first item.
    pub const fn home(&mut self) {
        self.position = 0;
        self.scroll_offset = 0;
    }

    /// Moves to the last of `count` items.
    pub const fn end(&mut self, count: usize) {
        self.position = count.saturating_sub(1);
    }

    /// Adjusts the scroll offset so the cursor stays within a viewport of
    /// `visible_height` items.
    pub const fn ensure_visible(&mut self, visible_height: usize) {
        if self.position < self.scroll_offset {
            self.scroll_offset = self.position;
            return;
        }

        let viewport_end = self.scroll_offset.saturating_add(visible_height);
        if self.position >= viewport_end {
            self.scroll_offset = self
                .position
                .saturating_sub(visible_height.saturating_sub(1));
        }
    }
}
