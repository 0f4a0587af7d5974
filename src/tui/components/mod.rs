//! Pane renderers for the workspace TUI.
//!
//! Each component is stateless: it takes a borrowed view context and returns
//! the pane's lines, already fitted to the pane width, so the application
//! can lay panes side by side.

mod column_picker;
mod file_list;
mod filter_sidebar;
mod row_table;
pub(crate) mod text_truncate;

pub use column_picker::{ColumnPickerComponent, ColumnPickerViewContext};
pub use file_list::{FileListComponent, FileListViewContext};
pub use filter_sidebar::{FilterSidebarComponent, FilterSidebarViewContext};
pub use row_table::{RowTableComponent, RowTableViewContext};
