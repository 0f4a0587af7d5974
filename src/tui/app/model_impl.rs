//! `Model` trait implementation for the workspace TUI application.

use std::any::Any;

use bubbletea_rs::{Cmd, Model};
use unicode_width::UnicodeWidthChar;

use super::WorkspaceApp;
use crate::tui::input::map_key_to_message;
use crate::tui::messages::AppMsg;

impl Model for WorkspaceApp {
    fn init() -> (Self, Option<Cmd>) {
        let model = crate::tui::context().map_or_else(|| Self::new(Vec::new()), Self::with_context);

        // Emit an immediate startup message to trigger the first render and
        // open the configured file.
        let cmd = Self::immediate_init_cmd();

        (model, Some(cmd))
    }

    fn update(&mut self, msg: Box<dyn Any + Send>) -> Option<Cmd> {
        let event = match msg.downcast::<AppMsg>() {
            Ok(app_msg) => return self.handle_message(*app_msg),
            Err(original) => original,
        };

        if let Some(key_msg) = event.downcast_ref::<bubbletea_rs::event::KeyMsg>() {
            if self.show_help {
                return self.handle_message(AppMsg::ToggleHelp);
            }
            let mapped = map_key_to_message(key_msg, self.input_context())?;
            return self.handle_message(mapped);
        }

        if let Some(size_msg) = event.downcast_ref::<bubbletea_rs::event::WindowSizeMsg>() {
            return self.handle_message(AppMsg::WindowResized {
                width: size_msg.width,
                height: size_msg.height,
            });
        }

        None
    }

    fn view(&self) -> String {
        if self.show_help {
            return self.normalise_viewport(&Self::render_help_overlay());
        }

        let mut output = String::new();
        output.push_str(&self.render_header());
        output.push_str(&self.render_body());
        output.push_str(&self.render_status_bar());

        self.normalise_viewport(&output)
    }
}

impl WorkspaceApp {
    pub(super) fn immediate_init_cmd() -> Cmd {
        Box::pin(async { Some(Box::new(AppMsg::Initialized) as Box<dyn Any + Send>) })
    }

    /// Normalises the rendered frame to terminal dimensions.
    ///
    /// Rows are clamped to one column less than the terminal width to avoid
    /// autowrap, and padded with spaces to clear cells left by earlier
    /// frames.
    fn normalise_viewport(&self, output: &str) -> String {
        let width = usize::from(self.width.max(1));
        let safe_width = width.saturating_sub(1).max(1);
        let height = usize::from(self.height.max(1));

        let mut lines: Vec<String> = output
            .lines()
            .map(|line| pad_or_truncate_line(line, safe_width))
            .collect();
        lines.truncate(height);

        let missing = height.saturating_sub(lines.len());
        let blank = " ".repeat(safe_width);
        lines.extend(std::iter::repeat_n(blank, missing));

        let mut normalised = lines.join("\n");
        normalised.push('\n');
        normalised
    }
}

fn pad_or_truncate_line(line: &str, width: usize) -> String {
    let mut output = String::new();
    let mut visible_width = 0_usize;

    for ch in line.chars() {
        let char_width = UnicodeWidthChar::width(ch).unwrap_or(0);
        if char_width == 0 {
            output.push(ch);
            continue;
        }
        if visible_width.saturating_add(char_width) > width {
            break;
        }
        output.push(ch);
        visible_width = visible_width.saturating_add(char_width);
    }

    output.extend(std::iter::repeat_n(' ', width.saturating_sub(visible_width)));
    output
}
