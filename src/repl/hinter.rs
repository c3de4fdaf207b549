//! Hinter for reedline - shows the rest of the latest matching history entry

use nu_ansi_term::{Color, Style};
use reedline::{Hinter, History, SearchQuery};

/// Inline hint taken from the most recent history entry with the same prefix
pub struct HistoryHinter {
    style: Style,
    current_hint: String,
}

impl HistoryHinter {
    pub fn new() -> Self {
        Self {
            style: Style::new().italic().fg(Color::DarkGray),
            current_hint: String::new(),
        }
    }

    /// Override the hint style
    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }
}

impl Default for HistoryHinter {
    fn default() -> Self {
        Self::new()
    }
}

impl Hinter for HistoryHinter {
    /// Provide a hint for the current line
    ///
    /// # Arguments
    /// * `line` - The current input line
    /// * `pos` - Cursor position
    /// * `history` - Command history
    /// * `use_ansi_coloring` - Whether to use ANSI colors
    /// * `_cwd` - Current working directory (unused)
    ///
    /// # Returns
    /// * `String` - Hint text to display after the cursor
    fn handle(
        &mut self,
        line: &str,
        pos: usize,
        history: &dyn History,
        use_ansi_coloring: bool,
        _cwd: &str,
    ) -> String {
        self.current_hint.clear();

        if pos != line.len() || line.trim().is_empty() {
            return String::new();
        }

        let latest = history
            .search(SearchQuery::last_with_prefix(line.to_string(), None))
            .ok()
            .and_then(|results| results.into_iter().next());

        let Some(item) = latest else {
            return String::new();
        };
        let Some(hint) = item.command_line.strip_prefix(line) else {
            return String::new();
        };
        if hint.is_empty() {
            return String::new();
        }

        self.current_hint = hint.to_string();
        if use_ansi_coloring {
            self.style.paint(hint).to_string()
        } else {
            hint.to_string()
        }
    }

    fn complete_hint(&self) -> String {
        self.current_hint.clone()
    }

    /// Next word of the hint, leading whitespace included
    fn next_hint_token(&self) -> String {
        let trimmed = self.current_hint.trim_start();
        let leading = self.current_hint.len() - trimmed.len();
        let word = trimmed.find(char::is_whitespace).unwrap_or(trimmed.len());
        self.current_hint[..leading + word].to_string()
    }
}
