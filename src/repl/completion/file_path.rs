//! File-path completion inside quoted arguments
//!
//! Active only when the cursor sits inside an open double-quoted segment.
//! The quoted text is split at its last path separator; the directory part
//! is listed and entries are filtered with the same split-match rule used
//! for names.
//!
//! Quote depth is decided by a raw count of `"` characters left of the
//! cursor. Escaped quotes (`\"`) are counted like any other, so a path that
//! contains one can be misclassified as "outside quotes".

use std::fs;
use std::path::{Path, PathBuf, is_separator};

use tracing::debug;

use super::provider::{SuggestionProvider, SuggestionResult, split_match, valid_cursor};

/// Completes relative paths typed inside quotes
#[derive(Debug, Clone)]
pub struct FilePathSuggestions {
    base_dir: PathBuf,
}

impl FilePathSuggestions {
    /// Create a strategy resolving relative paths against `base_dir`
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Directory relative paths are resolved against
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Span `(open_quote + 1, closing)` of the quoted path around `cursor`
    fn quoted_span(text: &str, cursor: usize) -> Option<(usize, usize)> {
        let before = &text[..cursor];
        if before.matches('"').count() % 2 == 0 {
            return None;
        }

        let start = before.rfind('"')? + 1;
        let end = text[cursor..]
            .find('"')
            .map_or(text.len(), |idx| cursor + idx);
        Some((start, end))
    }

    fn list_dir(&self, dir_prefix: &str) -> Vec<String> {
        let dir = if dir_prefix.is_empty() {
            self.base_dir.clone()
        } else {
            self.base_dir.join(dir_prefix)
        };

        match fs::read_dir(&dir) {
            Ok(entries) => entries
                .filter_map(|entry| entry.ok())
                .filter_map(|entry| entry.file_name().into_string().ok())
                .collect(),
            Err(e) => {
                debug!("Cannot list {}: {}", dir.display(), e);
                Vec::new()
            }
        }
    }
}

impl Default for FilePathSuggestions {
    fn default() -> Self {
        Self::new(".")
    }
}

impl SuggestionProvider for FilePathSuggestions {
    fn suggest(&self, text: &str, cursor: usize) -> SuggestionResult {
        if !valid_cursor(text, cursor) {
            return SuggestionResult::empty();
        }
        let Some((start, end)) = Self::quoted_span(text, cursor) else {
            return SuggestionResult::empty();
        };

        let typed = &text[start..cursor];
        let split = typed
            .char_indices()
            .filter(|&(_, c)| is_separator(c))
            .last()
            .map_or(0, |(idx, c)| idx + c.len_utf8());
        let dir_prefix = &typed[..split];
        let name_prefix = &typed[split..];
        let name_suffix = &text[cursor..end];

        let mut candidates: Vec<String> = self
            .list_dir(dir_prefix)
            .into_iter()
            .filter(|name| split_match(name, name_prefix, name_suffix))
            .map(|name| format!("{dir_prefix}{name}"))
            .collect();
        candidates.sort();

        SuggestionResult::new(candidates, start, Some(end))
    }
}
