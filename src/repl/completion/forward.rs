//! Forwarder-aware completion
//!
//! A forwarder line is split at its separator. Left of it the forwarder's own
//! options are completed; right of it the forwarded command is completed by
//! the root strategy as if it had been typed on its own line.

use std::sync::{Arc, OnceLock, Weak};

use super::provider::{SuggestionProvider, SuggestionResult, valid_cursor};
use crate::parser::SeparatorSplit;

/// Splits at the separator and routes each half to the right strategy
pub struct ForwardSuggestions {
    separator: String,
    options: Arc<dyn SuggestionProvider>,
    root: OnceLock<Weak<dyn SuggestionProvider>>,
}

impl ForwardSuggestions {
    pub fn new(separator: impl Into<String>, options: Arc<dyn SuggestionProvider>) -> Self {
        Self {
            separator: separator.into(),
            options,
            root: OnceLock::new(),
        }
    }

    /// Bind the strategy that completes forwarded commands
    ///
    /// Only the first binding is kept. The root usually owns this strategy
    /// through the command table, hence the weak reference.
    pub fn bind_root(&self, root: Weak<dyn SuggestionProvider>) {
        let _ = self.root.set(root);
    }

    fn suggest_forwarded(&self, text: &str, cursor: usize, forward_start: usize) -> SuggestionResult {
        let Some(root) = self.root.get().and_then(Weak::upgrade) else {
            return SuggestionResult::empty();
        };

        let leading = text[forward_start..].len() - text[forward_start..].trim_start().len();
        let offset = (forward_start + leading).min(cursor);

        root.suggest(&text[offset..], cursor - offset).shifted(offset)
    }
}

impl SuggestionProvider for ForwardSuggestions {
    fn suggest(&self, text: &str, cursor: usize) -> SuggestionResult {
        if !valid_cursor(text, cursor) {
            return SuggestionResult::empty();
        }

        let split = SeparatorSplit::find(text, &self.separator);
        match split.forward_start {
            Some(forward_start) if cursor > forward_start => {
                self.suggest_forwarded(text, cursor, forward_start)
            }
            // On the separator itself
            Some(_) if cursor > split.options_end => SuggestionResult::empty(),
            Some(_) => self
                .options
                .suggest(&text[..split.options_end], cursor)
                .clipped(split.options_end),
            None => self.options.suggest(text, cursor),
        }
    }
}
