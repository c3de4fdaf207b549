//! Completer for reedline - bridges the suggestion handler to the line editor

use std::sync::Arc;

use reedline::{Completer, Span, Suggestion};

use super::completion::SuggestionProvider;

/// Feeds reedline's completion menu from a [`SuggestionProvider`]
pub struct ShellCompleter {
    handler: Arc<dyn SuggestionProvider>,
}

impl ShellCompleter {
    pub fn new(handler: Arc<dyn SuggestionProvider>) -> Self {
        Self { handler }
    }
}

impl Completer for ShellCompleter {
    /// Complete the input at the given cursor position
    ///
    /// An unbounded replacement span ends at the cursor.
    fn complete(&mut self, line: &str, pos: usize) -> Vec<Suggestion> {
        let result = self.handler.suggest(line, pos);
        let span = Span::new(result.start, result.end.unwrap_or(pos).max(result.start));

        result
            .candidates
            .into_iter()
            .map(|value| Suggestion {
                value,
                description: None,
                style: None,
                extra: None,
                span,
                append_whitespace: false,
                match_indices: None,
            })
            .collect()
    }
}
