//! Command-name completion
//!
//! Active while the cursor is still inside the first token of the line.

use super::provider::{SuggestionProvider, SuggestionResult, split_match, valid_cursor};

/// Completes the command name at the start of a line
#[derive(Debug, Clone, Default)]
pub struct CommandNameSuggestions {
    names: Vec<String>,
}

impl CommandNameSuggestions {
    /// Create a strategy over registered names plus extra allowed names
    pub fn new<I, J>(registered: I, extra: J) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
        J: IntoIterator,
        J::Item: Into<String>,
    {
        let mut names: Vec<String> = registered
            .into_iter()
            .map(Into::into)
            .chain(extra.into_iter().map(Into::into))
            .collect();
        names.sort();
        names.dedup();
        Self { names }
    }

    /// End of the command-name token, if the cursor is still inside it
    pub fn active_span(text: &str, cursor: usize) -> Option<usize> {
        if !valid_cursor(text, cursor) {
            return None;
        }
        let token_end = text.find([' ', '\t']).unwrap_or(text.len());
        (cursor <= token_end).then_some(token_end)
    }
}

impl SuggestionProvider for CommandNameSuggestions {
    fn suggest(&self, text: &str, cursor: usize) -> SuggestionResult {
        let Some(token_end) = Self::active_span(text, cursor) else {
            return SuggestionResult::empty();
        };

        let before = &text[..cursor];
        let after = &text[cursor..token_end];
        let candidates = self
            .names
            .iter()
            .filter(|name| split_match(name, before, after))
            .cloned()
            .collect();

        SuggestionResult::new(candidates, 0, Some(token_end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repl::completion::provider::assert_span_invariant;

    fn strategy() -> CommandNameSuggestions {
        CommandNameSuggestions::new(["help", "healthcheck", "echo"], ["exit"])
    }

    #[test]
    fn test_prefix_at_end_of_token() {
        let result = strategy().suggest("he", 2);
        assert_eq!(result.candidates, vec!["healthcheck", "help"]);
        assert_eq!((result.start, result.end), (0, Some(2)));
    }

    #[test]
    fn test_split_match_with_cursor_inside() {
        let result = strategy().suggest("hk", 1);
        assert_eq!(result.candidates, vec!["healthcheck"]);
        assert_eq!(result.end, Some(2));
    }

    #[test]
    fn test_span_stops_at_first_space() {
        let result = strategy().suggest("ec some args", 2);
        assert_eq!(result.candidates, vec!["echo"]);
        assert_eq!((result.start, result.end), (0, Some(2)));
    }

    #[test]
    fn test_tab_ends_command_token() {
        let result = strategy().suggest("ec\tsome", 2);
        assert_eq!(result.candidates, vec!["echo"]);
        assert_eq!((result.start, result.end), (0, Some(2)));
        assert!(strategy().suggest("help\tme", 7).is_empty());
    }

    #[test]
    fn test_inactive_after_first_token() {
        assert!(strategy().suggest("help me", 5).is_empty());
    }

    #[test]
    fn test_extra_names_are_offered() {
        let result = strategy().suggest("ex", 2);
        assert_eq!(result.candidates, vec!["exit"]);
    }

    #[test]
    fn test_empty_text_offers_everything() {
        let result = strategy().suggest("", 0);
        assert_eq!(result.candidates.len(), 4);
    }

    #[test]
    fn test_span_invariant_for_every_cursor() {
        assert_span_invariant(&strategy(), "hea lth");
        assert_span_invariant(&strategy(), "he\tx");
    }
}
