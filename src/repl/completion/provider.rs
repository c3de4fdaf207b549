//! Suggestion contract shared by every completion strategy
//!
//! A strategy receives the whole text being edited and the cursor position
//! (byte offset) and answers with candidates plus the span of `text` those
//! candidates would replace.

/// Candidates and the span of text they replace
///
/// `start <= cursor` always holds; `end` is `None` when the caller decides
/// where the replacement stops, otherwise `start <= end <= text.len()`.
/// An empty candidate list means "no suggestion from this strategy".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuggestionResult {
    pub candidates: Vec<String>,
    pub start: usize,
    pub end: Option<usize>,
}

impl SuggestionResult {
    /// Build a result over `start..end`
    pub fn new(candidates: Vec<String>, start: usize, end: Option<usize>) -> Self {
        Self {
            candidates,
            start,
            end,
        }
    }

    /// No suggestion
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether the strategy produced no candidates
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Move the span right by `offset` bytes
    ///
    /// Used once per delegation hop when a strategy was handed a suffix of
    /// the text.
    pub fn shifted(mut self, offset: usize) -> Self {
        self.start += offset;
        self.end = self.end.map(|end| end + offset);
        self
    }

    /// Clip the span so it never extends past `boundary`
    ///
    /// An unbounded end is bounded to `boundary` as well.
    pub fn clipped(mut self, boundary: usize) -> Self {
        self.start = self.start.min(boundary);
        self.end = Some(self.end.map_or(boundary, |end| end.min(boundary)));
        self
    }
}

/// A completion strategy
///
/// Implementations are pure with respect to their arguments; anything they
/// depend on (names, schemas, base directories) is fixed at construction.
pub trait SuggestionProvider: Send + Sync {
    /// Suggest replacements for the text around `cursor`
    fn suggest(&self, text: &str, cursor: usize) -> SuggestionResult;
}

/// Whether `cursor` can be used to slice `text`
pub(crate) fn valid_cursor(text: &str, cursor: usize) -> bool {
    cursor <= text.len() && text.is_char_boundary(cursor)
}

/// Split-match rule used for names
///
/// A candidate matches when it starts with the text before the cursor and
/// ends with the text after it, so a name can be completed with the cursor
/// anywhere inside it.
pub fn split_match(candidate: &str, before: &str, after: &str) -> bool {
    candidate.len() >= before.len() + after.len()
        && candidate.starts_with(before)
        && candidate.ends_with(after)
}

/// Check the span contract for every cursor position in `text`
#[cfg(test)]
pub(crate) fn assert_span_invariant(provider: &dyn SuggestionProvider, text: &str) {
    for cursor in (0..=text.len()).filter(|&c| text.is_char_boundary(c)) {
        let result = provider.suggest(text, cursor);
        if result.is_empty() {
            continue;
        }
        assert!(
            result.start <= cursor,
            "start {} past cursor {cursor} in {text:?}",
            result.start
        );
        if let Some(end) = result.end {
            assert!(
                result.start <= end && end <= text.len(),
                "span {}..{end} out of bounds at cursor {cursor} in {text:?}",
                result.start
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_match_requires_both_ends() {
        assert!(split_match("healthcheck", "h", "k"));
        assert!(!split_match("help", "h", "k"));
        assert!(split_match("help", "he", ""));
        assert!(split_match("help", "", "lp"));
        assert!(!split_match("ab", "ab", "b"));
    }

    #[test]
    fn test_shifted_moves_both_ends() {
        let result = SuggestionResult::new(vec!["x".into()], 2, Some(4)).shifted(10);
        assert_eq!((result.start, result.end), (12, Some(14)));

        let open = SuggestionResult::new(vec!["x".into()], 2, None).shifted(10);
        assert_eq!((open.start, open.end), (12, None));
    }

    #[test]
    fn test_clipped_bounds_the_end() {
        let result = SuggestionResult::new(vec!["x".into()], 2, Some(9)).clipped(6);
        assert_eq!(result.end, Some(6));

        let open = SuggestionResult::new(vec!["x".into()], 2, None).clipped(6);
        assert_eq!(open.end, Some(6));

        let inside = SuggestionResult::new(vec!["x".into()], 2, Some(3)).clipped(6);
        assert_eq!(inside.end, Some(3));
    }

    #[test]
    fn test_valid_cursor() {
        assert!(valid_cursor("abc", 3));
        assert!(!valid_cursor("abc", 4));
        assert!(!valid_cursor("ä", 1));
    }
}
