//! Option-name completion for one option schema
//!
//! Offers the flags a verb declares that are not on the line yet, right after
//! a token boundary.

use std::collections::HashSet;

use super::provider::{SuggestionProvider, SuggestionResult, valid_cursor};
use crate::executor::schema::OptionSpec;
use crate::parser::tokenize;

/// A flag as offered to the user plus every spelling that marks it as used
#[derive(Debug, Clone)]
struct FlagName {
    display: String,
    spellings: Vec<String>,
}

/// Completes flag names of a single option schema
#[derive(Debug, Clone, Default)]
pub struct OptionNameSuggestions {
    flags: Vec<FlagName>,
}

impl OptionNameSuggestions {
    /// Build the flag list once from the schema's declared options
    pub fn new(options: &[OptionSpec]) -> Self {
        let flags = options
            .iter()
            .filter_map(|opt| {
                let spellings = opt.flag_spellings();
                let display = spellings.first()?.clone();
                Some(FlagName { display, spellings })
            })
            .collect();
        Self { flags }
    }
}

impl SuggestionProvider for OptionNameSuggestions {
    fn suggest(&self, text: &str, cursor: usize) -> SuggestionResult {
        if cursor == 0 || !valid_cursor(text, cursor) || text.as_bytes()[cursor - 1] != b' ' {
            return SuggestionResult::empty();
        }

        let end = text[cursor..]
            .find(' ')
            .map_or(text.len(), |idx| cursor + idx);
        if text[cursor..end].contains('"') {
            return SuggestionResult::empty();
        }

        let prior = tokenize(&text[..cursor]);
        let used: HashSet<&str> = prior
            .tokens
            .iter()
            .map(|token| token.text.split('=').next().unwrap_or_default())
            .collect();

        let mut candidates: Vec<String> = self
            .flags
            .iter()
            .filter(|flag| !flag.spellings.iter().any(|s| used.contains(s.as_str())))
            .map(|flag| flag.display.clone())
            .collect();
        candidates.sort();

        SuggestionResult::new(candidates, cursor, Some(end))
    }
}
