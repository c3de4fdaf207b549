//! Verb-aware completion for multi-verb commands
//!
//! The line handed to this strategy starts with the command name. The second
//! token is the verb: while the cursor is on it, verb names are offered; once
//! the cursor has moved past it, the call goes to that verb's own strategy.

use std::collections::HashMap;
use std::sync::Arc;

use super::provider::{SuggestionProvider, SuggestionResult, split_match, valid_cursor};
use crate::executor::alias::AliasTable;
use crate::parser::tokenize;

/// Completes verb names, then delegates to the selected verb
pub struct VerbSuggestions {
    aliases: AliasTable,
    names: Vec<String>,
    verbs: HashMap<String, Arc<dyn SuggestionProvider>>,
}

impl VerbSuggestions {
    /// Create the strategy from the router's alias table and one strategy per
    /// canonical verb name
    pub fn new(
        aliases: AliasTable,
        verbs: impl IntoIterator<Item = (String, Arc<dyn SuggestionProvider>)>,
    ) -> Self {
        let verbs: HashMap<_, _> = verbs.into_iter().collect();
        let mut names: Vec<String> = verbs.keys().cloned().collect();
        names.sort();
        Self {
            aliases,
            names,
            verbs,
        }
    }

    fn verb_names(&self, before: &str, after: &str) -> Vec<String> {
        self.names
            .iter()
            .filter(|name| split_match(name, before, after))
            .cloned()
            .collect()
    }

    /// Strategy for a typed verb, falling back to the default verb
    fn strategy_for(&self, typed: &str) -> Option<&Arc<dyn SuggestionProvider>> {
        let verb = self
            .aliases
            .resolve(typed)
            .or_else(|| self.aliases.default_verb())?;
        self.verbs.get(verb)
    }

    fn delegate(&self, typed: &str, text: &str, cursor: usize) -> SuggestionResult {
        self.strategy_for(typed)
            .map(|strategy| strategy.suggest(text, cursor))
            .unwrap_or_default()
    }
}

impl SuggestionProvider for VerbSuggestions {
    fn suggest(&self, text: &str, cursor: usize) -> SuggestionResult {
        if !valid_cursor(text, cursor) {
            return SuggestionResult::empty();
        }

        let parsed = tokenize(text);
        let Some(command) = parsed.tokens.first() else {
            return SuggestionResult::empty();
        };
        if cursor <= command.end() {
            return SuggestionResult::empty();
        }

        let Some(verb) = parsed.tokens.get(1) else {
            // Nothing typed after the command name yet
            let candidates = self.verb_names("", "");
            return SuggestionResult::new(candidates, cursor, Some(cursor));
        };

        if cursor < verb.start {
            return SuggestionResult::empty();
        }

        let typed = parsed.args[1].as_str();
        if cursor <= verb.end() {
            let candidates =
                self.verb_names(&text[verb.start..cursor], &text[cursor..verb.end()]);
            if !candidates.is_empty() {
                return SuggestionResult::new(candidates, verb.start, Some(verb.end()));
            }
        }

        self.delegate(typed, text, cursor)
    }
}
