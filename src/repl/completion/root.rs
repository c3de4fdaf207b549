//! Top-level suggestion dispatcher
//!
//! Decides which strategy answers for a whole input line: command names
//! while the first token is being typed, otherwise the matched command's
//! strategy and the general operation's.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::trace;

use super::command::CommandNameSuggestions;
use super::provider::{SuggestionProvider, SuggestionResult, valid_cursor};
use crate::config::CommandSuggestionMode;
use crate::parser::tokenize;

/// Root of the strategy tree handed to the terminal
pub struct RootSuggestions {
    names: CommandNameSuggestions,
    commands: HashMap<String, Arc<dyn SuggestionProvider>>,
    general: Option<Arc<dyn SuggestionProvider>>,
    mode: CommandSuggestionMode,
}

impl RootSuggestions {
    pub fn new(names: CommandNameSuggestions, mode: CommandSuggestionMode) -> Self {
        Self {
            names,
            commands: HashMap::new(),
            general: None,
            mode,
        }
    }

    /// Register the strategy of a named command
    pub fn command(mut self, name: impl Into<String>, strategy: Arc<dyn SuggestionProvider>) -> Self {
        self.commands.insert(name.into(), strategy);
        self
    }

    /// Register the general operation's strategy
    pub fn general(mut self, strategy: Arc<dyn SuggestionProvider>) -> Self {
        self.general = Some(strategy);
        self
    }

    pub fn mode(&self) -> CommandSuggestionMode {
        self.mode
    }
}

impl SuggestionProvider for RootSuggestions {
    fn suggest(&self, text: &str, cursor: usize) -> SuggestionResult {
        if !valid_cursor(text, cursor) {
            return SuggestionResult::empty();
        }
        if CommandNameSuggestions::active_span(text, cursor).is_some() {
            return self.names.suggest(text, cursor);
        }

        let parsed = tokenize(text);
        let command = parsed
            .args
            .first()
            .and_then(|name| self.commands.get(name.as_str()));

        if let Some(strategy) = command {
            let result = strategy.suggest(text, cursor);
            match self.mode {
                CommandSuggestionMode::Use if !result.is_empty() => return result,
                CommandSuggestionMode::Use => {}
                CommandSuggestionMode::Discard => {
                    trace!(
                        candidates = result.candidates.len(),
                        "Discarding command suggestions"
                    );
                }
            }
        }

        self.general
            .as_ref()
            .map(|general| general.suggest(text, cursor))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repl::completion::provider::assert_span_invariant;

    struct Fixed(&'static str);

    impl SuggestionProvider for Fixed {
        fn suggest(&self, _text: &str, cursor: usize) -> SuggestionResult {
            SuggestionResult::new(vec![self.0.to_string()], cursor, None)
        }
    }

    struct Nothing;

    impl SuggestionProvider for Nothing {
        fn suggest(&self, _text: &str, _cursor: usize) -> SuggestionResult {
            SuggestionResult::empty()
        }
    }

    fn root(mode: CommandSuggestionMode) -> RootSuggestions {
        RootSuggestions::new(
            CommandNameSuggestions::new(["task", "echo"], Vec::<String>::new()),
            mode,
        )
        .command("task", Arc::new(Fixed("from-task")))
        .command("echo", Arc::new(Nothing))
        .general(Arc::new(Fixed("from-general")))
    }

    #[test]
    fn test_command_names_first() {
        let result = root(CommandSuggestionMode::Use).suggest("ta", 2);
        assert_eq!(result.candidates, vec!["task"]);
    }

    #[test]
    fn test_use_mode_prefers_command() {
        let result = root(CommandSuggestionMode::Use).suggest("task ", 5);
        assert_eq!(result.candidates, vec!["from-task"]);
    }

    #[test]
    fn test_use_mode_falls_back_when_command_is_silent() {
        let result = root(CommandSuggestionMode::Use).suggest("echo ", 5);
        assert_eq!(result.candidates, vec!["from-general"]);
    }

    #[test]
    fn test_discard_mode_ignores_command() {
        let result = root(CommandSuggestionMode::Discard).suggest("task ", 5);
        assert_eq!(result.candidates, vec!["from-general"]);
    }

    #[test]
    fn test_unknown_command_goes_to_general() {
        let result = root(CommandSuggestionMode::Use).suggest("other x", 7);
        assert_eq!(result.candidates, vec!["from-general"]);
    }

    #[test]
    fn test_without_general_is_empty() {
        let root = RootSuggestions::new(
            CommandNameSuggestions::new(["task"], Vec::<String>::new()),
            CommandSuggestionMode::Discard,
        )
        .command("task", Arc::new(Fixed("from-task")));
        assert!(root.suggest("task ", 5).is_empty());
    }

    #[test]
    fn test_tab_after_command_name_routes_to_command() {
        let result = root(CommandSuggestionMode::Use).suggest("task\tad", 7);
        assert_eq!(result.candidates, vec!["from-task"]);
    }

    #[test]
    fn test_span_invariant_for_every_cursor() {
        for mode in [CommandSuggestionMode::Use, CommandSuggestionMode::Discard] {
            let root = root(mode);
            for text in ["task add  x", "ec\tho", "other \"y\"", " task"] {
                assert_span_invariant(&root, text);
            }
        }
    }
}
