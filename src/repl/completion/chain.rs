//! Priority chain of completion strategies

use std::sync::Arc;

use super::provider::{SuggestionProvider, SuggestionResult};

/// Tries strategies in order; the first non-empty answer wins
///
/// Results are never merged across strategies.
#[derive(Clone, Default)]
pub struct SuggestionChain {
    strategies: Vec<Arc<dyn SuggestionProvider>>,
}

impl SuggestionChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a strategy with lower priority than those already added
    pub fn with(mut self, strategy: Arc<dyn SuggestionProvider>) -> Self {
        self.strategies.push(strategy);
        self
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }
}

impl SuggestionProvider for SuggestionChain {
    fn suggest(&self, text: &str, cursor: usize) -> SuggestionResult {
        self.strategies
            .iter()
            .map(|strategy| strategy.suggest(text, cursor))
            .find(|result| !result.is_empty())
            .unwrap_or_default()
    }
}
