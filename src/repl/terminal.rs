//! Terminal and console collaborators
//!
//! The shell never talks to a terminal directly. It reads lines through a
//! [`Terminal`] and writes user-facing output through a [`Console`]; both are
//! supplied by the embedder.

use std::collections::VecDeque;
use std::io::Write;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::completion::SuggestionProvider;
use crate::error::Result;

/// Result of one line read
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    /// A submitted line
    Line(String),
    /// The user interrupted the current line (Ctrl-C)
    Interrupted,
    /// End of input (Ctrl-D or the input source is exhausted)
    Eof,
}

/// Line-editing adapter the shell reads from
#[async_trait]
pub trait Terminal: Send + Sync {
    /// Wait for the next line
    ///
    /// The shell drops the returned future when cancellation fires, so
    /// implementations must tolerate a read being abandoned midway.
    async fn read_line(&mut self, prompt: &str) -> Result<ReadOutcome>;

    /// Install the completion handler
    fn set_suggestion_handler(&mut self, handler: Arc<dyn SuggestionProvider>);

    /// Seed the recallable history, oldest first
    fn load_history(&mut self, entries: Vec<String>);
}

/// Sink for user-facing output
pub trait Console: Send + Sync {
    fn write_line(&self, text: &str);
}

/// Console writing to standard output
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutConsole;

impl Console for StdoutConsole {
    fn write_line(&self, text: &str) {
        let mut stdout = std::io::stdout().lock();
        let _ = writeln!(stdout, "{text}");
    }
}

/// Console collecting output in memory
#[derive(Debug, Default)]
pub struct BufferConsole {
    lines: Mutex<Vec<String>>,
}

impl BufferConsole {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every line written so far
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .map(|lines| lines.clone())
            .unwrap_or_default()
    }

    /// Everything written so far, newline separated
    pub fn contents(&self) -> String {
        self.lines().join("\n")
    }
}

impl Console for BufferConsole {
    fn write_line(&self, text: &str) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push(text.to_string());
        }
    }
}

/// Terminal replaying a fixed list of lines, then reporting end of input
///
/// Used for non-interactive runs and tests.
#[derive(Default)]
pub struct ScriptedTerminal {
    lines: VecDeque<String>,
    hold_at_end: bool,
    handler: Option<Arc<dyn SuggestionProvider>>,
    history: Vec<String>,
}

impl ScriptedTerminal {
    pub fn new<I>(lines: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Block forever instead of reporting end of input once the lines run out
    ///
    /// Lets tests observe a read that is pending when cancellation fires.
    pub fn hold_at_end(mut self) -> Self {
        self.hold_at_end = true;
        self
    }

    pub fn suggestion_handler(&self) -> Option<&Arc<dyn SuggestionProvider>> {
        self.handler.as_ref()
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }
}

#[async_trait]
impl Terminal for ScriptedTerminal {
    async fn read_line(&mut self, _prompt: &str) -> Result<ReadOutcome> {
        match self.lines.pop_front() {
            Some(line) => Ok(ReadOutcome::Line(line)),
            None if self.hold_at_end => std::future::pending().await,
            None => Ok(ReadOutcome::Eof),
        }
    }

    fn set_suggestion_handler(&mut self, handler: Arc<dyn SuggestionProvider>) {
        self.handler = Some(handler);
    }

    fn load_history(&mut self, entries: Vec<String>) {
        self.history = entries;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_terminal_replays_then_eof() {
        let mut terminal = ScriptedTerminal::new(["one", "two"]);
        assert_eq!(
            terminal.read_line("> ").await.unwrap(),
            ReadOutcome::Line("one".into())
        );
        assert_eq!(
            terminal.read_line("> ").await.unwrap(),
            ReadOutcome::Line("two".into())
        );
        assert_eq!(terminal.read_line("> ").await.unwrap(), ReadOutcome::Eof);
    }

    #[tokio::test]
    async fn test_hold_at_end_stays_pending() {
        let mut terminal = ScriptedTerminal::new(Vec::<String>::new()).hold_at_end();
        let read = terminal.read_line("> ");
        let timed_out = tokio::time::timeout(std::time::Duration::from_millis(20), read).await;
        assert!(timed_out.is_err());
    }

    #[test]
    fn test_buffer_console_collects_lines() {
        let console = BufferConsole::new();
        console.write_line("a");
        console.write_line("b");
        assert_eq!(console.lines(), vec!["a", "b"]);
        assert_eq!(console.contents(), "a\nb");
    }
}
