//! Reedline terminal adapter
//!
//! `Reedline` blocks the calling thread while a line is edited, so the editor
//! lives on a dedicated thread and the async side talks to it over a channel.
//! A read whose future is dropped (shutdown while waiting) is simply
//! abandoned; the editor thread notices on its next request.

use std::sync::Arc;
use std::sync::mpsc;
use std::thread;

use async_trait::async_trait;
use reedline::{
    ColumnarMenu, Emacs, FileBackedHistory, History, HistoryItem, KeyCode, KeyModifiers,
    MenuBuilder, Reedline, ReedlineEvent, ReedlineMenu, Signal, default_emacs_keybindings,
};
use tokio::sync::oneshot;
use tracing::{debug, warn};

use super::completer::ShellCompleter;
use super::completion::SuggestionProvider;
use super::hinter::HistoryHinter;
use super::prompt::ShellPrompt;
use super::terminal::{ReadOutcome, Terminal};
use crate::error::{Result, ShellError};

const COMPLETION_MENU: &str = "completion_menu";

enum Request {
    ReadLine {
        prompt: String,
        reply: oneshot::Sender<Result<ReadOutcome>>,
    },
    SetCompleter(Arc<dyn SuggestionProvider>),
    LoadHistory(Vec<String>),
}

/// Interactive terminal backed by reedline
pub struct ReedlineTerminal {
    requests: mpsc::Sender<Request>,
}

impl ReedlineTerminal {
    /// Start the editor thread
    ///
    /// # Arguments
    /// * `history_capacity` - Entries kept for recall
    ///
    /// # Returns
    /// * `Result<Self>` - Terminal or error if the thread cannot be spawned
    pub fn new(history_capacity: usize) -> Result<Self> {
        let (requests, inbox) = mpsc::channel();
        thread::Builder::new()
            .name("line-editor".to_string())
            .spawn(move || editor_loop(inbox, history_capacity))?;

        Ok(Self { requests })
    }

    fn send(&self, request: Request) -> Result<()> {
        self.requests
            .send(request)
            .map_err(|_| ShellError::Terminal("line editor thread has stopped".to_string()))
    }
}

#[async_trait]
impl Terminal for ReedlineTerminal {
    async fn read_line(&mut self, prompt: &str) -> Result<ReadOutcome> {
        let (reply, outcome) = oneshot::channel();
        self.send(Request::ReadLine {
            prompt: prompt.to_string(),
            reply,
        })?;

        outcome
            .await
            .map_err(|_| ShellError::Terminal("line editor dropped the request".to_string()))?
    }

    fn set_suggestion_handler(&mut self, handler: Arc<dyn SuggestionProvider>) {
        if let Err(e) = self.send(Request::SetCompleter(handler)) {
            warn!("Cannot install completer: {}", e);
        }
    }

    fn load_history(&mut self, entries: Vec<String>) {
        if let Err(e) = self.send(Request::LoadHistory(entries)) {
            warn!("Cannot load history: {}", e);
        }
    }
}

fn build_editor() -> Reedline {
    let mut keybindings = default_emacs_keybindings();
    keybindings.add_binding(
        KeyModifiers::NONE,
        KeyCode::Tab,
        ReedlineEvent::UntilFound(vec![
            ReedlineEvent::Menu(COMPLETION_MENU.to_string()),
            ReedlineEvent::MenuNext,
        ]),
    );

    let menu = ColumnarMenu::default().with_name(COMPLETION_MENU);
    Reedline::create()
        .with_hinter(Box::new(HistoryHinter::new()))
        .with_menu(ReedlineMenu::EngineCompleter(Box::new(menu)))
        .with_edit_mode(Box::new(Emacs::new(keybindings)))
}

fn build_history(capacity: usize, entries: Vec<String>) -> Option<FileBackedHistory> {
    let mut history = FileBackedHistory::new(capacity).ok()?;
    for entry in entries {
        if let Err(e) = history.save(HistoryItem::from_command_line(entry)) {
            debug!("Skipping history entry: {}", e);
        }
    }
    Some(history)
}

fn editor_loop(inbox: mpsc::Receiver<Request>, history_capacity: usize) {
    let mut editor = build_editor();

    while let Ok(request) = inbox.recv() {
        match request {
            Request::ReadLine { prompt, reply } => {
                let outcome = match editor.read_line(&ShellPrompt::new(prompt)) {
                    Ok(Signal::Success(line)) => Ok(ReadOutcome::Line(line)),
                    Ok(Signal::CtrlD) => Ok(ReadOutcome::Eof),
                    Ok(_) => Ok(ReadOutcome::Interrupted),
                    Err(e) => Err(ShellError::Terminal(e.to_string())),
                };
                // The reader may have given up while the line was edited
                let _ = reply.send(outcome);
            }
            Request::SetCompleter(handler) => {
                editor = editor.with_completer(Box::new(ShellCompleter::new(handler)));
            }
            Request::LoadHistory(entries) => match build_history(history_capacity, entries) {
                Some(history) => editor = editor.with_history(Box::new(history)),
                None => warn!("Cannot create history with capacity {}", history_capacity),
            },
        }
    }

    debug!("Line editor thread exiting");
}
