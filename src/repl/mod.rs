//! REPL (Read-Eval-Print Loop) engine
//!
//! This module provides the interactive shell:
//! - The read-dispatch loop with cooperative cancellation ([`Shell`])
//! - Terminal and console collaborator interfaces
//! - A reedline-backed terminal with completion menu and history hints
//! - The completion strategies behind the Tab key

pub mod completion;

mod completer;
mod editor;
mod engine;
mod hinter;
mod prompt;
mod terminal;

pub use completer::ShellCompleter;
pub use editor::ReedlineTerminal;
pub use engine::{PreExecuteHook, Shell, ShellBuilder, ShutdownHandle};
pub use hinter::HistoryHinter;
pub use prompt::ShellPrompt;
pub use terminal::{BufferConsole, Console, ReadOutcome, ScriptedTerminal, StdoutConsole, Terminal};
