//! cmdshell library
//!
//! An embeddable interactive command shell: a read-dispatch loop with
//! cooperative cancellation, multi-verb command routing, command forwarding
//! and context-aware Tab completion.
//!
//! # Modules
//!
//! - `cli`: Command-line interface of the demo binary
//! - `config`: Configuration management
//! - `error`: Error types and handling
//! - `executor`: Command contract, registry, verb and forwarding routers
//! - `history`: Persistent command history
//! - `parser`: Tokenizer and separator search
//! - `repl`: Shell loop, terminal adapters and completion strategies
//!
//! # Example
//!
//! ```no_run
//! use cmdshell::executor::builtin::demo_commands;
//! use cmdshell::repl::{ScriptedTerminal, Shell};
//!
//! #[tokio::main]
//! async fn main() -> cmdshell::Result<()> {
//!     let mut shell = Shell::builder()
//!         .terminal(ScriptedTerminal::new(["task add groceries", "task ls"]))
//!         .commands(demo_commands("--")?)
//!         .without_history()
//!         .build()?;
//!
//!     shell.run().await
//! }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod executor;
pub mod history;
pub mod parser;
pub mod repl;

#[cfg(test)]
mod test_utils;

// Re-export commonly used types
pub use config::Config;
pub use error::{Result, ShellError};
pub use executor::{Command, CommandRegistry, ExecutionContext, GeneralOperation, VerbRouter};
pub use repl::{Shell, ShellBuilder};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get library version string
pub fn version() -> &'static str {
    VERSION
}
