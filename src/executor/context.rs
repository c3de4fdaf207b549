//! Execution context and command resolution
//!
//! The [`ExecutionContext`] is the handle every command receives. It carries
//! the shared cancellation token and the console, and can re-enter command
//! resolution for forwarded lines.

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;
use tabled::builder::Builder;
use tabled::settings::Style;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::{CommandRegistry, GeneralOperation, is_help_keyword, is_help_request};
use crate::error::{ExecutionError, Result, ShellError};
use crate::parser::split_command;
use crate::repl::Console;

/// What happened to a dispatched line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Blank line, nothing done
    Empty,
    /// Help listing printed
    Help,
    /// A command's usage printed instead of running it
    Usage,
    /// Command ran to completion
    Executed,
    /// Command or general operation failed; the failure was logged
    Failed,
    /// Unknown name handed to the general operation
    Delegated,
    /// Unknown name and no general operation
    Rejected,
    /// Pre-execution hook failed; the line was not dispatched
    Skipped,
}

/// Handle given to commands while they run
#[derive(Clone)]
pub struct ExecutionContext {
    cancel: CancellationToken,
    console: Arc<dyn Console>,
    registry: Arc<CommandRegistry>,
    general: Option<Arc<dyn GeneralOperation>>,
}

impl ExecutionContext {
    /// Create a new execution context
    ///
    /// # Arguments
    /// * `registry` - Commands to resolve names against
    /// * `general` - Fallback for unknown names
    /// * `console` - Where user-facing output goes
    /// * `cancel` - Shared cancellation token
    pub fn new(
        registry: Arc<CommandRegistry>,
        general: Option<Arc<dyn GeneralOperation>>,
        console: Arc<dyn Console>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            cancel,
            console,
            registry,
            general,
        }
    }

    /// Shared cancellation token
    ///
    /// Long-running commands should observe it; cancellation is cooperative.
    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Ask the shell to shut down after the current line
    pub fn request_shutdown(&self) {
        info!("Shutdown requested");
        self.cancel.cancel();
    }

    pub fn console(&self) -> &Arc<dyn Console> {
        &self.console
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Resolve and run a line as if it had been typed
    ///
    /// Handler errors and panics are contained here and logged with the
    /// command name; they never propagate to the caller.
    pub fn dispatch<'a>(&'a self, line: &'a str) -> BoxFuture<'a, DispatchOutcome> {
        async move {
            let line = line.trim();
            if line.is_empty() {
                return DispatchOutcome::Empty;
            }

            let (name, args) = split_command(line);
            if is_help_keyword(name) {
                self.print_help();
                return DispatchOutcome::Help;
            }

            match self.registry.get(name) {
                Some(command) if is_help_request(args) => {
                    self.console.write_line(&command.usage());
                    DispatchOutcome::Usage
                }
                Some(command) => {
                    debug!(command = %name, "Executing command");
                    let command = Arc::clone(command);
                    if contained(name, command.execute(args, self)).await {
                        DispatchOutcome::Executed
                    } else {
                        DispatchOutcome::Failed
                    }
                }
                None => match &self.general {
                    Some(general) => {
                        debug!(command = %name, "Delegating to general operation");
                        let general = Arc::clone(general);
                        if contained(name, general.execute(name, args, self)).await {
                            DispatchOutcome::Delegated
                        } else {
                            DispatchOutcome::Failed
                        }
                    }
                    None => {
                        warn!(command = %name, "Unknown command");
                        self.console.write_line(&format!(
                            "Unknown command '{name}'. Type 'help' to list commands."
                        ));
                        DispatchOutcome::Rejected
                    }
                },
            }
        }
        .boxed()
    }

    /// Print every registered command with its description
    pub fn print_help(&self) {
        let mut builder = Builder::default();
        for command in self.registry.iter() {
            builder.push_record([
                command.name().to_string(),
                command.description().to_string(),
            ]);
        }

        let mut table = builder.build();
        table.with(Style::blank());
        self.console.write_line(&table.to_string());
    }
}

/// Await a handler, containing errors and panics
///
/// Returns whether the handler completed successfully.
async fn contained<F>(name: &str, handler: F) -> bool
where
    F: Future<Output = Result<()>>,
{
    match AssertUnwindSafe(handler).catch_unwind().await {
        Ok(Ok(())) => true,
        Ok(Err(ShellError::Cancelled)) => {
            info!(command = %name, "Command cancelled");
            false
        }
        Ok(Err(e)) => {
            error!(command = %name, error = %e, "Command failed");
            false
        }
        Err(panic) => {
            let e = ExecutionError::Panicked(panic_message(panic.as_ref()));
            error!(command = %name, error = %e, "Command panicked");
            false
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(msg) = panic.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
