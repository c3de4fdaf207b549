//! Shell engine: the read-dispatch loop
//!
//! The loop waits for either a line or cancellation. A submitted line is
//! recorded in history, passed through the pre-execute hook and dispatched.
//! Handler failures never end the loop; cancellation does.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use futures::FutureExt;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, Span, debug, error, info, info_span, warn};

use super::completion::{CommandNameSuggestions, RootSuggestions, SuggestionProvider};
use super::terminal::{Console, ReadOutcome, StdoutConsole, Terminal};
use crate::config::{Config, EmbeddingMode};
use crate::error::{ConfigError, Result};
use crate::executor::{
    Command, CommandRegistry, DispatchOutcome, ExecutionContext, GeneralOperation, HELP_KEYWORDS,
};
use crate::history::HistoryStore;

/// Hook run on every non-empty line before it is dispatched
///
/// An error skips that line only.
pub type PreExecuteHook = Arc<dyn Fn(&str) -> Result<()> + Send + Sync>;

/// Requests shutdown of a running shell from anywhere
#[derive(Debug, Clone)]
pub struct ShutdownHandle {
    cancel: CancellationToken,
}

impl ShutdownHandle {
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    pub fn is_shutdown(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

/// Builder for [`Shell`]
pub struct ShellBuilder {
    config: Config,
    terminal: Option<Box<dyn Terminal>>,
    console: Arc<dyn Console>,
    commands: Vec<Arc<dyn Command>>,
    general: Option<Arc<dyn GeneralOperation>>,
    pre_execute: Option<PreExecuteHook>,
    cancel: CancellationToken,
    history: Option<Option<HistoryStore>>,
    extra_names: Vec<String>,
}

impl Default for ShellBuilder {
    fn default() -> Self {
        Self {
            config: Config::default(),
            terminal: None,
            console: Arc::new(StdoutConsole),
            commands: Vec::new(),
            general: None,
            pre_execute: None,
            cancel: CancellationToken::new(),
            history: None,
            extra_names: Vec::new(),
        }
    }
}

impl ShellBuilder {
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Terminal to read lines from; required
    pub fn terminal(mut self, terminal: impl Terminal + 'static) -> Self {
        self.terminal = Some(Box::new(terminal));
        self
    }

    pub fn console(mut self, console: Arc<dyn Console>) -> Self {
        self.console = console;
        self
    }

    pub fn command(mut self, command: Arc<dyn Command>) -> Self {
        self.commands.push(command);
        self
    }

    pub fn commands(mut self, commands: impl IntoIterator<Item = Arc<dyn Command>>) -> Self {
        self.commands.extend(commands);
        self
    }

    /// Fallback for unknown command names
    pub fn general_operation(mut self, general: Arc<dyn GeneralOperation>) -> Self {
        self.general = Some(general);
        self
    }

    pub fn pre_execute<F>(mut self, hook: F) -> Self
    where
        F: Fn(&str) -> Result<()> + Send + Sync + 'static,
    {
        self.pre_execute = Some(Arc::new(hook));
        self
    }

    /// Share a cancellation token with the host
    ///
    /// Cancelling it stops the loop and runs shutdown.
    pub fn cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Use this history store instead of the configured one
    pub fn history(mut self, store: HistoryStore) -> Self {
        self.history = Some(Some(store));
        self
    }

    /// Do not record history
    pub fn without_history(mut self) -> Self {
        self.history = Some(None);
        self
    }

    /// Names offered by command-name completion besides registered commands
    pub fn extra_names<I>(mut self, names: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.extra_names.extend(names.into_iter().map(Into::into));
        self
    }

    /// Validate everything and wire the shell together
    ///
    /// Fails on invalid configuration, a missing terminal or duplicate
    /// command names.
    pub fn build(self) -> Result<Shell> {
        self.config.validate()?;
        let mut terminal = self.terminal.ok_or(ConfigError::MissingTerminal)?;
        let registry = CommandRegistry::from_commands(self.commands)?;

        let history = self
            .history
            .unwrap_or_else(|| HistoryStore::from_config(&self.config.history));

        let suggestions = root_suggestions(&self.config, &registry, &self.general, self.extra_names);
        for command in registry.iter() {
            command.attach_root_suggestions(Arc::downgrade(&suggestions));
        }
        terminal.set_suggestion_handler(Arc::clone(&suggestions));

        if let Some(store) = &history {
            match store.load() {
                Ok(entries) => {
                    debug!(entries = entries.len(), "Loaded history");
                    terminal.load_history(entries);
                }
                Err(e) => warn!(error = %e, "Cannot load history"),
            }
        }

        let span = info_span!("shell", prompt = %self.config.shell.prompt);
        let context = ExecutionContext::new(
            Arc::new(registry),
            self.general,
            self.console,
            self.cancel,
        );

        Ok(Shell {
            config: self.config,
            terminal,
            context,
            history,
            pre_execute: self.pre_execute,
            suggestions,
            shut_down: AtomicBool::new(false),
            span,
        })
    }
}

fn root_suggestions(
    config: &Config,
    registry: &CommandRegistry,
    general: &Option<Arc<dyn GeneralOperation>>,
    extra_names: Vec<String>,
) -> Arc<dyn SuggestionProvider> {
    let names = CommandNameSuggestions::new(
        registry.names(),
        extra_names.into_iter().chain([HELP_KEYWORDS[0].to_string()]),
    );

    let mut root = RootSuggestions::new(names, config.shell.command_suggestions);
    for command in registry.iter() {
        if let Some(strategy) = command.suggestions() {
            root = root.command(command.name(), strategy);
        }
    }
    if let Some(strategy) = general.as_ref().and_then(|g| g.suggestions()) {
        root = root.general(strategy);
    }
    Arc::new(root)
}

/// An interactive shell
pub struct Shell {
    config: Config,
    terminal: Box<dyn Terminal>,
    context: ExecutionContext,
    history: Option<HistoryStore>,
    pre_execute: Option<PreExecuteHook>,
    suggestions: Arc<dyn SuggestionProvider>,
    shut_down: AtomicBool,
    span: Span,
}

impl Shell {
    pub fn builder() -> ShellBuilder {
        ShellBuilder::default()
    }

    /// Root completion strategy, as installed in the terminal
    pub fn suggestions(&self) -> Arc<dyn SuggestionProvider> {
        Arc::clone(&self.suggestions)
    }

    pub fn context(&self) -> &ExecutionContext {
        &self.context
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            cancel: self.context.cancellation().clone(),
        }
    }

    /// Run until cancelled or the terminal reports end of input
    ///
    /// Shutdown runs before this returns. In standalone mode it exits the
    /// process instead of returning.
    pub async fn run(&mut self) -> Result<()> {
        let span = self.span.clone();
        async {
            info!("Shell started");
            let result = self.read_loop().await;
            self.shutdown().await;
            result
        }
        .instrument(span)
        .await
    }

    async fn read_loop(&mut self) -> Result<()> {
        let cancel = self.context.cancellation().clone();

        loop {
            let read = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    debug!("Cancelled while waiting for input");
                    return Ok(());
                }
                read = self.terminal.read_line(&self.config.shell.prompt) => read,
            };

            match read? {
                ReadOutcome::Line(line) => {
                    let outcome = self.process_line(&line).await;
                    debug!(?outcome, "Line processed");
                }
                ReadOutcome::Interrupted => continue,
                ReadOutcome::Eof => {
                    info!("End of input");
                    return Ok(());
                }
            }
        }
    }

    /// Record, pre-process and dispatch one line
    pub async fn process_line(&self, line: &str) -> DispatchOutcome {
        if line.trim().is_empty() {
            return DispatchOutcome::Empty;
        }

        if let Some(store) = &self.history {
            if let Err(e) = store.append(line) {
                warn!(error = %e, "Cannot record history");
            }
        }

        if let Some(hook) = &self.pre_execute {
            if let Err(e) = hook(line) {
                error!(error = %e, "Pre-execute hook failed, line skipped");
                return DispatchOutcome::Skipped;
            }
        }

        self.context.dispatch(line).await
    }

    /// Cancel the shared token and run every command's cleanup
    ///
    /// Only the first call does anything. Commands without cleanup are
    /// skipped quietly; other cleanup failures are logged.
    pub async fn shutdown(&self) {
        if self.shut_down.swap(true, Ordering::SeqCst) {
            return;
        }

        info!("Shutting down");
        self.context.cancellation().cancel();

        for command in self.context.registry().iter() {
            let name = command.name();
            match AssertUnwindSafe(command.cleanup()).catch_unwind().await {
                Ok(Ok(())) => debug!(command = %name, "Cleanup done"),
                Ok(Err(e)) if e.is_not_implemented() => {}
                Ok(Err(e)) => warn!(command = %name, error = %e, "Cleanup failed"),
                Err(_) => warn!(command = %name, "Cleanup panicked"),
            }
        }

        if self.config.shell.embedding == EmbeddingMode::Standalone {
            info!("Exiting process");
            std::process::exit(0);
        }
    }
}
