//! cmdshell - interactive command shell
//!
//! Demo binary embedding the shell engine with a small set of built-in
//! commands.
//!
//! # Usage
//!
//! ```bash
//! # Interactive mode
//! cmdshell
//!
//! # Run lines and exit
//! cmdshell -c "task add 'write docs'" -c "task ls"
//! ```

use std::sync::Arc;

use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use cmdshell::cli::CliInterface;
use cmdshell::error::Result;
use cmdshell::executor::builtin::{SuggestingFallback, demo_commands};
use cmdshell::repl::{ReedlineTerminal, ScriptedTerminal, Shell, ShellBuilder, ShutdownHandle};

/// Application entry point
#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Main application logic
///
/// 1. Parse command-line arguments and load configuration
/// 2. Initialize logging
/// 3. Handle subcommands or run the shell
async fn run() -> Result<()> {
    let cli = CliInterface::new()?;
    initialize_logging(&cli);

    if cli.handle_subcommand()? {
        return Ok(());
    }

    cli.print_banner();

    let builder = shell_builder(&cli)?;
    let mut shell = if cli.is_interactive() {
        let history_capacity = cli.config().history.load_limit;
        builder
            .terminal(ReedlineTerminal::new(history_capacity)?)
            .build()?
    } else {
        builder
            .terminal(ScriptedTerminal::new(cli.scripted_lines().iter().cloned()))
            .without_history()
            .build()?
    };

    let interrupt = tokio::spawn(cancel_on_interrupt(shell.shutdown_handle()));
    let result = shell.run().await;
    interrupt.abort();

    if cli.is_interactive() {
        println!("Goodbye!");
    }
    result
}

/// Shell wired with the demo commands and configuration
fn shell_builder(cli: &CliInterface) -> Result<ShellBuilder> {
    let config = cli.config().clone();
    let commands = demo_commands(&config.shell.separator)?;

    Ok(Shell::builder()
        .config(config)
        .commands(commands)
        .general_operation(Arc::new(SuggestingFallback)))
}

/// Cancel the running shell on an OS interrupt
///
/// While a line is being edited the editor consumes Ctrl-C itself; this only
/// fires while a command runs.
async fn cancel_on_interrupt(handle: ShutdownHandle) {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            debug!("Interrupt received");
            handle.shutdown();
        }
        Err(err) => warn!(error = %err, "Failed to listen for Ctrl+C"),
    }
}

/// Initialize logging
///
/// Verbosity flags win over `RUST_LOG`, which wins over the configured level.
fn initialize_logging(cli: &CliInterface) {
    let filter = match cli.verbosity() {
        Some(level) => EnvFilter::new(level.as_str()),
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(cli.config().logging.level.as_str())),
    };

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    if cli.config().logging.timestamps {
        subscriber.init();
    } else {
        subscriber.without_time().init();
    }
}
