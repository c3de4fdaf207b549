//! Command-line interface for the cmdshell binary
//!
//! This module handles:
//! - Command-line argument parsing using clap
//! - Configuration loading and CLI overrides
//! - The `version`, `completion` and `config` subcommands

pub mod completion;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{Config, LogLevel};
use crate::error::Result;

/// cmdshell - an embeddable interactive command shell
#[derive(Parser, Debug)]
#[command(
    name = "cmdshell",
    version,
    about = "Interactive command shell with verb routing and completion",
    long_about = "An interactive command shell demonstrating multi-verb commands,
command forwarding, context-aware Tab completion and persistent history."
)]
pub struct CliArgs {
    /// Configuration file path
    #[arg(long = "config", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Run this line instead of reading from the terminal (repeatable)
    #[arg(short = 'c', long = "command", value_name = "LINE")]
    pub commands: Vec<String>,

    /// Prompt text
    #[arg(long, value_name = "TEXT")]
    pub prompt: Option<String>,

    /// Do not read or write the history file
    #[arg(long)]
    pub no_history: bool,

    /// Quiet mode (errors only)
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Very verbose mode (trace logging)
    #[arg(long = "vv")]
    pub very_verbose: bool,

    /// Subcommands
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Subcommands for cmdshell
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show version information
    Version,

    /// Generate shell completion script
    Completion {
        /// Shell type
        #[arg(value_name = "SHELL", value_enum)]
        shell: clap_complete::Shell,
    },

    /// Show configuration
    Config {
        /// Show effective configuration
        #[arg(long)]
        show: bool,

        /// Validate configuration file
        #[arg(long)]
        validate: bool,
    },
}

/// CLI interface handler
pub struct CliInterface {
    args: CliArgs,
    config: Config,
}

impl CliInterface {
    /// Parse the process arguments and load configuration
    pub fn new() -> Result<Self> {
        Self::from_args(CliArgs::parse())
    }

    /// Load configuration for already parsed arguments
    pub fn from_args(args: CliArgs) -> Result<Self> {
        let config = Self::load_config(&args)?;
        Ok(Self { args, config })
    }

    fn load_config(args: &CliArgs) -> Result<Config> {
        let mut config = Config::load_from_file(args.config_file.as_deref())?;

        // Logging is not up yet, so this goes straight to stderr
        if let Err(e) = config.validate() {
            eprintln!("Warning: Configuration validation failed: {}", e);
            eprintln!("Using default configuration instead.");
            config = Config::default();
        }

        Self::apply_args_to_config(&mut config, args);
        Ok(config)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn args(&self) -> &CliArgs {
        &self.args
    }

    /// Lines given with `-c`; empty for an interactive session
    pub fn scripted_lines(&self) -> &[String] {
        &self.args.commands
    }

    pub fn is_interactive(&self) -> bool {
        self.args.commands.is_empty()
    }

    /// Log level requested by verbosity flags, if any
    ///
    /// Takes precedence over `RUST_LOG`, which takes precedence over the
    /// configured level.
    pub fn verbosity(&self) -> Option<LogLevel> {
        if self.args.very_verbose {
            Some(LogLevel::Trace)
        } else if self.args.verbose {
            Some(LogLevel::Debug)
        } else if self.args.quiet {
            Some(LogLevel::Error)
        } else {
            None
        }
    }

    fn apply_args_to_config(config: &mut Config, args: &CliArgs) {
        if let Some(prompt) = &args.prompt {
            config.shell.prompt = prompt.clone();
        }

        if args.no_history {
            config.history.persist = false;
        }
    }

    /// Handle subcommands
    ///
    /// # Returns
    /// * `Result<bool>` - True if a subcommand was handled, false to continue
    pub fn handle_subcommand(&self) -> Result<bool> {
        match &self.args.command {
            Some(Commands::Version) => {
                self.show_version();
                Ok(true)
            }
            Some(Commands::Completion { shell }) => {
                completion::generate_completion(*shell, &mut std::io::stdout());
                Ok(true)
            }
            Some(Commands::Config { show, validate }) => {
                self.handle_config_command(*show, *validate)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn show_version(&self) {
        println!("cmdshell version {}", env!("CARGO_PKG_VERSION"));
        println!("Rust version: {}", env!("CARGO_PKG_RUST_VERSION"));
    }

    fn handle_config_command(&self, show: bool, validate: bool) -> Result<()> {
        if validate {
            self.validate_config_file();
        }

        if show {
            self.show_config()?;
        }

        Ok(())
    }

    fn validate_config_file(&self) {
        let path = self.config_path();
        println!("Validating configuration file: {}", path.display());

        if !path.exists() {
            println!("Configuration file does not exist, defaults apply");
            return;
        }

        match Config::load_from_file(Some(&path)) {
            Ok(config) => match config.validate() {
                Ok(_) => println!("Configuration is valid"),
                Err(e) => println!("Configuration validation failed: {}", e),
            },
            Err(e) => println!("Failed to load configuration: {}", e),
        }
    }

    fn show_config(&self) -> Result<()> {
        println!("# Configuration file: {}", self.config_path().display());
        println!();
        println!("{}", self.config.to_toml()?);
        Ok(())
    }

    /// Configuration file path (from args or default)
    pub fn config_path(&self) -> PathBuf {
        self.args
            .config_file
            .clone()
            .unwrap_or_else(Config::default_path)
    }

    /// Print the startup banner for interactive sessions
    pub fn print_banner(&self) {
        if !self.args.quiet && self.is_interactive() {
            println!("cmdshell {}", env!("CARGO_PKG_VERSION"));
            println!("Type 'help' to list commands, Tab to complete.");
        }
    }
}
