//! Configuration management for cmdshell
//!
//! Configuration is read from a TOML file and then overridden by
//! command-line arguments. Every field has a default, so a missing file or a
//! partial file is always valid.
//!
//! Configuration precedence (highest to lowest):
//! 1. Command-line arguments
//! 2. Configuration file
//! 3. Default values

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Result};
use crate::parser::DEFAULT_SEPARATOR;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Shell behavior configuration
    #[serde(default)]
    pub shell: ShellConfig,

    /// History configuration
    #[serde(default)]
    pub history: HistoryConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Shell behavior configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShellConfig {
    /// Prompt shown before every line
    #[serde(default = "default_prompt")]
    pub prompt: String,

    /// Token separating a forwarder's options from the forwarded command
    #[serde(default = "default_separator")]
    pub separator: String,

    /// How the root completer treats the matched command's suggestions
    #[serde(default)]
    pub command_suggestions: CommandSuggestionMode,

    /// What shutdown does once cleanup has run
    #[serde(default)]
    pub embedding: EmbeddingMode,
}

/// Root completion priority once the command name is known.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CommandSuggestionMode {
    /// Use the command's suggestions when it has any, else the general operation's
    #[default]
    Use,

    /// Compute the command's suggestions but only return the general
    /// operation's. Matches the legacy engine.
    Discard,
}

/// How the shell ends once it has been shut down
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingMode {
    /// The shell owns the process and exits it
    Standalone,

    /// The shell runs inside a host; `run` returns and the host stops
    #[default]
    Hosted,
}

/// Command history configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Enable history persistence
    #[serde(default = "default_persist_history")]
    pub persist: bool,

    /// Path to history file
    #[serde(default = "default_history_file")]
    pub file_path: PathBuf,

    /// Longest entry (in bytes) loaded back at startup
    #[serde(default = "default_max_entry_length")]
    pub max_entry_length: usize,

    /// Number of most recent entries loaded back at startup
    #[serde(default = "default_load_limit")]
    pub load_limit: usize,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: LogLevel,

    /// Enable timestamps in logs
    #[serde(default = "default_log_timestamps")]
    pub timestamps: bool,
}

/// Log level options
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

// Default value functions
fn default_prompt() -> String {
    "> ".to_string()
}

fn default_separator() -> String {
    DEFAULT_SEPARATOR.to_string()
}

fn default_persist_history() -> bool {
    true
}

fn default_history_file() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".cmdshell_history")
}

fn default_max_entry_length() -> usize {
    1024
}

fn default_load_limit() -> usize {
    crate::history::DEFAULT_LOAD_LIMIT
}

fn default_log_level() -> LogLevel {
    LogLevel::Warn
}

fn default_log_timestamps() -> bool {
    true
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            prompt: default_prompt(),
            separator: default_separator(),
            command_suggestions: CommandSuggestionMode::default(),
            embedding: EmbeddingMode::default(),
        }
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            persist: default_persist_history(),
            file_path: default_history_file(),
            max_entry_length: default_max_entry_length(),
            load_limit: default_load_limit(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            timestamps: default_log_timestamps(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a file
    ///
    /// Falls back to [`Config::default_path`] when `path` is `None`; a
    /// missing file yields the default configuration.
    ///
    /// # Arguments
    /// * `path` - Optional path to the configuration file (TOML format)
    ///
    /// # Returns
    /// * `Result<Config>` - Loaded configuration or error
    pub fn load_from_file(path: Option<&Path>) -> Result<Self> {
        let path = path.map(Path::to_path_buf).unwrap_or_else(Self::default_path);
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Render the configuration as TOML
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Get the default configuration file path
    ///
    /// # Returns
    /// * `PathBuf` - Path to default configuration file
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".cmdshell")
            .join("config.toml")
    }

    /// Validate the configuration
    ///
    /// # Returns
    /// * `Result<()>` - Ok if valid, error otherwise
    pub fn validate(&self) -> Result<()> {
        let separator = &self.shell.separator;
        if separator.is_empty() || separator.chars().any(char::is_whitespace) {
            return Err(ConfigError::InvalidValue {
                field: "shell.separator".to_string(),
                value: separator.clone(),
            }
            .into());
        }

        if self.history.max_entry_length == 0 {
            return Err(ConfigError::InvalidValue {
                field: "history.max_entry_length".to_string(),
                value: "0".to_string(),
            }
            .into());
        }

        if self.history.load_limit == 0 {
            return Err(ConfigError::InvalidValue {
                field: "history.load_limit".to_string(),
                value: "0".to_string(),
            }
            .into());
        }

        Ok(())
    }
}

impl LogLevel {
    /// Directive string understood by `tracing_subscriber::EnvFilter`
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}
