//! Append-only command history log
//!
//! Every submitted line is appended as `<timestamp>;<command>`. At startup the
//! most recent qualifying entries are loaded back (timestamp stripped) so the
//! terminal adapter can offer them for recall. Entries are never rewritten.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tracing::debug;

use crate::config::HistoryConfig;
use crate::error::Result;

/// Maximum number of entries returned by [`HistoryStore::load`] by default.
pub const DEFAULT_LOAD_LIMIT: usize = 1000;

/// Timestamp format used in the log. Never contains `;`.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f%:z";

/// A single history record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    /// When the line was submitted
    pub timestamp: DateTime<Local>,
    /// Raw command text as typed
    pub command: String,
}

impl HistoryEntry {
    /// Create an entry stamped with the current time
    pub fn now(command: impl Into<String>) -> Self {
        Self {
            timestamp: Local::now(),
            command: command.into(),
        }
    }

    /// Render the entry as one log line (without newline)
    pub fn to_line(&self) -> String {
        // Line breaks would split the entry across records.
        let command = self.command.replace(['\r', '\n'], " ");
        format!("{};{}", self.timestamp.format(TIMESTAMP_FORMAT), command)
    }
}

/// Strip the `<timestamp>;` prefix from a log line.
pub fn strip_timestamp(line: &str) -> Option<&str> {
    line.split_once(';').map(|(_, command)| command)
}

/// File-backed history log
#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
    max_entry_length: usize,
    load_limit: usize,
}

impl HistoryStore {
    /// Create a store writing to `path`
    ///
    /// # Arguments
    /// * `path` - Log file location; parent directories are created on append
    /// * `max_entry_length` - Longest command (in bytes) returned by `load`
    pub fn new(path: impl Into<PathBuf>, max_entry_length: usize) -> Self {
        Self {
            path: path.into(),
            max_entry_length,
            load_limit: DEFAULT_LOAD_LIMIT,
        }
    }

    /// Create a store from configuration, `None` when persistence is off
    pub fn from_config(config: &HistoryConfig) -> Option<Self> {
        config.persist.then(|| {
            Self::new(config.file_path.clone(), config.max_entry_length)
                .with_load_limit(config.load_limit)
        })
    }

    /// Override how many entries `load` returns
    pub fn with_load_limit(mut self, limit: usize) -> Self {
        self.load_limit = limit;
        self
    }

    /// Path of the log file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append a command to the log
    pub fn append(&self, command: &str) -> Result<()> {
        self.append_entry(&HistoryEntry::now(command))
    }

    /// Append a prepared entry to the log
    pub fn append_entry(&self, entry: &HistoryEntry) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", entry.to_line())?;
        Ok(())
    }

    /// Load the most recent qualifying commands, oldest first
    ///
    /// A line qualifies when it carries a timestamp prefix and its command
    /// is non-empty and at most `max_entry_length` bytes long.
    pub fn load(&self) -> Result<Vec<String>> {
        if !self.path.exists() {
            debug!("No history file at {}", self.path.display());
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&self.path)?;
        let qualifying: Vec<&str> = content
            .lines()
            .filter_map(strip_timestamp)
            .filter(|cmd| !cmd.trim().is_empty() && cmd.len() <= self.max_entry_length)
            .collect();

        let skip = qualifying.len().saturating_sub(self.load_limit);
        debug!(
            "Loaded {} history entries from {}",
            qualifying.len() - skip,
            self.path.display()
        );
        Ok(qualifying[skip..].iter().map(|s| s.to_string()).collect())
    }
}
