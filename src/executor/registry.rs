//! Command registry
//!
//! Built once before the loop starts from the commands the embedder
//! supplies; read-only afterwards.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use super::Command;
use crate::error::{ConfigError, Result};

/// Name to command map that remembers registration order
#[derive(Clone, Default)]
pub struct CommandRegistry {
    commands: Vec<Arc<dyn Command>>,
    index: HashMap<String, usize>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command under its own name
    ///
    /// # Arguments
    /// * `command` - Command to register
    ///
    /// # Returns
    /// * `Result<()>` - Error if the name is already taken
    pub fn register(&mut self, command: Arc<dyn Command>) -> Result<()> {
        let name = command.name().to_string();
        if self.index.contains_key(&name) {
            return Err(ConfigError::DuplicateCommand(name).into());
        }

        debug!(command = %name, "Registering command");
        self.index.insert(name, self.commands.len());
        self.commands.push(command);
        Ok(())
    }

    /// Build a registry from a list of commands
    pub fn from_commands(commands: impl IntoIterator<Item = Arc<dyn Command>>) -> Result<Self> {
        let mut registry = Self::new();
        for command in commands {
            registry.register(command)?;
        }
        Ok(registry)
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Command>> {
        self.index.get(name).map(|&idx| &self.commands[idx])
    }

    /// Commands in registration order
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Command>> {
        self.commands.iter()
    }

    /// Registered names in registration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().map(|command| command.name())
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
