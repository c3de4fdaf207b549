//! Alias table mapping every verb spelling to its canonical name

use std::collections::HashMap;

use super::schema::VerbSchema;
use crate::error::{ConfigError, Result};

/// Alias under which the default verb is registered.
pub const DEFAULT_VERB_ALIAS: &str = "";

/// Injective map from alias to canonical verb name
///
/// Built once when a router is constructed and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct AliasTable {
    entries: HashMap<String, String>,
}

impl AliasTable {
    /// Build the table for `command`'s verbs
    ///
    /// Registers each canonical name, each alias and, for a default verb,
    /// the empty alias. Any collision is a configuration error.
    pub fn build(command: &str, verbs: &[VerbSchema]) -> Result<Self> {
        let mut table = Self::default();

        for verb in verbs {
            if verb.name.trim().is_empty() {
                return Err(ConfigError::MissingVerbName {
                    command: command.to_string(),
                }
                .into());
            }

            let default_alias = verb.is_default.then_some(DEFAULT_VERB_ALIAS);
            for alias in verb.names().chain(default_alias) {
                table.insert(command, alias, &verb.name)?;
            }
        }

        Ok(table)
    }

    fn insert(&mut self, command: &str, alias: &str, verb: &str) -> Result<()> {
        if let Some(existing) = self.entries.get(alias) {
            return Err(ConfigError::DuplicateAlias {
                command: command.to_string(),
                alias: alias.to_string(),
                existing: existing.clone(),
                verb: verb.to_string(),
            }
            .into());
        }
        self.entries.insert(alias.to_string(), verb.to_string());
        Ok(())
    }

    /// Canonical name for an alias
    pub fn resolve(&self, alias: &str) -> Option<&str> {
        self.entries.get(alias).map(String::as_str)
    }

    /// Canonical name of the default verb, if one was declared
    pub fn default_verb(&self) -> Option<&str> {
        self.resolve(DEFAULT_VERB_ALIAS)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
