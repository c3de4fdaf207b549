//! Option schemas for verbs
//!
//! Commands describe their options explicitly instead of relying on runtime
//! introspection. A schema drives three things:
//!
//! - Structured parsing (each verb is compiled once into a `clap::Command`)
//! - Usage text (rendered by clap from the same command)
//! - Option-name completion (flag spellings)

use std::str::FromStr;

use clap::{Arg, ArgAction, ArgMatches};

use crate::error::{ExecutionError, Result};

/// How many values an option takes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    /// Boolean switch, no value
    Flag,
    /// Exactly one value
    Value,
    /// One or more values; repeatable
    Values,
}

/// One option of a verb schema
///
/// An option with neither a short nor a long name is positional.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionSpec {
    pub id: String,
    pub short: Option<char>,
    pub long: Option<String>,
    pub kind: OptionKind,
    pub required: bool,
    pub help: Option<String>,
    pub value_name: Option<String>,
}

impl OptionSpec {
    fn with_kind(id: impl Into<String>, kind: OptionKind) -> Self {
        Self {
            id: id.into(),
            short: None,
            long: None,
            kind,
            required: false,
            help: None,
            value_name: None,
        }
    }

    /// Boolean switch
    pub fn flag(id: impl Into<String>) -> Self {
        Self::with_kind(id, OptionKind::Flag)
    }

    /// Option taking a single value
    pub fn value(id: impl Into<String>) -> Self {
        Self::with_kind(id, OptionKind::Value)
    }

    /// Repeatable option collecting values
    pub fn values(id: impl Into<String>) -> Self {
        Self::with_kind(id, OptionKind::Values)
    }

    /// Positional argument taking a single value
    pub fn positional(id: impl Into<String>) -> Self {
        Self::with_kind(id, OptionKind::Value)
    }

    /// Positional argument collecting the remaining values
    pub fn trailing(id: impl Into<String>) -> Self {
        Self::with_kind(id, OptionKind::Values)
    }

    pub fn short(mut self, short: char) -> Self {
        self.short = Some(short);
        self
    }

    pub fn long(mut self, long: impl Into<String>) -> Self {
        self.long = Some(long.into());
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn value_name(mut self, name: impl Into<String>) -> Self {
        self.value_name = Some(name.into());
        self
    }

    /// Whether the option is matched by position rather than by name
    pub fn is_positional(&self) -> bool {
        self.short.is_none() && self.long.is_none()
    }

    /// Every way the option can be spelled on a line, long form first
    pub fn flag_spellings(&self) -> Vec<String> {
        self.long
            .iter()
            .map(|long| format!("--{long}"))
            .chain(self.short.iter().map(|short| format!("-{short}")))
            .collect()
    }

    fn to_arg(&self) -> Arg {
        let mut arg = Arg::new(self.id.clone()).required(self.required);

        if let Some(short) = self.short {
            arg = arg.short(short);
        }
        if let Some(long) = &self.long {
            arg = arg.long(long.clone());
        }
        if let Some(help) = &self.help {
            arg = arg.help(help.clone());
        }
        if let Some(value_name) = &self.value_name {
            arg = arg.value_name(value_name.clone());
        }

        match self.kind {
            OptionKind::Flag => arg.action(ArgAction::SetTrue),
            OptionKind::Value => arg.action(ArgAction::Set),
            OptionKind::Values if self.is_positional() => {
                arg.action(ArgAction::Append).num_args(1..)
            }
            OptionKind::Values => arg.action(ArgAction::Append),
        }
    }
}

/// Whether a forwarder's forwarded command may or must be present
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ArityPolicy {
    /// Forwarded command is not expected; if present it is ignored with a warning
    #[default]
    Disallowed,
    /// Forwarded command may be present
    Optional,
    /// Forwarded command must be present
    Required,
}

/// Declarative description of one verb
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerbSchema {
    pub name: String,
    pub aliases: Vec<String>,
    pub is_default: bool,
    pub about: String,
    pub options: Vec<OptionSpec>,
    pub forwarding: ArityPolicy,
}

impl VerbSchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            aliases: Vec::new(),
            is_default: false,
            about: String::new(),
            options: Vec::new(),
            forwarding: ArityPolicy::default(),
        }
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// Select this verb when the first token names no verb
    pub fn default_verb(mut self) -> Self {
        self.is_default = true;
        self
    }

    pub fn about(mut self, about: impl Into<String>) -> Self {
        self.about = about.into();
        self
    }

    pub fn option(mut self, option: OptionSpec) -> Self {
        self.options.push(option);
        self
    }

    pub fn forwarding(mut self, policy: ArityPolicy) -> Self {
        self.forwarding = policy;
        self
    }

    /// Canonical name followed by the aliases
    pub fn names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.aliases.iter().map(String::as_str))
    }

    /// Compile the schema into a parser
    pub(crate) fn to_command(&self) -> clap::Command {
        clap::Command::new(self.name.clone())
            .no_binary_name(true)
            .disable_help_flag(true)
            .disable_version_flag(true)
            .about(self.about.clone())
            .visible_aliases(self.aliases.clone())
            .args(self.options.iter().map(OptionSpec::to_arg))
    }
}

/// Options parsed against a verb schema
#[derive(Debug, Clone, Default)]
pub struct ParsedOptions {
    matches: ArgMatches,
}

impl ParsedOptions {
    /// Whether a flag was given
    pub fn flag(&self, id: &str) -> bool {
        self.matches
            .try_get_one::<bool>(id)
            .ok()
            .flatten()
            .copied()
            .unwrap_or(false)
    }

    /// Value of a single-value option
    pub fn value(&self, id: &str) -> Option<&str> {
        self.matches
            .try_get_one::<String>(id)
            .ok()
            .flatten()
            .map(String::as_str)
    }

    /// All values of a repeatable option, in order
    pub fn values(&self, id: &str) -> Vec<&str> {
        self.matches
            .try_get_many::<String>(id)
            .ok()
            .flatten()
            .map(|values| values.map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Value of a single-value option converted with `FromStr`
    pub fn parse<T>(&self, id: &str) -> Result<Option<T>>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.value(id)
            .map(|raw| {
                raw.parse::<T>().map_err(|e| {
                    ExecutionError::InvalidArguments(format!("{id}: '{raw}': {e}")).into()
                })
            })
            .transpose()
    }
}

impl From<ArgMatches> for ParsedOptions {
    fn from(matches: ArgMatches) -> Self {
        Self { matches }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn add_verb() -> VerbSchema {
        VerbSchema::new("add")
            .alias("a")
            .about("Add a task")
            .option(OptionSpec::positional("title").required().help("Task title"))
            .option(OptionSpec::value("priority").short('p').long("priority"))
            .option(OptionSpec::values("tag").short('t').long("tag"))
            .option(OptionSpec::flag("urgent").long("urgent"))
    }

    fn parse(schema: &VerbSchema, args: &[&str]) -> std::result::Result<ParsedOptions, clap::Error> {
        schema
            .to_command()
            .try_get_matches_from(args)
            .map(ParsedOptions::from)
    }

    #[test]
    fn test_parse_all_kinds() {
        let parsed = parse(
            &add_verb(),
            &["buy milk", "-p", "2", "--tag", "home", "-t", "shop", "--urgent"],
        )
        .unwrap();

        assert_eq!(parsed.value("title"), Some("buy milk"));
        assert_eq!(parsed.parse::<u8>("priority").unwrap(), Some(2));
        assert_eq!(parsed.values("tag"), vec!["home", "shop"]);
        assert!(parsed.flag("urgent"));
        assert!(!parsed.flag("missing"));
    }

    #[test]
    fn test_missing_required_positional_fails() {
        assert!(parse(&add_verb(), &["--urgent"]).is_err());
    }

    #[test]
    fn test_unknown_flag_fails() {
        assert!(parse(&add_verb(), &["title", "--bogus"]).is_err());
    }

    #[test]
    fn test_parse_reports_bad_value() {
        let parsed = parse(&add_verb(), &["t", "-p", "high"]).unwrap();
        assert!(parsed.parse::<u8>("priority").is_err());
        assert_eq!(parsed.parse::<u8>("absent").unwrap(), None);
    }

    #[test]
    fn test_flag_spellings() {
        let spec = OptionSpec::value("count").short('n').long("count");
        assert_eq!(spec.flag_spellings(), vec!["--count", "-n"]);
        assert!(OptionSpec::positional("x").flag_spellings().is_empty());
        assert!(OptionSpec::trailing("rest").is_positional());
    }

    #[test]
    fn test_trailing_collects_everything() {
        let schema = VerbSchema::new("echo").option(OptionSpec::trailing("words"));
        let parsed = parse(&schema, &["a", "b", "c"]).unwrap();
        assert_eq!(parsed.values("words"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_names_lists_aliases() {
        let verb = add_verb();
        let names: Vec<&str> = verb.names().collect();
        assert_eq!(names, vec!["add", "a"]);
    }

    #[test]
    fn test_usage_mentions_options() {
        let help = add_verb().to_command().render_help().to_string();
        assert!(help.contains("--priority"));
        assert!(help.contains("Task title"));
    }
}
