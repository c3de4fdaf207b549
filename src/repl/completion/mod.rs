//! Completion system for the shell
//!
//! Every strategy implements [`SuggestionProvider`]: it is given the whole
//! text being edited plus the cursor and answers with candidates and the span
//! they replace.
//!
//! # Architecture
//!
//! - **CommandNameSuggestions**: the first token of a line
//! - **OptionNameSuggestions**: flags of one option schema
//! - **FilePathSuggestions**: relative paths inside quotes
//! - **SuggestionChain**: first non-empty strategy wins
//! - **VerbSuggestions**: verb names, then the verb's own strategy
//! - **ForwardSuggestions**: options before the separator, the root after it
//! - **RootSuggestions**: entry point handed to the terminal
//!
//! Strategies that delegate on a substring shift the returned span back
//! exactly once, so every caller sees offsets into its own text.
//!
//! # Examples
//!
//! ```
//! use cmdshell::repl::completion::{CommandNameSuggestions, SuggestionProvider};
//!
//! let names = CommandNameSuggestions::new(["help", "healthcheck"], Vec::<String>::new());
//! let result = names.suggest("he", 2);
//! assert_eq!(result.candidates, vec!["healthcheck", "help"]);
//! ```

mod chain;
mod command;
mod file_path;
mod forward;
mod options;
mod provider;
mod root;
mod verb;

pub use chain::SuggestionChain;
pub use command::CommandNameSuggestions;
pub use file_path::FilePathSuggestions;
pub use forward::ForwardSuggestions;
pub use options::OptionNameSuggestions;
pub use provider::{SuggestionProvider, SuggestionResult, split_match};
pub use root::RootSuggestions;
pub use verb::VerbSuggestions;
