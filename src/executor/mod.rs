//! Command execution layer
//!
//! This module provides everything between a resolved command name and the
//! code that runs it:
//! - The [`Command`] contract implemented by every handler
//! - The [`CommandRegistry`] the dispatcher resolves names against
//! - The [`ExecutionContext`] handed to handlers
//! - Verb and forwarding routers for multi-verb commands
//! - Option schemas compiled into structured parsers

pub mod alias;
pub mod builtin;
pub mod context;
pub mod forward;
pub mod registry;
pub mod router;
pub mod schema;

use std::sync::{Arc, Weak};

use async_trait::async_trait;

pub use alias::AliasTable;
pub use context::{DispatchOutcome, ExecutionContext};
pub use forward::ForwardingRouter;
pub use registry::CommandRegistry;
pub use router::{VerbHandler, VerbInvocation, VerbRouter};
pub use schema::{ArityPolicy, OptionKind, OptionSpec, ParsedOptions, VerbSchema};

use crate::error::{Result, ShellError};
use crate::repl::completion::SuggestionProvider;

/// Reserved help keywords
pub const HELP_KEYWORDS: [&str; 7] = ["help", "?", "--help", "-h", "-?", "/h", "/?"];

/// Whether a bare token is a help keyword (case-sensitive)
pub fn is_help_keyword(token: &str) -> bool {
    HELP_KEYWORDS.contains(&token)
}

/// Whether a command's whole argument string asks for help
///
/// Trimmed and compared case-insensitively.
pub fn is_help_request(args: &str) -> bool {
    let args = args.trim();
    HELP_KEYWORDS
        .iter()
        .any(|keyword| keyword.eq_ignore_ascii_case(args))
}

/// A command the shell can dispatch to
#[async_trait]
pub trait Command: Send + Sync {
    /// Name the command is invoked by
    fn name(&self) -> &str;

    /// One-line description shown in the help listing
    fn description(&self) -> &str;

    /// Usage text shown for `<name> help`
    fn usage(&self) -> String {
        format!("{} - {}", self.name(), self.description())
    }

    /// Run the command with the text following its name
    async fn execute(&self, args: &str, ctx: &ExecutionContext) -> Result<()>;

    /// Completion strategy for lines starting with this command
    fn suggestions(&self) -> Option<Arc<dyn SuggestionProvider>> {
        None
    }

    /// Receive the root completion strategy
    ///
    /// Called once the root is built. Forwarders use it to complete the
    /// forwarded command.
    fn attach_root_suggestions(&self, _root: Weak<dyn SuggestionProvider>) {}

    /// Release resources at shutdown
    async fn cleanup(&self) -> Result<()> {
        Err(ShellError::NotImplemented(format!(
            "cleanup for '{}'",
            self.name()
        )))
    }
}

/// Fallback for command names that are not registered
#[async_trait]
pub trait GeneralOperation: Send + Sync {
    /// Handle an unknown command name and the text following it
    async fn execute(&self, name: &str, args: &str, ctx: &ExecutionContext) -> Result<()>;

    fn suggestions(&self) -> Option<Arc<dyn SuggestionProvider>> {
        None
    }
}
