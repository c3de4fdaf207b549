//! Error handling for the shell engine.
//!
//! Errors are split by where they can occur:
//! - Construction-time configuration bugs ([`ConfigError`]), which abort startup
//! - Runtime command failures ([`ExecutionError`]), which the dispatcher contains
//!
//! # Example
//!
//! ```rust
//! use cmdshell::error::{ConfigError, Result, ShellError};
//!
//! fn register() -> Result<()> {
//!     Err(ConfigError::DuplicateCommand("echo".into()).into())
//! }
//!
//! assert!(matches!(register(), Err(ShellError::Config(_))));
//! ```

pub mod kinds;

// Re-export commonly used types
pub use kinds::{ConfigError, ExecutionError, Result, ShellError};
