use std::{fmt, io};

/// Crate-wide `Result` type using [`ShellError`] as the error.
///
/// This alias is re-exported by the parent `error` module and is intended
/// to be used throughout the crate for fallible operations.
pub type Result<T> = std::result::Result<T, ShellError>;

/// Top-level error type for the shell engine.
///
/// This type wraps more specific error kinds and provides a single
/// error type that can be used throughout the crate.
#[derive(Debug)]
pub enum ShellError {
    /// Construction-time and configuration errors.
    Config(ConfigError),

    /// Command execution errors.
    Execution(ExecutionError),

    /// I/O errors.
    Io(io::Error),

    /// Terminal adapter failures.
    Terminal(String),

    /// The shared cancellation token fired.
    Cancelled,

    /// Generic error with a free-form message.
    Generic(String),

    /// Feature not implemented. Returned by default cleanup hooks.
    NotImplemented(String),
}

/// Configuration and construction errors.
///
/// These are configuration bugs rather than runtime conditions and abort
/// initialization.
#[derive(Debug)]
pub enum ConfigError {
    /// Two verbs claim the same alias (two default verbs share `""`).
    DuplicateAlias {
        command: String,
        alias: String,
        existing: String,
        verb: String,
    },

    /// A verb schema was declared without a verb name.
    MissingVerbName { command: String },

    /// A router was built without any verbs.
    NoVerbs { command: String },

    /// Two commands were registered under the same name.
    DuplicateCommand(String),

    /// The shell was built without a terminal adapter.
    MissingTerminal,

    /// Invalid config file format.
    InvalidFormat(String),

    /// Invalid field value.
    InvalidValue { field: String, value: String },
}

/// Execution-specific errors.
#[derive(Debug)]
pub enum ExecutionError {
    /// Arguments could not be interpreted by a handler.
    InvalidArguments(String),

    /// A verb requires a forwarded command and none was given.
    ForwardRequired { command: String, verb: String },

    /// A router refused the arguments; its diagnostics are already on the console.
    Rejected(String),

    /// Handler reported a failure.
    Failed(String),

    /// Handler panicked while running.
    Panicked(String),
}

/* ========================= Display & Error impls ========================= */

impl fmt::Display for ShellError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShellError::Config(e) => write!(f, "Configuration error: {e}"),
            ShellError::Execution(e) => write!(f, "{e}"),
            ShellError::Io(e) => write!(f, "I/O error: {e}"),
            ShellError::Terminal(msg) => write!(f, "Terminal error: {msg}"),
            ShellError::Cancelled => write!(f, "Operation cancelled"),
            ShellError::Generic(msg) => write!(f, "{msg}"),
            ShellError::NotImplemented(msg) => write!(f, "Not implemented: {msg}"),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::DuplicateAlias {
                command,
                alias,
                existing,
                verb,
            } => {
                if alias.is_empty() {
                    write!(
                        f,
                        "{command}: verbs '{existing}' and '{verb}' are both marked as default"
                    )
                } else {
                    write!(
                        f,
                        "{command}: alias '{alias}' of verb '{verb}' is already used by '{existing}'"
                    )
                }
            }
            ConfigError::MissingVerbName { command } => {
                write!(f, "{command}: verb schema is missing its verb name")
            }
            ConfigError::NoVerbs { command } => write!(f, "{command}: no verbs declared"),
            ConfigError::DuplicateCommand(name) => {
                write!(f, "Command '{name}' is registered more than once")
            }
            ConfigError::MissingTerminal => {
                write!(f, "A terminal adapter must be supplied before the shell starts")
            }
            ConfigError::InvalidFormat(msg) => write!(f, "Invalid config format: {msg}"),
            ConfigError::InvalidValue { field, value } => {
                write!(f, "Invalid value '{value}' for field '{field}'")
            }
        }
    }
}

impl fmt::Display for ExecutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionError::InvalidArguments(msg) => write!(f, "Invalid arguments: {msg}"),
            ExecutionError::ForwardRequired { command, verb } => {
                write!(f, "{command} {verb}: a command to forward is required")
            }
            ExecutionError::Rejected(command) => write!(f, "{command}: invocation rejected"),
            ExecutionError::Failed(msg) => write!(f, "Command failed: {msg}"),
            ExecutionError::Panicked(msg) => write!(f, "Command panicked: {msg}"),
        }
    }
}

impl std::error::Error for ShellError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ShellError::Config(e) => Some(e),
            ShellError::Execution(e) => Some(e),
            ShellError::Io(e) => Some(e),
            _ => None,
        }
    }
}
impl std::error::Error for ConfigError {}
impl std::error::Error for ExecutionError {}

/* ========================= Conversions to ShellError ========================= */

impl From<io::Error> for ShellError {
    fn from(err: io::Error) -> Self {
        ShellError::Io(err)
    }
}

impl From<ConfigError> for ShellError {
    fn from(err: ConfigError) -> Self {
        ShellError::Config(err)
    }
}

impl From<ExecutionError> for ShellError {
    fn from(err: ExecutionError) -> Self {
        ShellError::Execution(err)
    }
}

impl From<toml::de::Error> for ShellError {
    fn from(err: toml::de::Error) -> Self {
        ShellError::Config(ConfigError::InvalidFormat(err.to_string()))
    }
}

impl From<toml::ser::Error> for ShellError {
    fn from(err: toml::ser::Error) -> Self {
        ShellError::Config(ConfigError::InvalidFormat(err.to_string()))
    }
}

impl From<String> for ShellError {
    fn from(msg: String) -> Self {
        ShellError::Generic(msg)
    }
}

impl From<&str> for ShellError {
    fn from(msg: &str) -> Self {
        ShellError::Generic(msg.to_owned())
    }
}

impl ShellError {
    /// Whether this error is the "no cleanup defined" signal.
    pub fn is_not_implemented(&self) -> bool {
        matches!(self, ShellError::NotImplemented(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_default_message() {
        let err = ShellError::from(ConfigError::DuplicateAlias {
            command: "task".into(),
            alias: String::new(),
            existing: "list".into(),
            verb: "show".into(),
        });
        assert_eq!(
            err.to_string(),
            "Configuration error: task: verbs 'list' and 'show' are both marked as default"
        );
    }

    #[test]
    fn test_not_implemented_signal() {
        assert!(ShellError::NotImplemented("cleanup".into()).is_not_implemented());
        assert!(!ShellError::Generic("boom".into()).is_not_implemented());
    }

    #[test]
    fn test_io_conversion() {
        let err: ShellError = io::Error::new(io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(err, ShellError::Io(_)));
    }
}
