//! Command-line parsing
//!
//! - `tokenizer`: quote-aware tokenizer producing logical values and raw spans
//! - `separator`: quote-aware search for the option/forward separator

pub mod separator;
pub mod tokenizer;

pub use separator::{DEFAULT_SEPARATOR, SeparatorSplit};
pub use tokenizer::{CommandLexer, ParseResult, RawToken, tokenize, tokenize_simple};

/// Split a line into its command-name token and the remaining text.
///
/// The command name is the first whitespace-delimited word; the rest is
/// returned with leading whitespace removed.
pub fn split_command(line: &str) -> (&str, &str) {
    let line = line.trim_start();
    match line.find([' ', '\t']) {
        Some(idx) => (&line[..idx], line[idx..].trim_start()),
        None => (line, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_command() {
        assert_eq!(split_command("task add x"), ("task", "add x"));
        assert_eq!(split_command("  help"), ("help", ""));
        assert_eq!(split_command("echo \t  a  b "), ("echo", "a  b "));
        assert_eq!(split_command(""), ("", ""));
    }
}
