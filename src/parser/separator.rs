//! Quote-aware separator search
//!
//! A forwarding command line looks like `verb --opt value -- other command`.
//! The separator is located on raw tokens, so a separator that appears inside
//! quotes (`"a -- b"`) is never mistaken for a split point.

use super::tokenizer::tokenize;

/// Default separator between options and a forwarded command.
pub const DEFAULT_SEPARATOR: &str = "--";

/// Result of a separator search over a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeparatorSplit {
    /// Byte offset where the options half ends (the separator start,
    /// or the line length when there is no separator)
    pub options_end: usize,
    /// Byte offset just after the separator token, `None` when absent
    pub forward_start: Option<usize>,
}

impl SeparatorSplit {
    /// Split `text` at the first unquoted `separator` token.
    pub fn find(text: &str, separator: &str) -> Self {
        let parsed = tokenize(text);
        match parsed.tokens.iter().find(|t| t.text == separator) {
            Some(token) => Self {
                options_end: token.start,
                forward_start: Some(token.end()),
            },
            None => Self {
                options_end: text.len(),
                forward_start: None,
            },
        }
    }

    /// The trimmed options half of `text`.
    pub fn options<'a>(&self, text: &'a str) -> &'a str {
        text[..self.options_end].trim()
    }

    /// The trimmed forwarded half of `text`, `None` without a separator.
    pub fn forward<'a>(&self, text: &'a str) -> Option<&'a str> {
        self.forward_start.map(|start| text[start..].trim())
    }

    /// Whether a separator token was found.
    pub fn has_separator(&self) -> bool {
        self.forward_start.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quoted_separator_is_skipped() {
        let line = r#"echo "a -- b" -- real-cmd"#;
        let split = SeparatorSplit::find(line, "--");
        assert_eq!(split.options(line), r#"echo "a -- b""#);
        assert_eq!(split.forward(line), Some("real-cmd"));
        assert_eq!(split.options_end, 14);
        assert_eq!(split.forward_start, Some(16));
    }

    #[test]
    fn test_no_separator() {
        let line = "run --count 3";
        let split = SeparatorSplit::find(line, "--");
        assert_eq!(split.options_end, line.len());
        assert_eq!(split.forward_start, None);
        assert_eq!(split.forward(line), None);
        assert_eq!(split.options(line), line);
    }

    #[test]
    fn test_separator_must_be_whole_token() {
        let line = "run --count --verbose";
        assert!(!SeparatorSplit::find(line, "--").has_separator());
    }

    #[test]
    fn test_trailing_separator_gives_blank_forward() {
        let line = "run -q --   ";
        let split = SeparatorSplit::find(line, "--");
        assert_eq!(split.forward(line), Some(""));
        assert_eq!(split.options(line), "run -q");
    }

    #[test]
    fn test_custom_separator() {
        let line = "wrap ::: ls -la";
        let split = SeparatorSplit::find(line, ":::");
        assert_eq!(split.forward(line), Some("ls -la"));
        assert_eq!(split.options(line), "wrap");
    }
}
