//! Quote-aware command-line tokenizer
//!
//! Splits a line into arguments using Windows-CRT argv rules:
//!
//! - Unquoted spaces and tabs separate arguments; runs of them collapse
//! - `"` toggles quoting; inside quotes `""` is a literal quote
//! - Backslashes are literal unless they precede a `"`; then each pair
//!   yields one backslash and an odd trailing one escapes the quote
//! - Unterminated quotes are tolerated and run to the end of the line
//!
//! Every argument keeps both its logical (dequoted) value and the raw
//! source slice it was read from, so completion can map values back to
//! cursor positions. Offsets are byte offsets into the source line.

/// A token as it appears in the source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawToken {
    /// Raw source text, quotes and backslashes included
    pub text: String,
    /// Byte offset of the first character of the token
    pub start: usize,
}

impl RawToken {
    /// Byte offset one past the last character of the token.
    pub fn end(&self) -> usize {
        self.start + self.text.len()
    }

    /// Whether `pos` lies inside the token or touches either edge.
    pub fn touches(&self, pos: usize) -> bool {
        self.start <= pos && pos <= self.end()
    }
}

/// Tokenized line: logical values and the raw tokens they came from.
///
/// `args[i]` is always the escape-processed value of `tokens[i]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseResult {
    pub args: Vec<String>,
    pub tokens: Vec<RawToken>,
}

impl ParseResult {
    /// Number of tokens in the line.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Whether the line had no tokens at all.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Index of the token touching `pos`, if any.
    pub fn token_at(&self, pos: usize) -> Option<usize> {
        self.tokens.iter().position(|t| t.touches(pos))
    }
}

/// Command-line lexer
pub struct CommandLexer<'a> {
    source: &'a str,
    chars: Vec<(usize, char)>,
    pos: usize,
    in_quotes: bool,
    current: String,
    token_start: Option<usize>,
    result: ParseResult,
}

impl<'a> CommandLexer<'a> {
    /// Create a new lexer over a line
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.char_indices().collect(),
            pos: 0,
            in_quotes: false,
            current: String::new(),
            token_start: None,
            result: ParseResult::default(),
        }
    }

    /// Tokenize a line, keeping raw spans
    pub fn tokenize(source: &str) -> ParseResult {
        CommandLexer::new(source).run()
    }

    fn run(mut self) -> ParseResult {
        while let Some(&(offset, ch)) = self.chars.get(self.pos) {
            match ch {
                ' ' | '\t' if !self.in_quotes => {
                    self.finish_token(offset);
                    self.pos += 1;
                }
                '\\' => self.read_backslashes(offset),
                '"' => {
                    self.mark_start(offset);
                    if self.in_quotes && self.peek_char(1) == Some('"') {
                        self.current.push('"');
                        self.pos += 2;
                    } else {
                        self.in_quotes = !self.in_quotes;
                        self.pos += 1;
                    }
                }
                _ => {
                    self.mark_start(offset);
                    self.current.push(ch);
                    self.pos += 1;
                }
            }
        }

        self.finish_token(self.source.len());
        self.result
    }

    /// Consume a run of backslashes and whatever quote follows it.
    fn read_backslashes(&mut self, offset: usize) {
        self.mark_start(offset);

        let run = self.chars[self.pos..]
            .iter()
            .take_while(|(_, c)| *c == '\\')
            .count();

        if self.peek_char(run) == Some('"') {
            self.current.extend(std::iter::repeat_n('\\', run / 2));
            if run % 2 == 1 {
                // odd backslash escapes the quote
                self.current.push('"');
                self.pos += run + 1;
            } else {
                self.pos += run;
            }
        } else {
            self.current.extend(std::iter::repeat_n('\\', run));
            self.pos += run;
        }
    }

    fn peek_char(&self, ahead: usize) -> Option<char> {
        self.chars.get(self.pos + ahead).map(|&(_, c)| c)
    }

    fn mark_start(&mut self, offset: usize) {
        if self.token_start.is_none() {
            self.token_start = Some(offset);
        }
    }

    fn finish_token(&mut self, end: usize) {
        if let Some(start) = self.token_start.take() {
            self.result.args.push(std::mem::take(&mut self.current));
            self.result.tokens.push(RawToken {
                text: self.source[start..end].to_string(),
                start,
            });
        }
    }
}

/// Tokenize a line into logical values and raw spans.
pub fn tokenize(line: &str) -> ParseResult {
    CommandLexer::tokenize(line)
}

/// Tokenize a line into logical values only.
pub fn tokenize_simple(line: &str) -> Vec<String> {
    CommandLexer::tokenize(line).args
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quoted_first_token() {
        let result = tokenize(r#""abc" d e"#);
        assert_eq!(result.args, vec!["abc", "d", "e"]);
        assert_eq!(result.tokens[0].start, 0);
        assert_eq!(result.tokens[0].text, r#""abc""#);
        assert_eq!(result.tokens[0].end(), 5);
        assert_eq!(result.tokens[2].start, 8);
    }

    #[test]
    fn test_backslashes_without_quote_are_literal() {
        let result = tokenize(r#"a\\b d"e f"g h"#);
        assert_eq!(result.args, vec![r"a\\b", "de fg", "h"]);
        assert_eq!(result.tokens[1].text, r#"d"e f"g"#);
    }

    #[test]
    fn test_odd_backslashes_escape_quote() {
        let result = tokenize(r#"a\\\"b c d"#);
        assert_eq!(result.args, vec![r#"a\"b"#, "c", "d"]);
        assert_eq!(result.tokens[0].text, r#"a\\\"b"#);
    }

    #[test]
    fn test_even_backslashes_before_quote_open_quoting() {
        let result = tokenize(r#"a\\"b c" d"#);
        assert_eq!(result.args, vec![r"a\b c", "d"]);
    }

    #[test]
    fn test_doubled_quote_inside_quotes() {
        let result = tokenize(r#"a"b"" c d"#);
        assert_eq!(result.args, vec![r#"ab" c d"#]);
        assert_eq!(result.tokens.len(), 1);
    }

    #[test]
    fn test_empty_quotes_make_empty_token() {
        let result = tokenize(r#"say "" now"#);
        assert_eq!(result.args, vec!["say", "", "now"]);
        assert_eq!(result.tokens[1].text, r#""""#);
    }

    #[test]
    fn test_empty_and_blank_input() {
        assert!(tokenize("").is_empty());
        assert!(tokenize(" \t  ").is_empty());
    }

    #[test]
    fn test_unterminated_quote_runs_to_end() {
        let result = tokenize(r#"open "my file"#);
        assert_eq!(result.args, vec!["open", "my file"]);
        assert_eq!(result.tokens[1].text, r#""my file"#);
        assert_eq!(result.tokens[1].end(), 13);
    }

    #[test]
    fn test_whitespace_collapses_and_tabs_separate() {
        let result = tokenize("  a \t b   c ");
        assert_eq!(result.args, vec!["a", "b", "c"]);
        assert_eq!(result.tokens[0].start, 2);
        assert_eq!(result.tokens[1].start, 6);
        assert_eq!(result.tokens[2].start, 10);
    }

    #[test]
    fn test_raw_tokens_rejoin_to_normalized_line() {
        let lines = [
            r#"copy   "a b"  c\\d   "e\"f""#,
            r#"run -x "--" -- echo "hi there""#,
            "plain words only",
        ];
        for line in lines {
            let result = tokenize(line);
            let joined: Vec<&str> = result.tokens.iter().map(|t| t.text.as_str()).collect();
            let normalized = line.split_whitespace().collect::<Vec<_>>().join(" ");
            assert_eq!(joined.join(" "), normalized, "line: {line}");
            assert_eq!(result.args.len(), result.tokens.len());
        }
    }

    #[test]
    fn test_multibyte_offsets() {
        let result = tokenize("größe \"ä b\"");
        assert_eq!(result.args, vec!["größe", "ä b"]);
        assert_eq!(result.tokens[1].start, "größe ".len());
        assert_eq!(result.tokens[1].end(), "größe \"ä b\"".len());
    }

    #[test]
    fn test_token_at() {
        let result = tokenize("task add --name x");
        assert_eq!(result.token_at(0), Some(0));
        assert_eq!(result.token_at(6), Some(1));
        assert_eq!(result.token_at(8), Some(1));
        assert_eq!(result.token_at(17), Some(3));
    }

    #[test]
    fn test_tokenize_simple() {
        assert_eq!(
            tokenize_simple(r#"add "buy milk" --due tomorrow"#),
            vec!["add", "buy milk", "--due", "tomorrow"]
        );
    }
}
