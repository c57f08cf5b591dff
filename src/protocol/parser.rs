//! Command Line Parser
//!
//! Splits one raw command line into a verb and its argument tokens.
//!
//! ## Rules
//!
//! 1. Tokens are separated by runs of ASCII whitespace (space, tab, CR, LF).
//! 2. The first token is the verb. It must be UTF-8 and is matched
//!    case-insensitively; it is stored upper-cased.
//! 3. Remaining tokens are kept as raw bytes. They are sliced out of the
//!    input buffer, so parsing does not copy argument data.
//! 4. An empty or all-whitespace line is the only structural error.
//!    Whether the arguments make sense for the verb is decided later by
//!    the dispatcher and the handlers.
//!
//! ```text
//! "incrbyfloat  foo 0.1\r\n"
//!        │
//!        ▼
//! Command { name: "INCRBYFLOAT", args: ["foo", "0.1"] }
//! ```

use bytes::Bytes;
use thiserror::Error;

/// Errors that can occur while splitting a command line.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The line contains no tokens
    #[error("empty command")]
    EmptyCommand,

    /// The verb is not valid UTF-8
    #[error("invalid command name")]
    InvalidUtf8,
}

/// Result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// A parsed command: verb plus ordered argument tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    name: String,
    args: Vec<Bytes>,
}

impl Command {
    /// Builds a command directly from a verb and its arguments.
    pub fn new(name: &str, args: Vec<Bytes>) -> Self {
        Self {
            name: name.to_ascii_uppercase(),
            args,
        }
    }

    /// The upper-cased verb.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The argument tokens, in order.
    pub fn args(&self) -> &[Bytes] {
        &self.args
    }
}

/// Parses one command line.
///
/// # Example
///
/// ```
/// use sparkkv::protocol::parse_line;
/// use bytes::Bytes;
///
/// let command = parse_line(Bytes::from("set foo 1")).unwrap();
/// assert_eq!(command.name(), "SET");
/// assert_eq!(command.args(), &[Bytes::from("foo"), Bytes::from("1")]);
/// ```
pub fn parse_line(line: Bytes) -> ParseResult<Command> {
    let mut tokens = tokenize(&line).map(|(start, end)| line.slice(start..end));

    let verb = tokens.next().ok_or(ParseError::EmptyCommand)?;
    let name = std::str::from_utf8(&verb).map_err(|_| ParseError::InvalidUtf8)?;

    Ok(Command {
        name: name.to_ascii_uppercase(),
        args: tokens.collect(),
    })
}

/// Yields the `(start, end)` byte range of every whitespace-separated token.
fn tokenize(line: &[u8]) -> impl Iterator<Item = (usize, usize)> + '_ {
    let mut pos = 0;

    std::iter::from_fn(move || {
        while pos < line.len() && line[pos].is_ascii_whitespace() {
            pos += 1;
        }
        if pos >= line.len() {
            return None;
        }

        let start = pos;
        while pos < line.len() && !line[pos].is_ascii_whitespace() {
            pos += 1;
        }
        Some((start, pos))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> ParseResult<Command> {
        parse_line(Bytes::from(s.to_string()))
    }

    #[test]
    fn test_parse_verb_and_args() {
        let command = parse("INCRBYFLOAT foo 0.1").unwrap();
        assert_eq!(command.name(), "INCRBYFLOAT");
        assert_eq!(command.args(), &[Bytes::from("foo"), Bytes::from("0.1")]);
    }

    #[test]
    fn test_parse_verb_is_case_insensitive() {
        assert_eq!(parse("incrbyfloat foo 1").unwrap().name(), "INCRBYFLOAT");
        assert_eq!(parse("GeT foo").unwrap().name(), "GET");
    }

    #[test]
    fn test_parse_preserves_argument_case() {
        let command = parse("set Key VALUE").unwrap();
        assert_eq!(command.args(), &[Bytes::from("Key"), Bytes::from("VALUE")]);
    }

    #[test]
    fn test_parse_collapses_whitespace() {
        let command = parse("  SET\tfoo    bar \r\n").unwrap();
        assert_eq!(command.name(), "SET");
        assert_eq!(command.args(), &[Bytes::from("foo"), Bytes::from("bar")]);
    }

    #[test]
    fn test_parse_verb_only() {
        let command = parse("INCRBYFLOAT").unwrap();
        assert_eq!(command.name(), "INCRBYFLOAT");
        assert!(command.args().is_empty());
    }

    #[test]
    fn test_parse_empty_line() {
        assert_eq!(parse(""), Err(ParseError::EmptyCommand));
        assert_eq!(parse("   \t\r\n"), Err(ParseError::EmptyCommand));
    }

    #[test]
    fn test_parse_invalid_utf8_verb() {
        let line = Bytes::from_static(b"\xff\xfe foo");
        assert_eq!(parse_line(line), Err(ParseError::InvalidUtf8));
    }

    #[test]
    fn test_parse_binary_argument() {
        let line = Bytes::from_static(b"SET foo \xff\x00");
        let command = parse_line(line).unwrap();
        assert_eq!(command.args()[1], Bytes::from_static(b"\xff\x00"));
    }

    #[test]
    fn test_command_new_uppercases() {
        let command = Command::new("del", vec![Bytes::from("a")]);
        assert_eq!(command.name(), "DEL");
        assert_eq!(command.args().len(), 1);
    }
}
