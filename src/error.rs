//! Error types surfaced by the engine.
//!
//! Four kinds reach the caller: `Parse` for malformed expressions, `Query`
//! for out-of-range or unsupported query shapes, `Io` for serialization and
//! load failures, and `Build` for construction invariant violations. A build
//! failure abandons the partially-built index; everything else is recovered
//! at the driver boundary so one bad query never takes the engine down.

use std::fmt;
use std::io;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// What went wrong while parsing a regular expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// A `(` without its matching `)`, or a stray `)`.
    UnbalancedParens,
    /// `[]` with no admitted bytes, or an unterminated class.
    EmptyClass,
    /// `{min,max}` with missing digits, `min > max`, or a missing `}`.
    InvalidRepetition,
    /// A repetition operator with nothing to repeat, e.g. `*ab`.
    DanglingOperator(char),
    /// A trailing `\` with nothing to escape.
    DanglingEscape,
    /// A byte the grammar has no rule for at this position.
    UnexpectedByte(u8),
    /// Expression ended where more input was required.
    UnexpectedEnd,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseErrorKind::UnbalancedParens => write!(f, "unbalanced parentheses"),
            ParseErrorKind::EmptyClass => write!(f, "empty or unterminated character class"),
            ParseErrorKind::InvalidRepetition => write!(f, "invalid repetition bounds"),
            ParseErrorKind::DanglingOperator(c) => {
                write!(f, "repetition operator '{}' with no operand", c)
            }
            ParseErrorKind::DanglingEscape => write!(f, "trailing escape"),
            ParseErrorKind::UnexpectedByte(b) => {
                if b.is_ascii_graphic() {
                    write!(f, "unexpected character '{}'", *b as char)
                } else {
                    write!(f, "unexpected byte 0x{:02x}", b)
                }
            }
            ParseErrorKind::UnexpectedEnd => write!(f, "unexpected end of expression"),
        }
    }
}

/// A parse failure with the byte position it was detected at.
///
/// No partial AST is ever returned alongside one of these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// Byte offset into the expression string.
    pub position: usize,
    /// Classification of the failure.
    pub kind: ParseErrorKind,
}

impl ParseError {
    pub fn new(position: usize, kind: ParseErrorKind) -> Self {
        ParseError { position, kind }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "parse error at position {}: {}", self.position, self.kind)
    }
}

impl std::error::Error for ParseError {}

/// Top-level error type.
#[derive(Debug)]
pub enum Error {
    /// Malformed regular expression.
    Parse(ParseError),
    /// Out-of-range or unsupported query shape; the query aborts cleanly.
    Query(String),
    /// Serialization, deserialization, or corpus load failure.
    Io(io::Error),
    /// Construction invariant violation. Should be unreachable on
    /// well-formed input; the partially-built state is released.
    Build(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Parse(e) => write!(f, "{}", e),
            Error::Query(msg) => write!(f, "query error: {}", msg),
            Error::Io(e) => write!(f, "i/o error: {}", e),
            Error::Build(msg) => write!(f, "build error: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Parse(e) => Some(e),
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<ParseError> for Error {
    fn from(e: ParseError) -> Self {
        Error::Parse(e)
    }
}
