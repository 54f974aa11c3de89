//! Error types for line parsing.

use std::fmt;

use thiserror::Error;

/// Why a quoted line could not be split into fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedReason {
    /// A quoted field never reached its closing quote.
    UnterminatedQuote,
    /// A quote character appeared inside an unquoted field.
    StrayQuote,
    /// Text followed a closing quote before the next separator.
    TrailingAfterQuote,
    /// A carriage return or line feed appeared inside an unquoted field.
    BareLineBreak,
}

impl MalformedReason {
    /// Returns a short human-readable description.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UnterminatedQuote => "unclosed quoted field",
            Self::StrayQuote => "illegal quoting in unquoted field",
            Self::TrailingAfterQuote => "unexpected text after quoted field",
            Self::BareLineBreak => "unquoted fields do not allow line breaks",
        }
    }
}

impl fmt::Display for MalformedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors produced while splitting a line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The line violates the quoting rules of its dialect.
    #[error("malformed record at byte {offset}: {reason}")]
    MalformedRecord {
        /// The offending raw line, unmodified.
        line: String,
        /// Byte offset into `line` where the problem was detected.
        offset: usize,
        reason: MalformedReason,
    },
}

impl ParseError {
    /// Returns the raw line that failed to parse.
    pub fn line(&self) -> &str {
        match self {
            Self::MalformedRecord { line, .. } => line,
        }
    }

    /// Returns the malformation category.
    pub fn reason(&self) -> MalformedReason {
        match self {
            Self::MalformedRecord { reason, .. } => *reason,
        }
    }
}

/// Errors produced while building a [`Dialect`](crate::Dialect).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DialectError {
    #[error("separator must not be empty")]
    EmptySeparator,

    #[error("quote_char has to be a single character, got {value:?}")]
    QuoteCharLength { value: String },

    #[error("separator {separator:?} must not contain the quote character {quote:?}")]
    QuoteInSeparator { separator: String, quote: char },
}

/// Result type for line parsing.
pub type Result<T> = std::result::Result<T, ParseError>;
