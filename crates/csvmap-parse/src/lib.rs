//! Delimited line parsing.
//!
//! Turns one raw text line into an ordered list of raw string values.
//!
//! # Features
//!
//! - **Multi-character separators**: `,`, `;`, `\t`, `||`, ...
//! - **Configurable quoting**: any single quote character, or none at all
//! - **Strict quoting**: unterminated or stray quotes are reported as
//!   [`ParseError::MalformedRecord`] together with the offending line
//!
//! # Example
//!
//! ```
//! use csvmap_parse::{Dialect, parse_line};
//!
//! let dialect = Dialect::from_options(",", "'").unwrap();
//! let fields = parse_line("a,b,'c,d'", &dialect).unwrap();
//! assert_eq!(fields, vec!["a", "b", "c,d"]);
//! ```

mod dialect;
mod error;
mod line;

// === Error Types ===
pub use error::{DialectError, MalformedReason, ParseError, Result};

// === Dialect ===
pub use dialect::{DEFAULT_QUOTE, DEFAULT_SEPARATOR, Dialect, parse_quote_char};

// === Parsing ===
pub use line::{is_empty_line, parse_line, strip_line_terminator};
