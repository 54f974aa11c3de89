//! Separator and quoting configuration.

use crate::error::DialectError;

/// Default field separator.
pub const DEFAULT_SEPARATOR: &str = ",";

/// Default quote character.
pub const DEFAULT_QUOTE: char = '"';

/// Literal spelling of the NUL character accepted in configuration files.
const ESCAPED_NUL: &str = "\\x00";

/// How a line is split into fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dialect {
    separator: String,
    quote: Option<char>,
}

impl Dialect {
    /// Creates a dialect, rejecting separators that cannot be split on.
    pub fn new(separator: impl Into<String>, quote: Option<char>) -> Result<Self, DialectError> {
        let separator = separator.into();
        if separator.is_empty() {
            return Err(DialectError::EmptySeparator);
        }
        if let Some(quote) = quote
            && separator.contains(quote)
        {
            return Err(DialectError::QuoteInSeparator { separator, quote });
        }
        Ok(Self { separator, quote })
    }

    /// Creates a dialect from the textual `separator` and `quote_char` options.
    pub fn from_options(separator: &str, quote_char: &str) -> Result<Self, DialectError> {
        Self::new(separator, parse_quote_char(quote_char)?)
    }

    pub fn separator(&self) -> &str {
        &self.separator
    }

    /// Returns the quote character, or `None` when quoting is disabled.
    pub fn quote(&self) -> Option<char> {
        self.quote
    }
}

impl Default for Dialect {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR.to_string(),
            quote: Some(DEFAULT_QUOTE),
        }
    }
}

/// Interprets a `quote_char` option value.
///
/// - `""`, `"\x00"` (written out) and the NUL character disable quoting
/// - any other single character is the quote character
pub fn parse_quote_char(value: &str) -> Result<Option<char>, DialectError> {
    if value.is_empty() || value == ESCAPED_NUL {
        return Ok(None);
    }
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some('\0'), None) => Ok(None),
        (Some(c), None) => Ok(Some(c)),
        _ => Err(DialectError::QuoteCharLength {
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_dialect() {
        let dialect = Dialect::default();
        assert_eq!(dialect.separator(), ",");
        assert_eq!(dialect.quote(), Some('"'));
    }

    #[test]
    fn test_parse_quote_char() {
        assert_eq!(parse_quote_char("'"), Ok(Some('\'')));
        assert_eq!(parse_quote_char("\\x00"), Ok(None));
        assert_eq!(parse_quote_char("\0"), Ok(None));
        assert_eq!(parse_quote_char(""), Ok(None));
        assert!(matches!(
            parse_quote_char("''"),
            Err(DialectError::QuoteCharLength { .. })
        ));
    }

    #[test]
    fn test_rejects_empty_separator() {
        assert_eq!(Dialect::new("", None), Err(DialectError::EmptySeparator));
    }

    #[test]
    fn test_rejects_quote_inside_separator() {
        let result = Dialect::from_options("|'|", "'");
        assert!(matches!(
            result,
            Err(DialectError::QuoteInSeparator { quote: '\'', .. })
        ));
        assert!(Dialect::from_options("|'|", "\\x00").is_ok());
    }
}
