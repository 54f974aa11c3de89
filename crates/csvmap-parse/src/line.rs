//! Splitting a single delimited line into raw field values.

use crate::dialect::Dialect;
use crate::error::{MalformedReason, ParseError, Result};

/// Removes one trailing `\n` or `\r\n`.
pub fn strip_line_terminator(line: &str) -> &str {
    line.strip_suffix("\r\n")
        .or_else(|| line.strip_suffix('\n'))
        .unwrap_or(line)
}

/// Returns true if the line holds no characters besides its terminator.
///
/// Whitespace-only lines are not empty.
pub fn is_empty_line(line: &str) -> bool {
    strip_line_terminator(line).is_empty()
}

/// Parses a line into fields according to `dialect`.
///
/// An empty line yields one empty field. Quoted fields may contain the
/// separator, line breaks and doubled quote characters.
pub fn parse_line(line: &str, dialect: &Dialect) -> Result<Vec<String>> {
    let body = strip_line_terminator(line);
    let mut fields = Vec::new();
    let mut pos = 0;

    loop {
        let (field, next) = match dialect.quote() {
            Some(quote) if body[pos..].starts_with(quote) => {
                read_quoted(line, body, pos, quote, dialect.separator())?
            }
            _ => read_unquoted(line, body, pos, dialect)?,
        };
        fields.push(field);
        match next {
            Some(next) => pos = next,
            None => break,
        }
    }

    Ok(fields)
}

/// Reads an unquoted field starting at `start`.
///
/// Returns the field and the offset of the following field, if any.
fn read_unquoted(
    line: &str,
    body: &str,
    start: usize,
    dialect: &Dialect,
) -> Result<(String, Option<usize>)> {
    let separator = dialect.separator();
    let (end, next) = match body[start..].find(separator) {
        Some(idx) => (start + idx, Some(start + idx + separator.len())),
        None => (body.len(), None),
    };
    let field = &body[start..end];

    for (idx, c) in field.char_indices() {
        let reason = if Some(c) == dialect.quote() {
            MalformedReason::StrayQuote
        } else if c == '\r' || c == '\n' {
            MalformedReason::BareLineBreak
        } else {
            continue;
        };
        return Err(malformed(line, start + idx, reason));
    }

    Ok((field.to_string(), next))
}

/// Reads a quoted field whose opening quote sits at `start`.
fn read_quoted(
    line: &str,
    body: &str,
    start: usize,
    quote: char,
    separator: &str,
) -> Result<(String, Option<usize>)> {
    let quote_len = quote.len_utf8();
    let mut field = String::new();
    let mut cursor = start + quote_len;

    loop {
        let Some(idx) = body[cursor..].find(quote) else {
            return Err(malformed(line, start, MalformedReason::UnterminatedQuote));
        };
        let closing = cursor + idx;
        field.push_str(&body[cursor..closing]);
        let after = closing + quote_len;

        // Doubled quote is an escaped literal quote
        if body[after..].starts_with(quote) {
            field.push(quote);
            cursor = after + quote_len;
            continue;
        }

        if after == body.len() {
            return Ok((field, None));
        }
        if body[after..].starts_with(separator) {
            return Ok((field, Some(after + separator.len())));
        }
        return Err(malformed(line, after, MalformedReason::TrailingAfterQuote));
    }
}

fn malformed(line: &str, offset: usize, reason: MalformedReason) -> ParseError {
    ParseError::MalformedRecord {
        line: line.to_string(),
        offset,
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dialect(separator: &str, quote: Option<char>) -> Dialect {
        Dialect::new(separator, quote).unwrap()
    }

    #[test]
    fn test_parse_simple() {
        let result = parse_line("a,b,c", &Dialect::default()).unwrap();
        assert_eq!(result, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_parse_quoted_separator() {
        let result = parse_line("big,bird,\"sesame, street\"", &Dialect::default()).unwrap();
        assert_eq!(result, vec!["big", "bird", "sesame, street"]);
    }

    #[test]
    fn test_parse_escaped_quotes() {
        let result = parse_line("\"he said \"\"hello\"\"\",b", &Dialect::default()).unwrap();
        assert_eq!(result, vec!["he said \"hello\"", "b"]);
    }

    #[test]
    fn test_parse_keeps_whitespace() {
        let result = parse_line("  a  ,  b  ", &Dialect::default()).unwrap();
        assert_eq!(result, vec!["  a  ", "  b  "]);
    }

    #[test]
    fn test_parse_empty_fields() {
        let result = parse_line("v1,,v3,", &Dialect::default()).unwrap();
        assert_eq!(result, vec!["v1", "", "v3", ""]);
    }

    #[test]
    fn test_parse_empty_line() {
        assert_eq!(parse_line("", &Dialect::default()).unwrap(), vec![""]);
        assert_eq!(parse_line("\n", &Dialect::default()).unwrap(), vec![""]);
    }

    #[test]
    fn test_parse_strips_one_terminator() {
        let result = parse_line("a,b\r\n", &Dialect::default()).unwrap();
        assert_eq!(result, vec!["a", "b"]);
    }

    #[test]
    fn test_parse_multichar_separator() {
        let result = parse_line("a||b||\"c||d\"", &dialect("||", Some('"'))).unwrap();
        assert_eq!(result, vec!["a", "b", "c||d"]);
    }

    #[test]
    fn test_parse_disabled_quoting() {
        let result = parse_line("a,b,\"c\" d", &dialect(",", None)).unwrap();
        assert_eq!(result, vec!["a", "b", "\"c\" d"]);
    }

    #[test]
    fn test_parse_unterminated_quote() {
        let err = parse_line("a,\"b,c", &Dialect::default()).unwrap_err();
        assert_eq!(
            err,
            ParseError::MalformedRecord {
                line: "a,\"b,c".to_string(),
                offset: 2,
                reason: MalformedReason::UnterminatedQuote,
            }
        );
    }

    #[test]
    fn test_parse_stray_quote() {
        let err = parse_line("a,b\"c", &Dialect::default()).unwrap_err();
        assert_eq!(err.reason(), MalformedReason::StrayQuote);
    }

    #[test]
    fn test_parse_text_after_closing_quote() {
        let err = parse_line("big,bird,\"sesame\" street", &Dialect::default()).unwrap_err();
        assert_eq!(err.reason(), MalformedReason::TrailingAfterQuote);
    }

    #[test]
    fn test_is_empty_line() {
        assert!(is_empty_line(""));
        assert!(is_empty_line("\r\n"));
        assert!(!is_empty_line(" "));
    }
}
