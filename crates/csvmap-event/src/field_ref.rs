//! Field references: `name`, `[name]`, `[outer][inner]`.

use std::fmt;
use std::str::FromStr;

use crate::error::FieldRefError;

/// Root segment addressing event metadata instead of event data.
pub const METADATA_ROOT: &str = "@metadata";

/// A path into an event.
///
/// A bare name is a single top-level segment and is taken literally, so
/// `a.b` names one field called `a.b`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldRef {
    segments: Vec<String>,
}

impl FieldRef {
    /// Parses a reference, rejecting unbalanced or empty brackets.
    pub fn parse(reference: &str) -> Result<Self, FieldRefError> {
        if reference.is_empty() {
            return Err(FieldRefError::Empty);
        }

        let syntax = |reason| FieldRefError::Syntax {
            reference: reference.to_string(),
            reason,
        };

        if !reference.starts_with('[') {
            if reference.contains(['[', ']']) {
                return Err(syntax("brackets inside a bare field name"));
            }
            return Ok(Self::top_level(reference));
        }

        let mut segments = Vec::new();
        let mut rest = reference;
        while !rest.is_empty() {
            let Some(inner) = rest.strip_prefix('[') else {
                return Err(syntax("text outside brackets"));
            };
            let Some(end) = inner.find(']') else {
                return Err(syntax("missing closing bracket"));
            };
            let name = &inner[..end];
            if name.is_empty() {
                return Err(syntax("empty segment"));
            }
            if name.contains('[') {
                return Err(syntax("nested opening bracket"));
            }
            segments.push(name.to_string());
            rest = &inner[end + 1..];
        }

        Ok(Self { segments })
    }

    /// A single top-level field, taken literally.
    pub fn top_level(name: impl Into<String>) -> Self {
        Self {
            segments: vec![name.into()],
        }
    }

    /// Returns this reference extended by one segment.
    #[must_use]
    pub fn child(&self, name: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(name.into());
        Self { segments }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Returns true if the reference points into `[@metadata]`.
    pub fn is_metadata(&self) -> bool {
        self.segments.first().is_some_and(|s| s == METADATA_ROOT)
    }
}

impl FromStr for FieldRef {
    type Err = FieldRefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for FieldRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            write!(f, "[{segment}]")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segments(reference: &str) -> Vec<String> {
        FieldRef::parse(reference).unwrap().segments().to_vec()
    }

    #[test]
    fn test_parse_bare_and_bracketed() {
        assert_eq!(segments("message"), vec!["message"]);
        assert_eq!(segments("[message]"), vec!["message"]);
        assert_eq!(segments("[a][b][c]"), vec!["a", "b", "c"]);
        assert_eq!(segments("a.b"), vec!["a.b"]);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(FieldRef::parse(""), Err(FieldRefError::Empty));
        assert!(FieldRef::parse("[a").is_err());
        assert!(FieldRef::parse("[a]b").is_err());
        assert!(FieldRef::parse("[]").is_err());
        assert!(FieldRef::parse("a[b]").is_err());
        assert!(FieldRef::parse("[a[b]]").is_err());
    }

    #[test]
    fn test_metadata_and_display() {
        let field = FieldRef::parse("[@metadata][csv]").unwrap();
        assert!(field.is_metadata());
        assert_eq!(field.child("column1").to_string(), "[@metadata][csv][column1]");
        assert!(!FieldRef::top_level("@metadata_x").is_metadata());
    }
}
