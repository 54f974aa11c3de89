//! Stream identity templates (`%{name}` placeholder substitution).

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

/// Default stream identity template.
pub const DEFAULT_STREAM_IDENTITY: &str = "%{host}.%{path}.%{type}";

/// Contextual attributes of a record, looked up by placeholder name.
pub trait Attributes {
    /// Returns the rendered attribute value, or `None` when absent.
    fn attribute(&self, name: &str) -> Option<Cow<'_, str>>;
}

impl<S: BuildHasher> Attributes for HashMap<String, String, S> {
    fn attribute(&self, name: &str) -> Option<Cow<'_, str>> {
        self.get(name).map(|v| Cow::Borrowed(v.as_str()))
    }
}

impl Attributes for BTreeMap<String, String> {
    fn attribute(&self, name: &str) -> Option<Cow<'_, str>> {
        self.get(name).map(|v| Cow::Borrowed(v.as_str()))
    }
}

impl Attributes for [(&str, &str)] {
    fn attribute(&self, name: &str) -> Option<Cow<'_, str>> {
        self.iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| Cow::Borrowed(*v))
    }
}

impl<const N: usize> Attributes for [(&str, &str); N] {
    fn attribute(&self, name: &str) -> Option<Cow<'_, str>> {
        self.as_slice().attribute(name)
    }
}

/// An attribute set with nothing in it.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAttributes;

impl Attributes for NoAttributes {
    fn attribute(&self, _name: &str) -> Option<Cow<'_, str>> {
        None
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Placeholder(String),
}

/// A pre-parsed `%{name}` template.
///
/// Substituted values are never re-scanned for placeholders. An opening
/// `%{` without a closing brace is kept as literal text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamTemplate {
    source: String,
    segments: Vec<Segment>,
}

impl StreamTemplate {
    pub fn parse(template: &str) -> Self {
        let mut segments = Vec::new();
        let mut rest = template;

        while let Some(start) = rest.find("%{") {
            let after_open = &rest[start + 2..];
            let Some(end) = after_open.find('}') else {
                break;
            };
            if start > 0 {
                segments.push(Segment::Literal(rest[..start].to_string()));
            }
            segments.push(Segment::Placeholder(after_open[..end].to_string()));
            rest = &after_open[end + 1..];
        }
        if !rest.is_empty() {
            segments.push(Segment::Literal(rest.to_string()));
        }

        Self {
            source: template.to_string(),
            segments,
        }
    }

    /// Returns the template text as configured.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Renders the template; unresolved placeholders become empty strings.
    pub fn render<A: Attributes + ?Sized>(&self, attributes: &A) -> String {
        let mut out = String::with_capacity(self.source.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Placeholder(name) => {
                    if let Some(value) = attributes.attribute(name) {
                        out.push_str(&value);
                    }
                }
            }
        }
        out
    }
}

impl Default for StreamTemplate {
    fn default() -> Self {
        Self::parse(DEFAULT_STREAM_IDENTITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_default_template() {
        let template = StreamTemplate::default();
        let attrs = [("host", "web1"), ("path", "/var/log/a.csv"), ("type", "csv")];
        assert_eq!(template.render(&attrs), "web1./var/log/a.csv.csv");
    }

    #[test]
    fn test_render_missing_placeholders_are_empty() {
        let template = StreamTemplate::default();
        assert_eq!(template.render(&[("path", "doc1")]), ".doc1.");
        assert_eq!(template.render(&NoAttributes), "..");
    }

    #[test]
    fn test_render_does_not_recurse() {
        let template = StreamTemplate::parse("%{a}");
        assert_eq!(template.render(&[("a", "%{b}"), ("b", "x")]), "%{b}");
    }

    #[test]
    fn test_unclosed_placeholder_is_literal() {
        let template = StreamTemplate::parse("id-%{name");
        assert_eq!(template.render(&[("name", "x")]), "id-%{name");
    }

    #[test]
    fn test_render_with_hash_map() {
        let mut attrs = HashMap::new();
        attrs.insert("identity".to_string(), "doc2".to_string());
        assert_eq!(StreamTemplate::parse("%{identity}").render(&attrs), "doc2");
    }
}
