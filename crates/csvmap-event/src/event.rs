//! JSON events with tags, metadata, and cancellation.

use std::borrow::Cow;

use chrono::SecondsFormat;
use csvmap_core::{Attributes, FieldValue};
use serde_json::{Map, Number, Value};

use crate::error::EventError;
use crate::field_ref::FieldRef;

/// Name of the field holding an event's tags.
pub const TAGS_FIELD: &str = "tags";

/// One record flowing through the filter.
///
/// Data fields keep insertion order. `[@metadata]` fields live in a
/// separate map and are not part of [`Event::to_value`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Event {
    fields: Map<String, Value>,
    metadata: Map<String, Value>,
    cancelled: bool,
}

impl Event {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an event holding one `message` field.
    pub fn from_message(message: impl Into<String>) -> Self {
        let mut event = Self::new();
        event
            .fields
            .insert("message".to_string(), Value::String(message.into()));
        event
    }

    /// Parses a JSON object into an event.
    pub fn from_json_str(text: &str) -> Result<Self, EventError> {
        Self::try_from(serde_json::from_str::<Value>(text)?)
    }

    /// Returns the value at `field`.
    ///
    /// `[@metadata]` itself is not a value and yields `None`.
    pub fn get(&self, field: &FieldRef) -> Option<&Value> {
        let (root, path) = self.root(field);
        let (first, rest) = path.split_first()?;
        rest.iter()
            .try_fold(root.get(first)?, |value, segment| value.as_object()?.get(segment))
    }

    /// Sets the value at `field`, creating intermediate objects.
    ///
    /// Intermediate values that are not objects are replaced.
    pub fn set(&mut self, field: &FieldRef, value: Value) {
        let (root, path) = self.root_mut(field);
        let Some((last, parents)) = path.split_last() else {
            return;
        };

        let mut current = root;
        for segment in parents {
            let slot = current
                .entry(segment.clone())
                .or_insert_with(|| Value::Object(Map::new()));
            if !slot.is_object() {
                *slot = Value::Object(Map::new());
            }
            current = match slot {
                Value::Object(map) => map,
                _ => return,
            };
        }
        current.insert(last.clone(), value);
    }

    /// Removes and returns the value at `field`.
    pub fn remove(&mut self, field: &FieldRef) -> Option<Value> {
        let (root, path) = self.root_mut(field);
        let (last, parents) = path.split_last()?;
        let mut current = root;
        for segment in parents {
            current = current.get_mut(segment)?.as_object_mut()?;
        }
        current.shift_remove(last)
    }

    /// Adds `tag` to the `tags` field unless already present.
    pub fn tag(&mut self, tag: &str) {
        let slot = self
            .fields
            .entry(TAGS_FIELD.to_string())
            .or_insert_with(|| Value::Array(Vec::new()));
        match slot {
            Value::Array(tags) => {
                if !tags.iter().any(|t| t.as_str() == Some(tag)) {
                    tags.push(Value::String(tag.to_string()));
                }
            }
            null @ Value::Null => *null = Value::Array(vec![Value::String(tag.to_string())]),
            other => {
                let existing = std::mem::take(other);
                let mut tags = vec![existing];
                if tags[0].as_str() != Some(tag) {
                    tags.push(Value::String(tag.to_string()));
                }
                *other = Value::Array(tags);
            }
        }
    }

    /// Returns the event's tags.
    pub fn tags(&self) -> Vec<&str> {
        match self.fields.get(TAGS_FIELD) {
            Some(Value::Array(tags)) => tags.iter().filter_map(Value::as_str).collect(),
            Some(Value::String(tag)) => vec![tag.as_str()],
            _ => Vec::new(),
        }
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags().contains(&tag)
    }

    /// Marks the event as dropped.
    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn metadata(&self) -> &Map<String, Value> {
        &self.metadata
    }

    /// Returns the data fields as a JSON object.
    pub fn to_value(&self) -> Value {
        Value::Object(self.fields.clone())
    }

    fn root<'a, 'f>(&'a self, field: &'f FieldRef) -> (&'a Map<String, Value>, &'f [String]) {
        if field.is_metadata() {
            (&self.metadata, &field.segments()[1..])
        } else {
            (&self.fields, field.segments())
        }
    }

    fn root_mut<'a, 'f>(
        &'a mut self,
        field: &'f FieldRef,
    ) -> (&'a mut Map<String, Value>, &'f [String]) {
        if field.is_metadata() {
            (&mut self.metadata, &field.segments()[1..])
        } else {
            (&mut self.fields, field.segments())
        }
    }
}

impl From<Map<String, Value>> for Event {
    fn from(fields: Map<String, Value>) -> Self {
        Self {
            fields,
            ..Self::default()
        }
    }
}

impl TryFrom<Value> for Event {
    type Error = EventError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(fields) => Ok(Self::from(fields)),
            other => Err(EventError::NotAnObject {
                kind: json_kind(&other),
            }),
        }
    }
}

/// Placeholder names are field references, e.g. `%{[file][path]}`.
impl Attributes for Event {
    fn attribute(&self, name: &str) -> Option<Cow<'_, str>> {
        let field = FieldRef::parse(name).ok()?;
        match self.get(&field)? {
            Value::Null => None,
            Value::String(s) => Some(Cow::Borrowed(s.as_str())),
            Value::Array(items) => Some(Cow::Owned(
                items
                    .iter()
                    .map(|item| match item {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect::<Vec<_>>()
                    .join(","),
            )),
            other => Some(Cow::Owned(other.to_string())),
        }
    }
}

/// Converts a mapped value to JSON.
///
/// Timestamps become RFC 3339 UTC strings with millisecond precision.
/// Non-finite floats map to `null`.
pub fn field_value_to_json(value: FieldValue) -> Value {
    match value {
        FieldValue::String(s) => Value::String(s),
        FieldValue::Integer(i) => Value::Number(i.into()),
        FieldValue::Float(x) => Number::from_f64(x).map_or(Value::Null, Value::Number),
        FieldValue::Boolean(b) => Value::Bool(b),
        FieldValue::Timestamp(ts) => Value::String(ts.to_rfc3339_opts(SecondsFormat::Millis, true)),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn field(reference: &str) -> FieldRef {
        FieldRef::parse(reference).unwrap()
    }

    #[test]
    fn test_set_creates_nested_objects() {
        let mut event = Event::new();
        event.set(&field("[data][csv][column1]"), json!("a"));
        assert_eq!(event.to_value(), json!({"data": {"csv": {"column1": "a"}}}));
        assert_eq!(event.get(&field("[data][csv][column1]")), Some(&json!("a")));
    }

    #[test]
    fn test_set_replaces_non_object_parent() {
        let mut event = Event::from_json_str(r#"{"data": "scalar"}"#).unwrap();
        event.set(&field("[data][x]"), json!(1));
        assert_eq!(event.to_value(), json!({"data": {"x": 1}}));
    }

    #[test]
    fn test_metadata_is_separate() {
        let mut event = Event::from_message("a,b");
        event.set(&field("[@metadata][csv]"), json!("x"));
        assert_eq!(event.to_value(), json!({"message": "a,b"}));
        assert_eq!(event.get(&field("[@metadata][csv]")), Some(&json!("x")));
        assert_eq!(event.get(&field("[@metadata]")), None);
    }

    #[test]
    fn test_remove() {
        let mut event = Event::from_json_str(r#"{"a": {"b": 1, "c": 2}}"#).unwrap();
        assert_eq!(event.remove(&field("[a][b]")), Some(json!(1)));
        assert_eq!(event.remove(&field("[a][missing]")), None);
        assert_eq!(event.to_value(), json!({"a": {"c": 2}}));
    }

    #[test]
    fn test_tags_deduplicate() {
        let mut event = Event::new();
        event.tag("_csvparsefailure");
        event.tag("_csvparsefailure");
        assert_eq!(event.tags(), vec!["_csvparsefailure"]);
    }

    #[test]
    fn test_tag_promotes_string_tags() {
        let mut event = Event::from_json_str(r#"{"tags": "existing"}"#).unwrap();
        event.tag("new");
        assert_eq!(event.to_value(), json!({"tags": ["existing", "new"]}));
    }

    #[test]
    fn test_non_object_json_rejected() {
        assert!(matches!(
            Event::from_json_str("[1, 2]"),
            Err(EventError::NotAnObject { kind: "array" })
        ));
    }

    #[test]
    fn test_attributes_render() {
        let event = Event::from_json_str(
            r#"{"host": "web1", "port": 8080, "list": ["a", 1], "file": {"path": "/x.csv"}, "n": null}"#,
        )
        .unwrap();
        assert_eq!(event.attribute("host").as_deref(), Some("web1"));
        assert_eq!(event.attribute("port").as_deref(), Some("8080"));
        assert_eq!(event.attribute("list").as_deref(), Some("a,1"));
        assert_eq!(event.attribute("[file][path]").as_deref(), Some("/x.csv"));
        assert_eq!(event.attribute("n"), None);
        assert_eq!(event.attribute("missing"), None);
    }

    #[test]
    fn test_field_value_to_json() {
        assert_eq!(field_value_to_json(FieldValue::Integer(3)), json!(3));
        assert_eq!(field_value_to_json(FieldValue::Float(1.5)), json!(1.5));
        assert_eq!(field_value_to_json(FieldValue::Boolean(false)), json!(false));
        assert_eq!(field_value_to_json(FieldValue::from("x")), json!("x"));
    }
}
