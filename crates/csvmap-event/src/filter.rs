//! Applying the field mapper to events.

use csvmap_core::{
    CsvConfig, FieldMapper, MapOutcome, PARSE_FAILURE_TAG, SKIPPED_EMPTY_TAG,
};
use serde_json::Value;

use crate::error::FilterError;
use crate::event::{Event, field_value_to_json};
use crate::field_ref::FieldRef;

/// What happened to one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOutcome {
    /// Fields were written into the event.
    Mapped { fields: usize },
    /// The line was a header; the event was cancelled.
    HeaderConsumed,
    /// The line was empty; the event was tagged and kept.
    SkippedEmptyRow,
    /// The line could not be parsed; the event was tagged and kept.
    ParseFailure,
    /// The event has no source field; it was left untouched.
    NoSource,
    /// The source field is not a single string; it was left untouched.
    SourceShape,
}

/// Reads a raw line from an event, maps it, and writes the result back.
#[derive(Debug)]
pub struct CsvFilter {
    mapper: FieldMapper,
    source: FieldRef,
    target: Option<FieldRef>,
}

impl CsvFilter {
    pub fn new(config: &CsvConfig) -> Result<Self, FilterError> {
        let mapper = FieldMapper::new(config)?;
        let source = FieldRef::parse(&config.source).map_err(|source| FilterError::FieldRef {
            option: "source",
            source,
        })?;
        let target = config
            .target
            .as_deref()
            .map(FieldRef::parse)
            .transpose()
            .map_err(|source| FilterError::FieldRef {
                option: "target",
                source,
            })?;

        Ok(Self {
            mapper,
            source,
            target,
        })
    }

    pub fn mapper(&self) -> &FieldMapper {
        &self.mapper
    }

    /// Runs the filter on one event.
    pub fn filter(&self, event: &mut Event) -> FilterOutcome {
        let raw = match self.source_line(event) {
            Ok(Some(raw)) => raw,
            Ok(None) => return FilterOutcome::NoSource,
            Err(kind) => {
                tracing::warn!(
                    source = %self.source,
                    kind,
                    "csv filter only works on a single string value"
                );
                return FilterOutcome::SourceShape;
            }
        };

        let outcome = match self.mapper.map(&raw, &*event) {
            MapOutcome::Fields(fields) => {
                let count = fields.len();
                for (name, value) in fields {
                    let field = match &self.target {
                        Some(target) => target.child(name),
                        None => FieldRef::top_level(name),
                    };
                    event.set(&field, field_value_to_json(value));
                }
                FilterOutcome::Mapped { fields: count }
            }
            MapOutcome::HeaderConsumed => {
                event.cancel();
                FilterOutcome::HeaderConsumed
            }
            MapOutcome::SkippedEmptyRow => {
                event.tag(SKIPPED_EMPTY_TAG);
                FilterOutcome::SkippedEmptyRow
            }
            MapOutcome::Failure(err) => {
                event.tag(PARSE_FAILURE_TAG);
                tracing::warn!(
                    source = %self.source,
                    raw = %err.line(),
                    error = %err,
                    "Error parsing csv"
                );
                FilterOutcome::ParseFailure
            }
        };

        tracing::debug!(outcome = ?outcome, "Event after csv filter");
        outcome
    }

    /// Extracts the raw line, unwrapping a single-entry array.
    ///
    /// Returns the offending JSON kind when the source has another shape.
    fn source_line(&self, event: &Event) -> Result<Option<String>, &'static str> {
        match event.get(&self.source) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(raw)) => Ok(Some(raw.clone())),
            Some(Value::Array(items)) => match items.as_slice() {
                [Value::String(raw)] => Ok(Some(raw.clone())),
                [] => Err("empty array"),
                [_] => Err("array of non-string"),
                _ => Err("array with more than one value"),
            },
            Some(Value::Object(_)) => Err("object"),
            Some(_) => Err("scalar"),
        }
    }
}
