//! Line to named-field mapping.

use std::borrow::Cow;
use std::collections::BTreeMap;

use csvmap_parse::{Dialect, ParseError, is_empty_line, parse_line};

use crate::config::CsvConfig;
use crate::convert::Conversion;
use crate::error::Result;
use crate::header::{HeaderRules, HeaderTable, HeaderView, Observation};
use crate::template::{Attributes, StreamTemplate};
use crate::value::{FieldValue, Fields};

/// Tag applied to records whose line could not be parsed.
pub const PARSE_FAILURE_TAG: &str = "_csvparsefailure";

/// Tag applied to empty lines skipped under `skip_empty_rows`.
pub const SKIPPED_EMPTY_TAG: &str = "_csvskippedemptyfield";

/// Result of mapping one line.
#[derive(Debug, Clone, PartialEq)]
pub enum MapOutcome {
    /// Named fields in column order.
    Fields(Fields),
    /// The line was a header; nothing is emitted and nothing is tagged.
    HeaderConsumed,
    /// The line was empty and `skip_empty_rows` is on. The record is kept
    /// and tagged with [`SKIPPED_EMPTY_TAG`].
    SkippedEmptyRow,
    /// The line could not be parsed. The record is tagged with
    /// [`PARSE_FAILURE_TAG`].
    Failure(ParseError),
}

/// Boolean switches copied out of [`CsvConfig`].
#[derive(Debug, Clone, Copy)]
struct MapperOptions {
    contains_header: bool,
    autodetect_column_names: bool,
    autogenerate_column_names: bool,
    skip_header: bool,
    skip_empty_columns: bool,
    skip_empty_rows: bool,
}

impl From<&CsvConfig> for MapperOptions {
    fn from(config: &CsvConfig) -> Self {
        Self {
            contains_header: config.contains_header,
            autodetect_column_names: config.autodetect_column_names,
            autogenerate_column_names: config.autogenerate_column_names,
            skip_header: config.skip_header,
            skip_empty_columns: config.skip_empty_columns,
            skip_empty_rows: config.skip_empty_rows,
        }
    }
}

/// Maps raw lines to named, typed fields.
///
/// The only mutable state is the [`HeaderTable`], so one mapper can be
/// shared across threads behind an `Arc`.
#[derive(Debug)]
pub struct FieldMapper {
    dialect: Dialect,
    columns: Vec<String>,
    template: StreamTemplate,
    conversions: BTreeMap<String, Conversion>,
    options: MapperOptions,
    headers: HeaderTable,
}

impl FieldMapper {
    /// Builds a mapper, validating dialect and conversions up front.
    pub fn new(config: &CsvConfig) -> Result<Self> {
        let dialect = config.dialect()?;
        let conversions = config.conversions()?;

        tracing::info!(
            separator = %dialect.separator(),
            quote_char = ?dialect.quote(),
            columns = config.columns.len(),
            conversions = conversions.len(),
            "CSV parsing options"
        );

        Ok(Self {
            dialect,
            columns: config.columns.clone(),
            template: StreamTemplate::parse(&config.stream_identity),
            conversions,
            options: MapperOptions::from(config),
            headers: HeaderTable::new(),
        })
    }

    pub fn dialect(&self) -> &Dialect {
        &self.dialect
    }

    /// Returns the header state learned so far.
    pub fn headers(&self) -> &HeaderTable {
        &self.headers
    }

    /// Renders the stream key for a record's attributes.
    pub fn stream_key<A: Attributes + ?Sized>(&self, attributes: &A) -> String {
        self.template.render(attributes)
    }

    /// Maps one raw line.
    pub fn map<A: Attributes + ?Sized>(&self, line: &str, attributes: &A) -> MapOutcome {
        if self.options.skip_empty_rows && is_empty_line(line) {
            return MapOutcome::SkippedEmptyRow;
        }

        let stream_key = self.stream_key(attributes);

        let row = match parse_line(line, &self.dialect) {
            Ok(row) => row,
            Err(err) => return MapOutcome::Failure(err),
        };

        let rules = HeaderRules {
            per_stream: self.options.contains_header,
            cache_per_stream: !self.options.skip_header,
            autodetect: self.options.autodetect_column_names,
        };
        let view = match self.headers.observe(&stream_key, &row, rules) {
            Observation::Consumed => return MapOutcome::HeaderConsumed,
            Observation::Data(view) => view,
        };

        let default_header = view.detected.as_deref().unwrap_or(self.columns.as_slice());
        if self.options.skip_header && !default_header.is_empty() && row == default_header {
            tracing::trace!(stream = %stream_key, "Skipping repeated header line");
            return MapOutcome::HeaderConsumed;
        }

        MapOutcome::Fields(self.build_fields(row, &view, default_header))
    }

    fn build_fields(&self, row: Vec<String>, view: &HeaderView, default_header: &[String]) -> Fields {
        let mut fields = Fields::with_capacity(row.len());

        for (idx, raw) in row.into_iter().enumerate() {
            if self.options.skip_empty_columns && raw.is_empty() {
                continue;
            }
            let Some(name) = self.column_name(idx, view, default_header) else {
                continue;
            };
            let value = match self.conversions.get(name.as_ref()) {
                Some(conversion) => conversion.apply(raw),
                None => FieldValue::String(raw),
            };
            fields.push(name, value);
        }

        fields
    }

    /// Resolves the name of position `idx`: stream header, then default
    /// header, then `column{idx + 1}` when autogeneration is on.
    fn column_name<'a>(
        &self,
        idx: usize,
        view: &'a HeaderView,
        default_header: &'a [String],
    ) -> Option<Cow<'a, str>> {
        view.stream
            .as_deref()
            .and_then(|names| names.get(idx))
            .or_else(|| default_header.get(idx))
            .map(|name| Cow::Borrowed(name.as_str()))
            .or_else(|| {
                self.options
                    .autogenerate_column_names
                    .then(|| Cow::Owned(format!("column{}", idx + 1)))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::NoAttributes;

    fn fields(outcome: MapOutcome) -> Fields {
        match outcome {
            MapOutcome::Fields(fields) => fields,
            other => panic!("expected fields, got {other:?}"),
        }
    }

    #[test]
    fn test_default_config_autogenerates_names() {
        let mapper = FieldMapper::new(&CsvConfig::default()).unwrap();
        let expected: Fields = [("column1", "a"), ("column2", "b"), ("column3", "c")]
            .into_iter()
            .collect();
        assert_eq!(fields(mapper.map("a,b,c", &NoAttributes)), expected);
    }

    #[test]
    fn test_declared_then_generated_names() {
        let config = CsvConfig::default().with_columns(["custom1", "custom2"]);
        let mapper = FieldMapper::new(&config).unwrap();
        let names: Vec<String> = fields(mapper.map("val1,val2,val3", &NoAttributes))
            .names()
            .map(String::from)
            .collect();
        assert_eq!(names, vec!["custom1", "custom2", "column3"]);
    }

    #[test]
    fn test_parse_failure_is_reported() {
        let mapper = FieldMapper::new(&CsvConfig::default()).unwrap();
        assert!(matches!(
            mapper.map("a,\"b", &NoAttributes),
            MapOutcome::Failure(ParseError::MalformedRecord { .. })
        ));
    }

    #[test]
    fn test_empty_line_without_skip_maps_one_field() {
        let mapper = FieldMapper::new(&CsvConfig::default()).unwrap();
        let expected: Fields = [("column1", "")].into_iter().collect();
        assert_eq!(fields(mapper.map("", &NoAttributes)), expected);
    }

    #[test]
    fn test_mapper_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<FieldMapper>();
    }
}
