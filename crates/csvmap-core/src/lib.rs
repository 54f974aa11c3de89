//! CSV field mapping engine.
//!
//! Given one delimited line and a [`CsvConfig`], produces named fields with
//! optional type conversion, keeping one learned header per stream.
//!
//! # Column naming
//!
//! Position *i* of a data line is named, in order of preference, by:
//!
//! 1. the header learned from the first line of its stream (`contains_header`)
//! 2. the header detected from the first line overall (`autodetect_column_names`),
//!    or else the declared `columns`
//! 3. `column{i+1}` when `autogenerate_column_names` is on
//!
//! Positions without a name are dropped.
//!
//! # Example
//!
//! ```
//! use csvmap_core::{CsvConfig, FieldMapper, MapOutcome};
//!
//! let config = CsvConfig::default().with_contains_header(true);
//! let mapper = FieldMapper::new(&config).unwrap();
//! let attrs = [("path", "a.csv")];
//!
//! assert_eq!(mapper.map("name,age", &attrs), MapOutcome::HeaderConsumed);
//! let MapOutcome::Fields(fields) = mapper.map("bob,42", &attrs) else {
//!     unreachable!()
//! };
//! assert_eq!(fields.get("age").and_then(|v| v.as_str()), Some("42"));
//! ```

mod config;
mod convert;
mod error;
mod header;
mod mapper;
mod template;
mod value;

// === Error Types ===
pub use error::{ConfigError, Result};

// === Configuration ===
pub use config::{CsvConfig, DEFAULT_SOURCE};
pub use convert::{
    Conversion, parse_boolean, parse_date, parse_date_time, parse_float, parse_integer,
};

// === Mapping ===
pub use header::{HeaderTable, StreamHeader};
pub use mapper::{FieldMapper, MapOutcome, PARSE_FAILURE_TAG, SKIPPED_EMPTY_TAG};
pub use template::{Attributes, DEFAULT_STREAM_IDENTITY, NoAttributes, StreamTemplate};
pub use value::{FieldValue, Fields};

// === Parsing (re-exported for sinks) ===
pub use csvmap_parse::{Dialect, MalformedReason, ParseError};
