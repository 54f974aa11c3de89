//! Event model and CSV filter.
//!
//! Wraps [`csvmap_core::FieldMapper`] for JSON events: reads the raw line
//! from the configured source field, writes mapped fields at the top level
//! or under a target path, and applies the tag contract:
//!
//! - `_csvparsefailure` when the line cannot be parsed
//! - `_csvskippedemptyfield` when an empty line is skipped (the event is kept)
//!
//! Header lines cancel their event.
//!
//! # Example
//!
//! ```
//! use csvmap_core::CsvConfig;
//! use csvmap_event::{CsvFilter, Event};
//!
//! let filter = CsvFilter::new(&CsvConfig::default().with_target("data")).unwrap();
//! let mut event = Event::from_message("big,bird");
//! filter.filter(&mut event);
//! assert_eq!(
//!     event.to_value()["data"]["column2"],
//!     serde_json::json!("bird")
//! );
//! ```

mod error;
mod event;
mod field_ref;
mod filter;

// === Error Types ===
pub use error::{EventError, FieldRefError, FilterError};

// === Events ===
pub use event::{Event, TAGS_FIELD, field_value_to_json};
pub use field_ref::{FieldRef, METADATA_ROOT};

// === Filter ===
pub use filter::{CsvFilter, FilterOutcome};
