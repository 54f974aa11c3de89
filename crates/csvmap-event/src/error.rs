//! Error types for events and the CSV filter.

use csvmap_core::ConfigError;
use thiserror::Error;

/// Errors raised when a field reference cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldRefError {
    #[error("field reference is empty")]
    Empty,

    #[error("invalid field reference {reference:?}: {reason}")]
    Syntax {
        reference: String,
        reason: &'static str,
    },
}

/// Errors raised while building a [`CsvFilter`](crate::CsvFilter).
#[derive(Debug, Error)]
pub enum FilterError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("invalid {option} option: {source}")]
    FieldRef {
        option: &'static str,
        #[source]
        source: FieldRefError,
    },
}

/// Errors raised when building an [`Event`](crate::Event) from JSON.
#[derive(Debug, Error)]
pub enum EventError {
    #[error("event must be a JSON object, got {kind}")]
    NotAnObject { kind: &'static str },

    #[error("invalid JSON event: {0}")]
    Json(#[from] serde_json::Error),
}
