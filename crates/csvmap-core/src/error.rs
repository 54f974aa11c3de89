//! Error types for mapper construction.

use std::path::PathBuf;

use csvmap_parse::DialectError;
use thiserror::Error;

/// Errors that abort construction of a [`FieldMapper`](crate::FieldMapper).
///
/// Record-level problems never surface here; they are reported through
/// [`MapOutcome`](crate::MapOutcome).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// One or more `convert` entries name an unknown type.
    #[error("invalid conversion types: {}", .types.join(", "))]
    InvalidConversions { types: Vec<String> },

    /// Separator or quote character cannot be used.
    #[error(transparent)]
    Dialect(#[from] DialectError),

    /// Configuration file could not be read.
    #[error("failed to read configuration {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration text is not valid TOML for this schema.
    #[error("failed to parse configuration: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ConfigError::InvalidConversions {
            types: vec!["wrong_type".to_string(), "money".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "invalid conversion types: wrong_type, money"
        );
    }

    #[test]
    fn test_error_from_dialect() {
        let err: ConfigError = DialectError::EmptySeparator.into();
        assert!(matches!(err, ConfigError::Dialect(_)));
        assert_eq!(err.to_string(), "separator must not be empty");
    }
}
