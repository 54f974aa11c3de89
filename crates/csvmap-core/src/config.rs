//! Filter configuration.

use std::collections::BTreeMap;
use std::path::Path;

use csvmap_parse::{DEFAULT_SEPARATOR, Dialect};
use serde::{Deserialize, Serialize};

use crate::convert::Conversion;
use crate::error::{ConfigError, Result};
use crate::template::DEFAULT_STREAM_IDENTITY;

/// Default name of the field holding the raw line.
pub const DEFAULT_SOURCE: &str = "message";

/// User-facing configuration, as read from a TOML file.
///
/// Every option has a default, so an empty file is a valid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CsvConfig {
    /// Field read as the raw line.
    pub source: String,
    /// Declared column names, in order.
    pub columns: Vec<String>,
    /// First line of each stream is a header.
    pub contains_header: bool,
    /// First line of the process is a header.
    pub autodetect_column_names: bool,
    /// Name unresolved positions `column1`, `column2`, ...
    pub autogenerate_column_names: bool,
    /// Consume header lines without keeping their names.
    pub skip_header: bool,
    /// Drop positions whose value is empty.
    pub skip_empty_columns: bool,
    /// Tag wholly empty lines instead of mapping them.
    pub skip_empty_rows: bool,
    /// Template identifying the stream a record belongs to.
    pub stream_identity: String,
    pub separator: String,
    /// Quote character; empty or `\x00` disables quoting.
    pub quote_char: String,
    /// Field path under which mapped fields are placed.
    pub target: Option<String>,
    /// Column name to conversion type.
    pub convert: BTreeMap<String, String>,
}

impl Default for CsvConfig {
    fn default() -> Self {
        Self {
            source: DEFAULT_SOURCE.to_string(),
            columns: Vec::new(),
            contains_header: false,
            autodetect_column_names: false,
            autogenerate_column_names: true,
            skip_header: false,
            skip_empty_columns: false,
            skip_empty_rows: false,
            stream_identity: DEFAULT_STREAM_IDENTITY.to_string(),
            separator: DEFAULT_SEPARATOR.to_string(),
            quote_char: "\"".to_string(),
            target: None,
            convert: BTreeMap::new(),
        }
    }
}

impl CsvConfig {
    /// Parses a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Reads and parses a TOML configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    #[must_use]
    pub fn with_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_contains_header(mut self, enable: bool) -> Self {
        self.contains_header = enable;
        self
    }

    #[must_use]
    pub fn with_autodetect_column_names(mut self, enable: bool) -> Self {
        self.autodetect_column_names = enable;
        self
    }

    #[must_use]
    pub fn with_autogenerate_column_names(mut self, enable: bool) -> Self {
        self.autogenerate_column_names = enable;
        self
    }

    #[must_use]
    pub fn with_skip_header(mut self, enable: bool) -> Self {
        self.skip_header = enable;
        self
    }

    #[must_use]
    pub fn with_skip_empty_columns(mut self, enable: bool) -> Self {
        self.skip_empty_columns = enable;
        self
    }

    #[must_use]
    pub fn with_skip_empty_rows(mut self, enable: bool) -> Self {
        self.skip_empty_rows = enable;
        self
    }

    #[must_use]
    pub fn with_stream_identity(mut self, template: impl Into<String>) -> Self {
        self.stream_identity = template.into();
        self
    }

    #[must_use]
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    #[must_use]
    pub fn with_quote_char(mut self, quote_char: impl Into<String>) -> Self {
        self.quote_char = quote_char.into();
        self
    }

    #[must_use]
    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    /// Adds a conversion for one column.
    #[must_use]
    pub fn with_convert(mut self, column: impl Into<String>, kind: impl Into<String>) -> Self {
        self.convert.insert(column.into(), kind.into());
        self
    }

    /// Builds the dialect described by `separator` and `quote_char`.
    pub fn dialect(&self) -> Result<Dialect> {
        Ok(Dialect::from_options(&self.separator, &self.quote_char)?)
    }

    /// Resolves the `convert` table, reporting every unknown type at once.
    pub fn conversions(&self) -> Result<BTreeMap<String, Conversion>> {
        let mut resolved = BTreeMap::new();
        let mut bad_types: Vec<String> = Vec::new();

        for (column, kind) in &self.convert {
            match kind.parse::<Conversion>() {
                Ok(conversion) => {
                    resolved.insert(column.clone(), conversion);
                }
                Err(_) => {
                    if !bad_types.contains(kind) {
                        bad_types.push(kind.clone());
                    }
                }
            }
        }

        if !bad_types.is_empty() {
            return Err(ConfigError::InvalidConversions { types: bad_types });
        }
        Ok(resolved)
    }
}
