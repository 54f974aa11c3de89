//! Per-stream header state.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// What the table holds for one stream key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamHeader {
    /// Header names learned from the stream's first line.
    Cached(Arc<[String]>),
    /// The first line was consumed without keeping its names.
    Skipped,
}

impl StreamHeader {
    /// Returns the cached names, if any.
    pub fn names(&self) -> Option<&[String]> {
        match self {
            Self::Cached(names) => Some(names),
            Self::Skipped => None,
        }
    }
}

/// Which header rules apply to an observed line.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct HeaderRules {
    /// First line of every stream is a header.
    pub per_stream: bool,
    /// Keep the names of per-stream headers.
    pub cache_per_stream: bool,
    /// First line of the whole process is the default header.
    pub autodetect: bool,
}

/// Header names visible to one data line.
#[derive(Debug, Clone, Default)]
pub(crate) struct HeaderView {
    pub stream: Option<Arc<[String]>>,
    pub detected: Option<Arc<[String]>>,
}

/// Result of offering a parsed line to the table.
#[derive(Debug)]
pub(crate) enum Observation {
    /// The line was taken as a header and must not be emitted.
    Consumed,
    /// The line is data; resolve its names against this view.
    Data(HeaderView),
}

#[derive(Debug, Default)]
struct HeaderState {
    streams: HashMap<String, StreamHeader>,
    detected: Option<Arc<[String]>>,
}

/// Stream key to header mapping, plus the process-wide detected header.
///
/// An entry is written once, the first time its stream produces a header
/// line, and is never replaced. All access goes through one mutex so a
/// check-then-insert cannot race with another caller for the same key.
#[derive(Debug, Default)]
pub struct HeaderTable {
    state: Mutex<HeaderState>,
}

impl HeaderTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the entry recorded for `stream_key`.
    pub fn get(&self, stream_key: &str) -> Option<StreamHeader> {
        self.lock().streams.get(stream_key).cloned()
    }

    /// Returns the header detected from the first line of the process.
    pub fn detected(&self) -> Option<Vec<String>> {
        self.lock().detected.as_deref().map(<[String]>::to_vec)
    }

    /// Returns the number of streams with an entry.
    pub fn len(&self) -> usize {
        self.lock().streams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().streams.is_empty()
    }

    /// Offers a parsed line to the table under a single lock.
    ///
    /// Both rules are checked against the same line; if either one takes
    /// it as a header the line is consumed.
    pub(crate) fn observe(&self, stream_key: &str, row: &[String], rules: HeaderRules) -> Observation {
        let mut state = self.lock();
        let mut consumed = false;

        if rules.per_stream && !state.streams.contains_key(stream_key) {
            let entry = if rules.cache_per_stream {
                StreamHeader::Cached(Arc::from(row))
            } else {
                StreamHeader::Skipped
            };
            tracing::debug!(
                stream = %stream_key,
                columns = row.len(),
                cached = rules.cache_per_stream,
                "Learned stream header"
            );
            state.streams.insert(stream_key.to_string(), entry);
            consumed = true;
        }

        if rules.autodetect && state.detected.is_none() {
            tracing::debug!(columns = row.len(), "Detected column names from first line");
            state.detected = Some(Arc::from(row));
            consumed = true;
        }

        if consumed {
            return Observation::Consumed;
        }

        Observation::Data(HeaderView {
            stream: match state.streams.get(stream_key) {
                Some(StreamHeader::Cached(names)) => Some(Arc::clone(names)),
                _ => None,
            },
            detected: state.detected.clone(),
        })
    }

    // Every write is a single insert, so the state stays consistent even
    // if a holder panicked.
    fn lock(&self) -> MutexGuard<'_, HeaderState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(values: &[&str]) -> Vec<String> {
        values.iter().map(ToString::to_string).collect()
    }

    const PER_STREAM: HeaderRules = HeaderRules {
        per_stream: true,
        cache_per_stream: true,
        autodetect: false,
    };

    #[test]
    fn test_first_line_per_stream_is_consumed() {
        let table = HeaderTable::new();
        assert!(matches!(
            table.observe("a", &row(&["h1", "h2"]), PER_STREAM),
            Observation::Consumed
        ));
        let Observation::Data(view) = table.observe("a", &row(&["h1", "h2"]), PER_STREAM) else {
            panic!("second line must be data");
        };
        assert_eq!(view.stream.as_deref(), Some(&row(&["h1", "h2"])[..]));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_skipped_header_is_remembered_without_names() {
        let table = HeaderTable::new();
        let rules = HeaderRules {
            cache_per_stream: false,
            ..PER_STREAM
        };
        assert!(matches!(
            table.observe("a", &row(&["h1"]), rules),
            Observation::Consumed
        ));
        assert_eq!(table.get("a"), Some(StreamHeader::Skipped));
        let Observation::Data(view) = table.observe("a", &row(&["v1"]), rules) else {
            panic!("second line must be data");
        };
        assert!(view.stream.is_none());
    }

    #[test]
    fn test_autodetect_is_global() {
        let table = HeaderTable::new();
        let rules = HeaderRules {
            autodetect: true,
            ..HeaderRules::default()
        };
        assert!(matches!(
            table.observe("a", &row(&["x", "y"]), rules),
            Observation::Consumed
        ));
        assert!(matches!(
            table.observe("b", &row(&["1", "2"]), rules),
            Observation::Data(_)
        ));
        assert_eq!(table.detected(), Some(row(&["x", "y"])));
        assert!(table.is_empty());
    }
}
