//! Line-by-line driver: read input, filter events, write JSON lines.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use csvmap_event::{CsvFilter, Event, FieldRef, FilterOutcome};
use serde_json::Value;

/// How input lines become events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InputFormat {
    /// Each line is the `message` of a new event.
    #[default]
    Raw,
    /// Each line is a JSON object.
    Json,
}

/// Counts of what happened to the events of one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub events: usize,
    pub mapped: usize,
    pub header_lines: usize,
    pub skipped_empty: usize,
    pub parse_failures: usize,
    pub untouched: usize,
}

impl RunSummary {
    fn record(&mut self, outcome: FilterOutcome) {
        self.events += 1;
        match outcome {
            FilterOutcome::Mapped { .. } => self.mapped += 1,
            FilterOutcome::HeaderConsumed => self.header_lines += 1,
            FilterOutcome::SkippedEmptyRow => self.skipped_empty += 1,
            FilterOutcome::ParseFailure => self.parse_failures += 1,
            FilterOutcome::NoSource | FilterOutcome::SourceShape => self.untouched += 1,
        }
    }

    /// Number of events written to the output.
    pub fn emitted(&self) -> usize {
        self.events - self.header_lines
    }
}

/// Parses a `KEY=VALUE` attribute.
pub fn parse_attribute(text: &str) -> Result<(String, String), String> {
    let (key, value) = text
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got {text:?}"))?;
    FieldRef::parse(key).map_err(|err| err.to_string())?;
    Ok((key.to_string(), value.to_string()))
}

/// Runs every input line through `filter`, writing kept events as JSON lines.
///
/// `attributes` are set on every event before filtering, so they can feed
/// the stream identity.
pub fn run<R, W>(
    filter: &CsvFilter,
    input: R,
    mut output: W,
    format: InputFormat,
    attributes: &[(String, String)],
) -> Result<RunSummary>
where
    R: BufRead,
    W: Write,
{
    let attributes = attributes
        .iter()
        .map(|(key, value)| -> Result<(FieldRef, Value)> {
            Ok((FieldRef::parse(key)?, Value::String(value.clone())))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut summary = RunSummary::default();
    for (idx, line) in input.lines().enumerate() {
        let line_number = idx + 1;
        let line = line.with_context(|| format!("failed to read input line {line_number}"))?;

        let mut event = match format {
            InputFormat::Raw => Event::from_message(line),
            InputFormat::Json => {
                if line.trim().is_empty() {
                    continue;
                }
                Event::from_json_str(&line)
                    .with_context(|| format!("invalid event on input line {line_number}"))?
            }
        };
        for (field, value) in &attributes {
            event.set(field, value.clone());
        }

        let outcome = filter.filter(&mut event);
        summary.record(outcome);
        if event.is_cancelled() {
            continue;
        }

        serde_json::to_writer(&mut output, &event.to_value())
            .context("failed to write event")?;
        output.write_all(b"\n").context("failed to write event")?;
    }
    output.flush().context("failed to flush output")?;

    tracing::info!(
        events = summary.events,
        mapped = summary.mapped,
        header_lines = summary.header_lines,
        skipped_empty = summary.skipped_empty,
        parse_failures = summary.parse_failures,
        untouched = summary.untouched,
        "Finished processing input"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_attribute() {
        assert_eq!(
            parse_attribute("path=/var/log/a.csv").unwrap(),
            ("path".to_string(), "/var/log/a.csv".to_string())
        );
        assert_eq!(
            parse_attribute("[file][name]=a=b").unwrap(),
            ("[file][name]".to_string(), "a=b".to_string())
        );
        assert!(parse_attribute("novalue").is_err());
        assert!(parse_attribute("[broken=x").is_err());
    }

    #[test]
    fn test_summary_counts() {
        let mut summary = RunSummary::default();
        summary.record(FilterOutcome::HeaderConsumed);
        summary.record(FilterOutcome::Mapped { fields: 2 });
        summary.record(FilterOutcome::SourceShape);
        assert_eq!(summary.events, 3);
        assert_eq!(summary.emitted(), 2);
        assert_eq!(summary.untouched, 1);
    }
}
