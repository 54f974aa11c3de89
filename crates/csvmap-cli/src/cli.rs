//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use csvmap_cli::pipeline::parse_attribute;

#[derive(Parser)]
#[command(
    name = "csvmap",
    version,
    about = "Map delimited text lines to named, typed event fields",
    long_about = "Map delimited text lines to named, typed event fields.\n\n\
                  Reads raw lines or JSON-lines events, applies the CSV filter \
                  configured in a TOML file, and writes the kept events to \
                  stdout as JSON lines."
)]
pub struct Cli {
    /// TOML file with the CSV filter options (defaults apply when omitted).
    #[arg(long = "config", short = 'c', value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Input file (reads stdin when omitted).
    #[arg(long = "input", short = 'i', value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// How input lines become events.
    #[arg(long = "format", value_enum, default_value = "raw")]
    pub format: InputFormatArg,

    /// Field set on every event before filtering, e.g. `path=users.csv`.
    ///
    /// May be repeated. Attributes feed the stream identity template.
    #[arg(long = "attr", value_name = "KEY=VALUE", value_parser = parse_attribute)]
    pub attributes: Vec<(String, String)>,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format.
    #[arg(long = "log-format", value_enum, default_value = "pretty")]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum InputFormatArg {
    /// Each line is a raw CSV line.
    Raw,
    /// Each line is a JSON object event.
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
