//! `csvmap` binary.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, IsTerminal};

use anyhow::{Context, Result};
use clap::{ColorChoice, Parser};
use csvmap_cli::logging::{LogConfig, LogFormat, init_logging};
use csvmap_cli::pipeline::{InputFormat, RunSummary, run};
use csvmap_core::CsvConfig;
use csvmap_event::CsvFilter;
use tracing::level_filters::LevelFilter;

mod cli;

use crate::cli::{Cli, InputFormatArg, LogFormatArg, LogLevelArg};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match run_cli(&cli) {
        Ok(_) => 0,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

fn run_cli(cli: &Cli) -> Result<RunSummary> {
    let config = match &cli.config {
        Some(path) => CsvConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => CsvConfig::default(),
    };
    let filter = CsvFilter::new(&config).context("invalid CSV filter configuration")?;

    let format = match cli.format {
        InputFormatArg::Raw => InputFormat::Raw,
        InputFormatArg::Json => InputFormat::Json,
    };
    let stdout = io::stdout();
    let output = BufWriter::new(stdout.lock());

    match &cli.input {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("failed to open input {}", path.display()))?;
            run(&filter, BufReader::new(file), output, format, &cli.attributes)
        }
        None => run(&filter, io::stdin().lock(), output, format, &cli.attributes),
    }
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
