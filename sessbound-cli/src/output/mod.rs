//! Output formatting module
//!
//! Commands that produce a session, model or solution file write its text
//! form with [`write_output`]. Commands that produce a report (metrics,
//! statistics, perplexity) hand a serializable value to an
//! [`OutputFormatter`].

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Trait for report formatters
pub trait OutputFormatter: Send + Sync {
    /// Format and output one report
    fn format_report(&mut self, report: &Value) -> Result<()>;

    /// Finalize output
    fn finish(&mut self) -> Result<()>;
}

pub mod json;
pub mod text;

pub use json::JsonFormatter;
pub use text::TextFormatter;

/// Report format selected on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// One `name: value` line per field
    Text,
    /// A single JSON object
    Json,
}

/// Writer for `path`, or stdout when none is given
pub fn open_output(path: Option<&Path>) -> Result<Box<dyn Write + Send + Sync>> {
    match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(io::stdout())),
    }
}

/// Write a complete text artefact to `path` or stdout
pub fn write_output(path: Option<&Path>, content: &str) -> Result<()> {
    let mut writer = open_output(path)?;
    writer.write_all(content.as_bytes())?;
    writer.flush()?;
    if let Some(path) = path {
        log::info!("wrote {}", path.display());
    }
    Ok(())
}

/// Build the formatter for `format` over `writer`
pub fn create_formatter<W>(format: OutputFormat, writer: W, pretty: bool) -> Box<dyn OutputFormatter>
where
    W: Write + Send + Sync + 'static,
{
    match format {
        OutputFormat::Text => Box::new(TextFormatter::new(writer)),
        OutputFormat::Json => Box::new(JsonFormatter::new(writer, pretty)),
    }
}

/// Serialize `report` and send it through `formatter`
pub fn emit<T: Serialize>(formatter: &mut dyn OutputFormatter, report: &T) -> Result<()> {
    let value = serde_json::to_value(report)?;
    formatter.format_report(&value)?;
    formatter.finish()
}
