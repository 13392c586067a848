//! Commands that print a report

use super::{CommandContext, DialectArg};
use crate::input::FileReader;
use crate::output::{create_formatter, emit, open_output, OutputFormat};
use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use sessbound_core::analysis::{self, MIN_PROBABILITY};
use sessbound_core::{segmentation, SessionStats};
use std::path::{Path, PathBuf};

fn print_report<T: Serialize>(
    context: &CommandContext,
    format: OutputFormat,
    output: Option<&Path>,
    report: &T,
) -> Result<()> {
    let writer = open_output(output)?;
    let mut formatter = create_formatter(format, writer, context.config.output.pretty_json);
    emit(formatter.as_mut(), report)
}

/// Arguments for `score`
#[derive(Debug, Args)]
pub struct ScoreArgs {
    /// Reference session file
    #[arg(short, long, value_name = "FILE")]
    pub gold: PathBuf,

    /// Session file to score
    #[arg(long, value_name = "FILE")]
    pub candidate: PathBuf,

    /// Dialect of both session files
    #[arg(short, long, value_enum)]
    pub dialect: Option<DialectArg>,

    /// Report format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Output file (stdout when omitted)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

impl ScoreArgs {
    /// Execute the score command
    pub fn execute(&self, context: &CommandContext) -> Result<()> {
        let dialect = context.dialect(self.dialect);
        let gold = FileReader::read_segmentation(&self.gold, dialect)?;
        let candidate = FileReader::read_segmentation(&self.candidate, dialect)?;

        let metrics = segmentation::evaluate(&gold, &candidate).with_context(|| {
            format!(
                "Cannot score {} against {}",
                self.candidate.display(),
                self.gold.display()
            )
        })?;
        print_report(context, self.format, self.output.as_deref(), &metrics)
    }
}

/// Perplexity of one solution against another
#[derive(Debug, Serialize)]
pub struct PerplexityReport {
    /// Number of compared sessions
    pub sessions: usize,
    /// `2^(-Σ target · log2 candidate)` over normalised solutions
    pub perplexity: f64,
}

/// Arguments for `perplexity`
#[derive(Debug, Args)]
pub struct PerplexityArgs {
    /// Solution holding the reference probabilities
    #[arg(short, long, value_name = "FILE")]
    pub target: PathBuf,

    /// Solution to compare
    #[arg(long, value_name = "FILE")]
    pub candidate: PathBuf,

    /// Report format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Output file (stdout when omitted)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

impl PerplexityArgs {
    /// Execute the perplexity command
    pub fn execute(&self, context: &CommandContext) -> Result<()> {
        let target = FileReader::read_solution(&self.target)?;
        let candidate = FileReader::read_solution(&self.candidate)?;

        let target = analysis::normalize(&target, MIN_PROBABILITY)
            .with_context(|| format!("Cannot normalise {}", self.target.display()))?;
        let candidate = analysis::normalize(&candidate, MIN_PROBABILITY)
            .with_context(|| format!("Cannot normalise {}", self.candidate.display()))?;
        let perplexity = analysis::perplexity(&target, &candidate)?;

        let report = PerplexityReport {
            sessions: target.len(),
            perplexity,
        };
        print_report(context, self.format, self.output.as_deref(), &report)
    }
}

/// Arguments for `stats`
#[derive(Debug, Args)]
pub struct StatsArgs {
    /// Session file
    #[arg(short, long, value_name = "FILE")]
    pub input: PathBuf,

    /// Dialect of the session file
    #[arg(short, long, value_enum)]
    pub dialect: Option<DialectArg>,

    /// Report format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Output file (stdout when omitted)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

impl StatsArgs {
    /// Execute the stats command
    pub fn execute(&self, context: &CommandContext) -> Result<()> {
        let text = FileReader::read_text(&self.input)?;
        let stats = SessionStats::from_text(&text, context.dialect(self.dialect))
            .with_context(|| format!("Failed to decode sessions: {}", self.input.display()))?;
        print_report(context, self.format, self.output.as_deref(), &stats)
    }
}
