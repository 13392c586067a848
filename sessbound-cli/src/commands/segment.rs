//! Commands that remove, restore and window session boundaries

use super::{CommandContext, DialectArg, StrategyArg};
use crate::input::{format_pool, parse_pool, FileReader};
use crate::output::write_output;
use crate::progress::ProgressReporter;
use anyhow::{Context, Result};
use clap::Args;
use sessbound_core::{codec, inference, Dialect, Segmentation, DEFAULT_SEED};
use std::path::{Path, PathBuf};

/// Read a session file and attach the pool stored next to it
fn read_with_pool(input: &Path, pool: &Path, dialect: Dialect) -> Result<Segmentation> {
    let segmentation = FileReader::read_segmentation(input, dialect)?;
    let positions = parse_pool(&FileReader::read_text(pool)?)
        .with_context(|| format!("Failed to read pool: {}", pool.display()))?;
    segmentation
        .with_pool(positions)
        .with_context(|| format!("Pool {} does not fit {}", pool.display(), input.display()))
}

/// Arguments for `debound`
#[derive(Debug, Args)]
pub struct DeboundArgs {
    /// Session file
    #[arg(short, long, value_name = "FILE")]
    pub input: PathBuf,

    /// Number of boundaries to keep (the final one always survives)
    #[arg(short, long)]
    pub keep: usize,

    /// Random seed
    #[arg(short, long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Dialect of the input and output session files
    #[arg(short, long, value_enum)]
    pub dialect: Option<DialectArg>,

    /// Output file (stdout when omitted)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Where to write the candidate pool
    #[arg(long, value_name = "FILE")]
    pub pool_out: Option<PathBuf>,
}

impl DeboundArgs {
    /// Execute the debound command
    pub fn execute(&self, context: &CommandContext) -> Result<()> {
        let dialect = context.dialect(self.dialect);
        let segmentation = FileReader::read_segmentation(&self.input, dialect)?;
        let debounded = segmentation.debound(self.keep, self.seed);
        log::info!(
            "kept {} of {} boundaries, pool holds {} positions",
            debounded.boundary_count(),
            segmentation.boundary_count(),
            debounded.pool().len()
        );

        write_output(self.output.as_deref(), &debounded.encode(dialect))?;
        match &self.pool_out {
            Some(path) => write_output(Some(path), &format_pool(debounded.pool())),
            None => {
                log::warn!("no --pool-out given, the candidate pool is discarded");
                Ok(())
            }
        }
    }
}

/// Arguments for `bound`
#[derive(Debug, Args)]
pub struct BoundArgs {
    /// Debounded session file
    #[arg(short, long, value_name = "FILE")]
    pub input: PathBuf,

    /// Pool file written by `debound`
    #[arg(short, long, value_name = "FILE")]
    pub pool: PathBuf,

    /// Number of boundaries to restore
    #[arg(short = 'n', long)]
    pub count: usize,

    /// Random seed
    #[arg(short, long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Dialect of the input and output session files
    #[arg(short, long, value_enum)]
    pub dialect: Option<DialectArg>,

    /// Output file (stdout when omitted)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

impl BoundArgs {
    /// Execute the bound command
    pub fn execute(&self, context: &CommandContext) -> Result<()> {
        let dialect = context.dialect(self.dialect);
        let segmentation = read_with_pool(&self.input, &self.pool, dialect)?;
        let bounded = segmentation.bound(self.count, self.seed);
        log::info!(
            "restored {} boundaries at random",
            bounded.boundary_count() - segmentation.boundary_count()
        );
        write_output(self.output.as_deref(), &bounded.encode(dialect))
    }
}

/// Arguments for `infer`
#[derive(Debug, Args)]
pub struct InferArgs {
    /// Debounded session file
    #[arg(short, long, value_name = "FILE")]
    pub input: PathBuf,

    /// Pool file written by `debound`
    #[arg(short, long, value_name = "FILE")]
    pub pool: PathBuf,

    /// Number of boundaries to restore
    #[arg(short = 'n', long)]
    pub count: usize,

    /// Width of the past and future windows
    #[arg(long, value_name = "N")]
    pub context_size: Option<usize>,

    /// Minimum occurrences of a past suffix before it counts as evidence
    #[arg(long, value_name = "N")]
    pub min_occurrences: Option<u64>,

    /// Scoring rule
    #[arg(long, value_enum)]
    pub strategy: Option<StrategyArg>,

    /// Dialect of the input and output session files
    #[arg(short, long, value_enum)]
    pub dialect: Option<DialectArg>,

    /// Output file (stdout when omitted)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

impl InferArgs {
    /// Execute the infer command
    pub fn execute(&self, context: &CommandContext) -> Result<()> {
        let dialect = context.dialect(self.dialect);
        let segmentation = read_with_pool(&self.input, &self.pool, dialect)?;

        let mut config = context.config.inference;
        if let Some(size) = self.context_size {
            config.context_size = size;
        }
        if let Some(min) = self.min_occurrences {
            config.min_occurrences = min;
        }
        if let Some(strategy) = self.strategy {
            config.strategy = strategy.into();
        }

        let mut progress = ProgressReporter::new(context.quiet);
        progress.init_spinner("scoring candidate positions");
        let inferred = inference::infer(&segmentation, self.count, &config);
        progress.finish();
        let inferred = inferred.context("Boundary inference failed")?;

        write_output(self.output.as_deref(), &inferred.encode(dialect))
    }
}

/// Arguments for `window`
#[derive(Debug, Args)]
pub struct WindowArgs {
    /// Session file
    #[arg(short, long, value_name = "FILE")]
    pub input: PathBuf,

    /// Window width
    #[arg(long, value_name = "N")]
    pub size: usize,

    /// Dialect of the input and output session files
    #[arg(short, long, value_enum)]
    pub dialect: Option<DialectArg>,

    /// Output file (stdout when omitted)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

impl WindowArgs {
    /// Execute the window command
    pub fn execute(&self, context: &CommandContext) -> Result<()> {
        let dialect = context.dialect(self.dialect);
        let segmentation = FileReader::read_segmentation(&self.input, dialect)?;
        let windows = segmentation
            .sliding_sample(self.size)
            .context("Failed to cut windows")?;
        log::info!("cut {} windows of width {}", windows.len(), self.size);
        write_output(self.output.as_deref(), &codec::encode(&windows, dialect))
    }
}
