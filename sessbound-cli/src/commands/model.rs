//! Commands that work on probabilistic models

use super::{CommandContext, DialectArg, ModeArg};
use crate::input::FileReader;
use crate::output::write_output;
use crate::progress::ProgressReporter;
use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use sessbound_core::model::{rti, treba};
use sessbound_core::{analysis, codec, DEFAULT_SEED};
use std::path::PathBuf;

/// Arguments for `sample`
#[derive(Debug, Args)]
pub struct SampleArgs {
    /// Model file
    #[arg(short, long, value_name = "FILE")]
    pub model: PathBuf,

    /// Number of sessions to generate
    #[arg(short = 'n', long, default_value_t = 1000)]
    pub count: usize,

    /// Random seed
    #[arg(short, long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Cut sessions at this many symbols
    #[arg(long, value_name = "N")]
    pub max_length: Option<usize>,

    /// Dialect of the written session file
    #[arg(short, long, value_enum)]
    pub dialect: Option<DialectArg>,

    /// Output file (stdout when omitted)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

impl SampleArgs {
    /// Execute the sample command
    pub fn execute(&self, context: &CommandContext) -> Result<()> {
        let model = FileReader::read_model(&self.model)?;
        let mut config = context.config.sampling;
        if let Some(max_length) = self.max_length {
            config.max_session_length = max_length;
        }

        let mut progress = ProgressReporter::new(context.quiet);
        progress.init_spinner("sampling");
        let sessions = model.sample(self.count, self.seed, &config);
        progress.finish();
        let sessions = sessions
            .with_context(|| format!("Failed to sample from {}", self.model.display()))?;

        let text = codec::encode(&sessions, context.dialect(self.dialect));
        write_output(self.output.as_deref(), &text)
    }
}

/// Arguments for `evaluate`
#[derive(Debug, Args)]
pub struct EvaluateArgs {
    /// Model file
    #[arg(short, long, value_name = "FILE")]
    pub model: PathBuf,

    /// Session file to evaluate
    #[arg(short, long, value_name = "FILE")]
    pub input: PathBuf,

    /// Dialect of the session file
    #[arg(short, long, value_enum)]
    pub dialect: Option<DialectArg>,

    /// Evaluation path
    #[arg(long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Clear the forward cache after this many suffixes
    #[arg(long, value_name = "N")]
    pub cache_limit: Option<usize>,

    /// Solution file to write (stdout when omitted)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

impl EvaluateArgs {
    /// Execute the evaluate command
    pub fn execute(&self, context: &CommandContext) -> Result<()> {
        let model = FileReader::read_model(&self.model)?;
        let sessions = FileReader::read_sessions(&self.input, context.dialect(self.dialect))?;

        let mut config = context.config.evaluation;
        if let Some(mode) = self.mode {
            config.mode = mode.into();
        }
        if self.cache_limit.is_some() {
            config.cache_limit = self.cache_limit;
        }

        let mut progress = ProgressReporter::new(context.quiet);
        progress.init_sessions(sessions.len() as u64, "evaluating");
        let probabilities = model.evaluate_with(&sessions, &config, |done| {
            progress.sessions_completed(done as u64)
        });
        progress.finish();
        let probabilities = probabilities
            .with_context(|| format!("Failed to evaluate {}", self.input.display()))?;

        log::info!("evaluated {} sessions", probabilities.len());
        write_output(
            self.output.as_deref(),
            &analysis::write_solution(&probabilities),
        )
    }
}

/// Format of a skeleton file
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SkeletonFormat {
    /// Sectioned `I:`/`F:`/`S:`/`T:` model file
    Pautomac,
    /// State listing produced by the RTI learner
    Rti,
    /// Transition and final lines produced by the treba learner
    Treba,
}

/// Arguments for `estimate`
#[derive(Debug, Args)]
pub struct EstimateArgs {
    /// Deterministic skeleton whose transitions are kept
    #[arg(long, value_name = "FILE")]
    pub skeleton: PathBuf,

    /// Format of the skeleton file
    #[arg(long, value_enum, default_value_t = SkeletonFormat::Pautomac)]
    pub skeleton_format: SkeletonFormat,

    /// Training sessions
    #[arg(short, long, value_name = "FILE")]
    pub train: PathBuf,

    /// Dialect of the training file
    #[arg(short, long, value_enum)]
    pub dialect: Option<DialectArg>,

    /// Model file to write (stdout when omitted)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

impl EstimateArgs {
    /// Execute the estimate command
    pub fn execute(&self, context: &CommandContext) -> Result<()> {
        let skeleton = match self.skeleton_format {
            SkeletonFormat::Pautomac => FileReader::read_model(&self.skeleton)?,
            SkeletonFormat::Rti => {
                let text = FileReader::read_text(&self.skeleton)?;
                rti::load(&text).with_context(|| {
                    format!("Failed to load RTI skeleton: {}", self.skeleton.display())
                })?
            }
            SkeletonFormat::Treba => {
                let text = FileReader::read_text(&self.skeleton)?;
                treba::load(&text).with_context(|| {
                    format!("Failed to load treba skeleton: {}", self.skeleton.display())
                })?
            }
        };
        let training = FileReader::read_sessions(&self.train, context.dialect(self.dialect))?;

        let model = skeleton
            .estimate(&training)
            .with_context(|| format!("Failed to estimate from {}", self.train.display()))?;
        log::info!(
            "estimated {} states from {} sessions",
            model.num_states(),
            training.len()
        );
        write_output(self.output.as_deref(), &model.store())
    }
}

/// Arguments for `dot`
#[derive(Debug, Args)]
pub struct DotArgs {
    /// Model file
    #[arg(short, long, value_name = "FILE")]
    pub model: PathBuf,

    /// Output file (stdout when omitted)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

impl DotArgs {
    /// Execute the dot command
    pub fn execute(&self, _context: &CommandContext) -> Result<()> {
        let model = FileReader::read_model(&self.model)?;
        write_output(self.output.as_deref(), &model.to_dot())
    }
}
