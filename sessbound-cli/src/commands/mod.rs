//! CLI command implementations

use crate::config::CliConfig;
use anyhow::Result;
use clap::{Subcommand, ValueEnum};
use sessbound_core::{Dialect, EvaluationMode, StrategyKind};

pub mod model;
pub mod report;
pub mod segment;

/// Shared state handed to every command
#[derive(Debug, Default)]
pub struct CommandContext {
    /// Loaded (or default) configuration
    pub config: CliConfig,
    /// Suppress progress output
    pub quiet: bool,
}

impl CommandContext {
    /// The dialect named on the command line, else the configured one
    pub fn dialect(&self, arg: Option<DialectArg>) -> Dialect {
        arg.map(Dialect::from).unwrap_or(self.config.output.dialect)
    }
}

/// Available CLI commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate sessions from a model
    Sample(model::SampleArgs),

    /// Compute the probability of every session under a model
    Evaluate(model::EvaluateArgs),

    /// Re-estimate the probabilities of a deterministic skeleton
    Estimate(model::EstimateArgs),

    /// Render a model as a Graphviz digraph
    Dot(model::DotArgs),

    /// Remove boundaries and record the candidate pool
    Debound(segment::DeboundArgs),

    /// Restore boundaries at random positions from the pool
    Bound(segment::BoundArgs),

    /// Restore boundaries at the best-scoring positions from the pool
    Infer(segment::InferArgs),

    /// Cut the symbol stream into overlapping fixed-width windows
    Window(segment::WindowArgs),

    /// Compare a candidate segmentation with the gold one
    Score(report::ScoreArgs),

    /// Perplexity of a candidate solution against a target solution
    Perplexity(report::PerplexityArgs),

    /// Summary statistics of a session file
    Stats(report::StatsArgs),
}

impl Commands {
    /// Run the selected command
    pub fn execute(&self, context: &CommandContext) -> Result<()> {
        match self {
            Commands::Sample(args) => args.execute(context),
            Commands::Evaluate(args) => args.execute(context),
            Commands::Estimate(args) => args.execute(context),
            Commands::Dot(args) => args.execute(context),
            Commands::Debound(args) => args.execute(context),
            Commands::Bound(args) => args.execute(context),
            Commands::Infer(args) => args.execute(context),
            Commands::Window(args) => args.execute(context),
            Commands::Score(args) => args.execute(context),
            Commands::Perplexity(args) => args.execute(context),
            Commands::Stats(args) => args.execute(context),
        }
    }
}

/// Session file dialect
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DialectArg {
    /// `<length> s1 s2 ...` rows after a header
    #[value(alias = "pautomac")]
    Plain,
    /// `<length> s1 0 s2 0 ...` rows after a header
    #[value(alias = "rti")]
    Paired,
    /// `s1 s2 ...` rows, no header
    #[value(alias = "treba")]
    Bare,
}

impl From<DialectArg> for Dialect {
    fn from(arg: DialectArg) -> Self {
        match arg {
            DialectArg::Plain => Dialect::Plain,
            DialectArg::Paired => Dialect::Paired,
            DialectArg::Bare => Dialect::Bare,
        }
    }
}

/// Evaluation path
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Walk deterministic models, run the forward recursion otherwise
    Auto,
    /// Always walk; fails on non-deterministic models
    Deterministic,
    /// Always run the forward recursion
    Forward,
}

impl From<ModeArg> for EvaluationMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Auto => EvaluationMode::Auto,
            ModeArg::Deterministic => EvaluationMode::Deterministic,
            ModeArg::Forward => EvaluationMode::Forward,
        }
    }
}

/// Boundary scoring rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    /// Largest gap between conditioned and unconditioned future probability
    MaxDifference,
    /// Smallest product of stop probability and conditioned future probability
    MinProduct,
}

impl From<StrategyArg> for StrategyKind {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::MaxDifference => StrategyKind::MaxDifference,
            StrategyArg::MinProduct => StrategyKind::MinProduct,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_dialect_wins_over_config() {
        let mut context = CommandContext::default();
        context.config.output.dialect = Dialect::Bare;

        assert_eq!(context.dialect(None), Dialect::Bare);
        assert_eq!(context.dialect(Some(DialectArg::Paired)), Dialect::Paired);
    }

    #[test]
    fn test_dialect_aliases() {
        assert_eq!(
            DialectArg::from_str("treba", false).unwrap(),
            DialectArg::Bare
        );
        assert_eq!(DialectArg::from_str("rti", false).unwrap(), DialectArg::Paired);
    }

    #[test]
    fn test_strategy_names_are_kebab_case() {
        assert_eq!(
            StrategyArg::from_str("max-difference", false).unwrap(),
            StrategyArg::MaxDifference
        );
        assert_eq!(
            StrategyKind::from(StrategyArg::MinProduct),
            StrategyKind::MinProduct
        );
    }
}
