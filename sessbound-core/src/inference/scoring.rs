//! Ranking rules for candidate boundary positions
//!
//! A candidate is described by the past and future around it. Strategies
//! look at every non-empty suffix of the past seen more than
//! `min_occurrences` times and every non-empty prefix of the future. Lower
//! scores mean stronger evidence for a boundary; a candidate with no
//! usable evidence scores `+∞` and is ranked last.

use super::context::ContextTable;
use crate::config::StrategyKind;
use crate::types::Symbol;

/// Scores one candidate position
pub trait ScoringStrategy {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Score the split between `past` and `future`
    fn score(&self, table: &ContextTable, past: &[Symbol], future: &[Symbol]) -> f64;
}

/// `max P(prefix | suffix) - P(prefix)`: how much the past explains the
/// future beyond chance
#[derive(Debug, Clone, Copy)]
pub struct MaxDifference {
    /// A past suffix must be seen more often than this
    pub min_occurrences: u64,
}

/// `min (1 - P(stop | suffix)) * P(prefix | suffix)`: the least likely way
/// for the session to go on past the split
///
/// A suffix that usually ends its session and rarely leads into the prefix
/// drives the score towards 0.
#[derive(Debug, Clone, Copy)]
pub struct MinProduct {
    /// A past suffix must be seen more often than this
    pub min_occurrences: u64,
}

/// (suffix, prefix) pairs a strategy may use as evidence
fn evidence<'a>(
    table: &'a ContextTable,
    past: &'a [Symbol],
    future: &'a [Symbol],
    min_occurrences: u64,
) -> impl Iterator<Item = (&'a [Symbol], &'a [Symbol])> + 'a {
    (0..past.len())
        .map(move |start| &past[start..])
        .filter(move |suffix| table.prior(suffix) > min_occurrences)
        .flat_map(move |suffix| (1..=future.len()).map(move |end| (suffix, &future[..end])))
}

impl ScoringStrategy for MaxDifference {
    fn name(&self) -> &'static str {
        "max-difference"
    }

    fn score(&self, table: &ContextTable, past: &[Symbol], future: &[Symbol]) -> f64 {
        evidence(table, past, future, self.min_occurrences)
            .map(|(suffix, prefix)| {
                let conditioned = table.probability(suffix, prefix).unwrap_or(0.0);
                let baseline = table.probability(&[], prefix).unwrap_or(0.0);
                conditioned - baseline
            })
            .reduce(f64::max)
            .unwrap_or(f64::INFINITY)
    }
}

impl ScoringStrategy for MinProduct {
    fn name(&self) -> &'static str {
        "min-product"
    }

    fn score(&self, table: &ContextTable, past: &[Symbol], future: &[Symbol]) -> f64 {
        evidence(table, past, future, self.min_occurrences)
            .map(|(suffix, prefix)| {
                let going_on = 1.0 - table.stop_probability(suffix).unwrap_or(0.0);
                going_on * table.probability(suffix, prefix).unwrap_or(0.0)
            })
            .reduce(f64::min)
            .unwrap_or(f64::INFINITY)
    }
}

impl StrategyKind {
    /// Instantiate the strategy
    pub fn build(self, min_occurrences: u64) -> Box<dyn ScoringStrategy> {
        match self {
            StrategyKind::MaxDifference => Box::new(MaxDifference { min_occurrences }),
            StrategyKind::MinProduct => Box::new(MinProduct { min_occurrences }),
        }
    }
}
