//! Error types for the core library

use crate::types::{RowKind, State, Symbol};
use thiserror::Error;

/// Errors raised by the codec, the model, the segmentation and inference
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed interchange text
    #[error("format error at line {line} ({section}): {reason}")]
    Format {
        /// 1-based line number of the offending line
        line: usize,
        /// Header, row or model section being parsed
        section: String,
        /// What was wrong with it
        reason: String,
    },

    /// Categorical draw over a row without positive mass
    #[error("cannot draw from the {row} row of state {state}: no positive probability (seed {seed})")]
    DegenerateRow {
        /// Which distribution was being drawn from
        row: RowKind,
        /// The state owning the row
        state: State,
        /// Seed of the sampling run, to reproduce the failure
        seed: u64,
    },

    /// Argument outside its valid domain
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A metric whose denominator is zero
    #[error("metric '{metric}' is undefined: denominator is zero")]
    DivideByZero {
        /// Name of the undefined metric
        metric: &'static str,
    },

    /// A deterministic-only operation met a non-deterministic model
    #[error("model is not deterministic at state {state}{}", on_symbol(.symbol))]
    NonDeterministic {
        /// The offending state
        state: State,
        /// The symbol with several positive transitions, if any
        symbol: Option<Symbol>,
    },
}

impl Error {
    /// Shorthand for a [`Error::Format`] value
    pub(crate) fn format(line: usize, section: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::Format {
            line,
            section: section.into(),
            reason: reason.into(),
        }
    }
}

fn on_symbol(symbol: &Option<Symbol>) -> String {
    symbol.map(|s| format!(" on symbol {s}")).unwrap_or_default()
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, Error>;
