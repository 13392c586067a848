//! Configuration for sampling, evaluation and boundary inference
//!
//! Every struct has sensible defaults and a `validate()` method; randomized
//! operations never read a seed from here, it is always passed explicitly.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Options for [`ProbabilisticModel::sample`](crate::ProbabilisticModel::sample)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingConfig {
    /// Sessions are cut once they reach this many symbols
    pub max_session_length: usize,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            max_session_length: 1000,
        }
    }
}

impl SamplingConfig {
    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        if self.max_session_length == 0 {
            return Err(Error::InvalidArgument(
                "max session length must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// How session probabilities are computed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvaluationMode {
    /// Deterministic walk when the model is deterministic, forward DP otherwise
    #[default]
    Auto,
    /// Always walk the unique state chain; fails on non-deterministic models
    Deterministic,
    /// Always run the memoised forward recursion
    Forward,
}

/// Options for [`ProbabilisticModel::evaluate`](crate::ProbabilisticModel::evaluate)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationConfig {
    /// Evaluation path selector
    pub mode: EvaluationMode,
    /// Maximum number of memoised suffixes before the forward cache is
    /// cleared (None = unbounded)
    pub cache_limit: Option<usize>,
}

impl EvaluationConfig {
    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        if self.cache_limit == Some(0) {
            return Err(Error::InvalidArgument(
                "cache limit must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Scoring rule used to rank candidate boundary positions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyKind {
    /// Maximum difference between conditioned and unconditioned future probability
    MaxDifference,
    /// Minimum product of the global stop probability and the conditioned future probability
    #[default]
    MinProduct,
}

/// Options for [`infer`](crate::inference::infer)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    /// Width of the past and future windows
    pub context_size: usize,
    /// A past suffix must occur more often than this to be used as evidence
    pub min_occurrences: u64,
    /// Scoring rule
    pub strategy: StrategyKind,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            context_size: 5,
            min_occurrences: 10,
            strategy: StrategyKind::default(),
        }
    }
}

impl InferenceConfig {
    /// Creates a new builder for InferenceConfig
    pub fn builder() -> InferenceConfigBuilder {
        InferenceConfigBuilder::default()
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        if self.context_size == 0 {
            return Err(Error::InvalidArgument(
                "context size must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for [`InferenceConfig`]
#[derive(Debug, Default)]
pub struct InferenceConfigBuilder {
    config: InferenceConfig,
}

impl InferenceConfigBuilder {
    /// Set the context size
    pub fn context_size(mut self, context_size: usize) -> Self {
        self.config.context_size = context_size;
        self
    }

    /// Set the minimum number of occurrences of a past suffix
    pub fn min_occurrences(mut self, min_occurrences: u64) -> Self {
        self.config.min_occurrences = min_occurrences;
        self
    }

    /// Set the scoring strategy
    pub fn strategy(mut self, strategy: StrategyKind) -> Self {
        self.config.strategy = strategy;
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<InferenceConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
