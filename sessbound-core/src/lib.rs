//! Probabilistic session models and boundary inference over symbol streams
//!
//! A corpus is a flat stream of symbols cut into sessions. This crate
//! generates such streams from finite-state models, scores sessions against
//! a model, re-estimates models from training data, and recovers session
//! boundaries that were removed from a stream.
//!
//! # Architecture
//!
//! - **codec**: session file dialects and the (symbol, boundary) token stream
//! - **model**: the PDFA-like [`ProbabilisticModel`] with its text format,
//!   sampling, evaluation and estimation
//! - **segmentation**: a stream with its boundary sets, seeded
//!   removal/restoration and agreement metrics
//! - **inference**: context statistics that promote the most likely
//!   boundaries back into a segmentation
//!
//! # Example
//!
//! ```rust
//! use sessbound_core::{codec::Dialect, inference, InferenceConfig, Segmentation};
//!
//! let text = "3 3\n3 1 2 3\n3 1 2 3\n3 1 2 3\n";
//! let gold = Segmentation::decode(text, Dialect::Plain).unwrap();
//!
//! // forget one of the three boundaries, then ask for it back
//! let debounded = gold.debound(2, 1984);
//! assert_eq!(debounded.boundary_count(), 2);
//!
//! let config = InferenceConfig::builder().context_size(2).min_occurrences(0).build().unwrap();
//! let inferred = inference::infer(&debounded, 1, &config).unwrap();
//! assert_eq!(inferred.boundary_count(), 3);
//! ```

pub mod analysis;
pub mod codec;
pub mod config;
pub mod error;
pub mod inference;
pub mod model;
pub mod segmentation;
pub mod types;

pub use codec::{Dialect, Header, SessionStats};
pub use config::{
    EvaluationConfig, EvaluationMode, InferenceConfig, InferenceConfigBuilder, SamplingConfig,
    StrategyKind,
};
pub use error::{Error, Result};
pub use model::ProbabilisticModel;
pub use segmentation::{BoundaryMetrics, ContingencyTable, Segmentation};
pub use types::{RowKind, Session, State, Symbol, Token, DEFAULT_SEED};
