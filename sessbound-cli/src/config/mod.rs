//! Configuration module
//!
//! An optional TOML file fills the core configuration structs; command-line
//! flags override individual values afterwards.
//!
//! ```toml
//! [sampling]
//! max_session_length = 500
//!
//! [evaluation]
//! mode = "forward"
//! cache_limit = 100000
//!
//! [inference]
//! context_size = 3
//! min_occurrences = 5
//! strategy = "max-difference"
//!
//! [output]
//! dialect = "paired"
//! pretty_json = false
//! ```

use crate::error::CliError;
use crate::input::FileReader;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sessbound_core::{Dialect, EvaluationConfig, InferenceConfig, SamplingConfig};
use std::path::Path;

/// CLI configuration structure
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct CliConfig {
    /// Session generation
    #[serde(default)]
    pub sampling: SamplingConfig,

    /// Session probability computation
    #[serde(default)]
    pub evaluation: EvaluationConfig,

    /// Boundary inference
    #[serde(default)]
    pub inference: InferenceConfig,

    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,
}

/// Output-related configuration
#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Dialect of session files read and written when no flag is given
    pub dialect: Dialect,

    /// Pretty print JSON output
    pub pretty_json: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dialect: Dialect::Plain,
            pretty_json: true,
        }
    }
}

impl CliConfig {
    /// Parse a configuration from TOML text
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: CliConfig =
            toml::from_str(text).map_err(|e| CliError::ConfigError(e.message().to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let text = FileReader::read_text(path)?;
        Self::from_toml(&text)
            .with_context(|| format!("Failed to load configuration: {}", path.display()))
    }

    /// Check every section
    pub fn validate(&self) -> Result<()> {
        self.sampling
            .validate()
            .and_then(|_| self.evaluation.validate())
            .and_then(|_| self.inference.validate())
            .map_err(|e| CliError::ConfigError(e.to_string()))?;
        Ok(())
    }
}
