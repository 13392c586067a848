//! File reading utilities

use crate::error::CliError;
use anyhow::{Context, Result};
use sessbound_core::{Dialect, ProbabilisticModel, Segmentation, Session};
use std::fs;
use std::path::Path;

/// Reads the text formats the commands consume
pub struct FileReader;

impl FileReader {
    /// Read a file as UTF-8 text
    pub fn read_text(path: &Path) -> Result<String> {
        if !path.exists() {
            return Err(CliError::FileNotFound(path.display().to_string()).into());
        }
        fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path.display()))
    }

    /// Read a session file as a list of sessions
    pub fn read_sessions(path: &Path, dialect: Dialect) -> Result<Vec<Session>> {
        let text = Self::read_text(path)?;
        sessbound_core::codec::decode_sessions(&text, dialect)
            .with_context(|| format!("Failed to decode sessions: {}", path.display()))
    }

    /// Read a session file as a flat segmentation
    pub fn read_segmentation(path: &Path, dialect: Dialect) -> Result<Segmentation> {
        let text = Self::read_text(path)?;
        Segmentation::decode(&text, dialect)
            .with_context(|| format!("Failed to decode sessions: {}", path.display()))
    }

    /// Read a model file
    pub fn read_model(path: &Path) -> Result<ProbabilisticModel> {
        let text = Self::read_text(path)?;
        ProbabilisticModel::load(&text)
            .with_context(|| format!("Failed to load model: {}", path.display()))
    }

    /// Read a solution file
    pub fn read_solution(path: &Path) -> Result<Vec<f64>> {
        let text = Self::read_text(path)?;
        sessbound_core::analysis::read_solution(&text)
            .with_context(|| format!("Failed to read solution: {}", path.display()))
    }
}
