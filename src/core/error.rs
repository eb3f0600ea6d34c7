//! Error types for data loading.

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use thiserror::Error;

/// Errors that can occur when loading configuration, level or enemy data.
#[derive(Debug, Error)]
pub enum DataLoadError {
    /// File could not be found.
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// File could not be read.
    #[error("Failed to read file '{path}': {details}")]
    ReadError { path: String, details: String },

    /// RON parsing failed.
    #[error("Parse error in '{path}': {details}")]
    ParseError { path: String, details: String },

    /// A location references an enemy kind with no definition.
    #[error("Location '{location}' references unknown enemy kind '{kind}'")]
    UnknownEnemyKind { location: String, kind: String },

    /// A multi-key barrier needs more keys than its location provides.
    #[error("Location '{location}' requires {required} keys but only {available} are placed")]
    NotEnoughKeys {
        location: String,
        required: u32,
        available: usize,
    },

    /// Barrier geometry is unusable.
    #[error("Barrier in '{location}' has no room inside its edge buffer (radius {radius}, buffer {edge_buffer})")]
    DegenerateBarrier {
        location: String,
        radius: f32,
        edge_buffer: f32,
    },
}

/// Read and parse a RON file.
pub fn read_ron_file<T: DeserializeOwned>(path: &Path) -> Result<T, DataLoadError> {
    let label = path.display().to_string();
    if !path.exists() {
        return Err(DataLoadError::FileNotFound(label));
    }
    let contents = fs::read_to_string(path).map_err(|e| DataLoadError::ReadError {
        path: label.clone(),
        details: e.to_string(),
    })?;
    parse_ron(&contents, &label)
}

/// Parse RON text, tagging errors with `label`.
pub fn parse_ron<T: DeserializeOwned>(contents: &str, label: &str) -> Result<T, DataLoadError> {
    ron::from_str(contents).map_err(|e| DataLoadError::ParseError {
        path: label.to_string(),
        details: e.to_string(),
    })
}
