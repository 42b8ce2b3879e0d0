// src/error.rs
use thiserror::Error;

/// Failures the inference core can report.
///
/// An empty prediction list is not represented here: it is a valid result.
#[derive(Error, Debug)]
pub enum TaggerError {
    #[error("Failed to load model from {path}: {reason}")]
    ModelLoad { path: String, reason: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl TaggerError {
    pub fn model_load(path: impl Into<String>, reason: impl Into<String>) -> Self {
        TaggerError::ModelLoad {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_input(reason: impl Into<String>) -> Self {
        TaggerError::InvalidInput(reason.into())
    }
}
