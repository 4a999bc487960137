//! Error types for the narration step.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for narration step operations.
pub type ScriptResult<T> = Result<T, ScriptError>;

/// Errors that abort a narration run.
///
/// Generation problems never show up here; they degrade a batch to template
/// scripts and are reported through [`crate::BatchOutcome`].
#[derive(Error, Debug)]
pub enum ScriptError {
    #[error("Failed to read prompt template {path}: {source}")]
    PromptTemplate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read clips from {path}: {source}")]
    ReadInput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid clip list in {path}: {source}")]
    InvalidInput {
        path: PathBuf,
        #[source]
        source: autoclip_core::Error,
    },

    #[error("Failed to write {path}: {source}")]
    WriteOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Failed to create async runtime: {0}")]
    Runtime(std::io::Error),

    #[error("Generation service error: {0}")]
    Ollama(#[from] autoclip_ollama::OllamaError),
}
