//! Per-batch results of a narration run.

use std::path::PathBuf;

use autoclip_core::{Clip, ClipId};
use thiserror::Error;

/// Why a whole batch fell back to template scripts.
#[derive(Error, Debug)]
pub enum BatchError {
    #[error("generation service returned an empty response")]
    EmptyResponse,

    #[error("generation failed: {0}")]
    Generation(#[source] autoclip_ollama::OllamaError),

    #[error("failed to save raw response to {path}: {source}")]
    RawOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse response: {0}")]
    Parse(#[source] autoclip_ollama::OllamaError),

    #[error("response is a JSON {found}, expected an object keyed by clip id")]
    NotAMapping { found: &'static str },
}

/// Why one clip in an otherwise usable batch got a template script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    /// The response has no entry for the clip id.
    MissingEntry,
    /// The entry exists but is not an object.
    NotAMapping,
    /// The entry lacks required fields (or has them set to null).
    MissingFields(Vec<&'static str>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipFallback {
    pub id: ClipId,
    pub reason: FallbackReason,
}

#[derive(Debug)]
pub enum BatchOutcome {
    /// The model answered; `accepted` clips use its scripts.
    Generated {
        accepted: usize,
        fallbacks: Vec<ClipFallback>,
    },
    /// Every clip in the batch uses a template script.
    Degraded(BatchError),
}

#[derive(Debug)]
pub struct BatchReport {
    pub chunk_index: i64,
    pub clip_count: usize,
    pub outcome: BatchOutcome,
}

impl BatchReport {
    pub fn is_degraded(&self) -> bool {
        matches!(self.outcome, BatchOutcome::Degraded(_))
    }

    /// Clips in this batch that received a template script.
    pub fn fallback_count(&self) -> usize {
        match &self.outcome {
            BatchOutcome::Generated { fallbacks, .. } => fallbacks.len(),
            BatchOutcome::Degraded(_) => self.clip_count,
        }
    }
}

/// Clips with scripts attached, plus how each batch went.
#[derive(Debug, Default)]
pub struct ScriptReport {
    pub clips: Vec<Clip>,
    pub batches: Vec<BatchReport>,
}

impl ScriptReport {
    pub fn degraded_batches(&self) -> impl Iterator<Item = &BatchReport> {
        self.batches.iter().filter(|batch| batch.is_degraded())
    }

    pub fn fallback_count(&self) -> usize {
        self.batches.iter().map(BatchReport::fallback_count).sum()
    }

    pub fn generated_count(&self) -> usize {
        self.clips.len() - self.fallback_count()
    }
}
