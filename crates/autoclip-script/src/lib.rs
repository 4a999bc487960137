//! Autoclip Script - Narration script generation step.
//!
//! This crate provides:
//! - Batched script generation, one model call per chunk of clips
//! - Keyword-selected template scripts when the model fails or skips a clip
//! - Clip duration from subtitle timestamps
//! - Loading and saving clip lists

mod duration;
mod error;
mod generator;
mod outcome;
mod service;
mod settings;
mod step;
pub mod templates;

pub use duration::{calculate_duration, timestamp_seconds, DEFAULT_DURATION_SECS};
pub use error::{ScriptError, ScriptResult};
pub use generator::{save_clips_with_scripts, ScriptGenerator};
pub use outcome::{
    BatchError, BatchOutcome, BatchReport, ClipFallback, FallbackReason, ScriptReport,
};
pub use service::{build_prompt, OllamaGenerator, TextGenerator};
pub use settings::{ScriptSettings, OUTPUT_FILE, RAW_OUTPUT_DIR};
pub use step::{load_clips, run_script_step};
pub use templates::default_script;
