//! Autoclip Core - Clip records and narration script types shared by the pipeline crates.

mod error;
mod types;

pub use error::{Error, Result};
pub use types::*;
