//! Autoclip Config - Configuration management for the autoclip pipeline.

mod config;
mod error;
mod paths;

pub use config::*;
pub use error::{ConfigError, ConfigResult};
pub use paths::AppPaths;
