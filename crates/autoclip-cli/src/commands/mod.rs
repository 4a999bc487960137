//! CLI command implementations.

pub mod config;
pub mod init;
pub mod script;

use anyhow::{Context, Result};
use autoclip_config::{AppPaths, Config};
use std::path::PathBuf;

/// Get the application paths.
pub fn get_paths() -> Result<AppPaths> {
    AppPaths::new().context("Failed to determine application directories")
}

/// Load the config file, falling back to defaults when none exists.
pub fn load_config() -> Result<Config> {
    Config::load().context("Failed to load configuration")
}

/// Expand `~` and environment variables in a user-supplied path.
pub fn expand_path(path: &str) -> Result<PathBuf> {
    let expanded = shellexpand::full(path)
        .with_context(|| format!("Failed to expand path: {}", path))?;
    Ok(PathBuf::from(expanded.as_ref()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_plain_path() {
        assert_eq!(
            expand_path("output/metadata").unwrap(),
            PathBuf::from("output/metadata")
        );
    }

    #[test]
    fn test_expand_home() {
        let expanded = expand_path("~/clips/step4_titles.json").unwrap();
        assert!(!expanded.starts_with("~"));
        assert!(expanded.ends_with("clips/step4_titles.json"));
    }
}
