//! Resolved locations for one narration run.

use std::path::{Path, PathBuf};

use autoclip_config::Config;

/// Subdirectory of the metadata directory holding raw model responses.
pub const RAW_OUTPUT_DIR: &str = "step7_llm_raw_output";

/// Default output file name inside the metadata directory.
pub const OUTPUT_FILE: &str = "step7_scripts.json";

/// Storage and prompt locations handed to [`crate::ScriptGenerator`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptSettings {
    pub metadata_dir: PathBuf,
    pub script_prompt_path: PathBuf,
}

impl ScriptSettings {
    pub fn new(metadata_dir: impl Into<PathBuf>, script_prompt_path: impl Into<PathBuf>) -> Self {
        Self {
            metadata_dir: metadata_dir.into(),
            script_prompt_path: script_prompt_path.into(),
        }
    }

    /// Settings from the `[script]` config section, with an optional prompt category.
    pub fn from_config(config: &Config, category: Option<&str>) -> Self {
        Self::new(
            &config.script.metadata_dir,
            config.script_prompt_for(category),
        )
    }

    pub fn with_metadata_dir(mut self, metadata_dir: impl Into<PathBuf>) -> Self {
        self.metadata_dir = metadata_dir.into();
        self
    }

    pub fn with_script_prompt_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.script_prompt_path = path.into();
        self
    }

    pub fn raw_output_dir(&self) -> PathBuf {
        self.metadata_dir.join(RAW_OUTPUT_DIR)
    }

    pub fn default_output_path(&self) -> PathBuf {
        self.metadata_dir.join(OUTPUT_FILE)
    }

    /// Raw response file for a batch.
    pub fn raw_output_path(dir: &Path, chunk_index: i64) -> PathBuf {
        dir.join(format!("chunk_{}.txt", chunk_index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_derive_from_metadata_dir() {
        let settings = ScriptSettings::new("/data/project/metadata", "prompt/script.txt");
        assert_eq!(
            settings.raw_output_dir(),
            PathBuf::from("/data/project/metadata/step7_llm_raw_output")
        );
        assert_eq!(
            settings.default_output_path(),
            PathBuf::from("/data/project/metadata/step7_scripts.json")
        );
        assert_eq!(
            ScriptSettings::raw_output_path(&settings.raw_output_dir(), 3),
            PathBuf::from("/data/project/metadata/step7_llm_raw_output/chunk_3.txt")
        );
    }

    #[test]
    fn test_from_config_with_overrides() {
        let mut config = Config::default();
        config.script.metadata_dir = "meta".to_string();
        config.script.prompt_dir = "prompts".to_string();

        let settings = ScriptSettings::from_config(&config, None);
        assert_eq!(settings.metadata_dir, PathBuf::from("meta"));
        assert_eq!(settings.script_prompt_path, PathBuf::from("prompts/script.txt"));

        let settings = settings
            .with_metadata_dir("other")
            .with_script_prompt_path("custom.txt");
        assert_eq!(settings.metadata_dir, PathBuf::from("other"));
        assert_eq!(settings.script_prompt_path, PathBuf::from("custom.txt"));
    }
}
