//! Configuration structures and loading.

use crate::error::{ConfigError, ConfigResult};
use crate::paths::AppPaths;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// File name of the narration prompt inside a prompt directory.
pub const SCRIPT_PROMPT_FILE: &str = "script.txt";

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub ollama: OllamaConfig,

    #[serde(default)]
    pub script: ScriptConfig,
}

impl Config {
    /// Load configuration from the default location.
    pub fn load() -> ConfigResult<Self> {
        let paths = AppPaths::new().ok_or(ConfigError::NoConfigDir)?;
        Self::load_from(&paths.config_file)
    }

    /// Load configuration from a specific path. A missing file yields defaults.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Save configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> ConfigResult<()> {
        let contents = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Create a default config file with comments.
    pub fn create_default_file(path: &Path) -> ConfigResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, Self::default_config_string())?;
        Ok(())
    }

    /// Generate a default config file with helpful comments.
    pub fn default_config_string() -> String {
        r#"# Autoclip Configuration
# Narration script generation for video highlights

[ollama]
# Ollama server address
host = "http://localhost:11434"

# Model used to write narration scripts
model = "qwen2.5:14b"

# Request timeout in seconds
timeout_seconds = 300

# Attempts per batch before the batch falls back to template scripts
max_retries = 3

# Pause between attempts (milliseconds)
retry_delay_ms = 2000

# Sampling temperature
temperature = 0.7

[script]
# Directory for step outputs and raw model responses
metadata_dir = "output/metadata"

# Directory holding prompt templates; per-category prompts live in
# <prompt_dir>/<category>/script.txt
prompt_dir = "prompt"

# Explicit prompt file, overrides prompt_dir when set
# script_prompt_path = "prompt/script.txt"
"#
        .to_string()
    }

    /// Resolve the narration prompt file, preferring a category-specific one.
    pub fn script_prompt_for(&self, category: Option<&str>) -> PathBuf {
        if let Some(path) = &self.script.script_prompt_path {
            return PathBuf::from(path);
        }

        let prompt_dir = Path::new(&self.script.prompt_dir);
        if let Some(category) = category {
            let candidate = prompt_dir.join(category).join(SCRIPT_PROMPT_FILE);
            if candidate.exists() {
                return candidate;
            }
            debug!(
                "No prompt for category '{}' at {}, using default prompt",
                category,
                candidate.display()
            );
        }

        prompt_dir.join(SCRIPT_PROMPT_FILE)
    }

    /// Set a value by dotted key (e.g. `ollama.model`).
    pub fn set(&mut self, key: &str, value: &str) -> ConfigResult<()> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["ollama", "host"] => self.ollama.host = value.to_string(),
            ["ollama", "model"] => self.ollama.model = value.to_string(),
            ["ollama", "timeout_seconds"] => self.ollama.timeout_seconds = parse_value(key, value)?,
            ["ollama", "max_retries"] => self.ollama.max_retries = parse_value(key, value)?,
            ["ollama", "retry_delay_ms"] => self.ollama.retry_delay_ms = parse_value(key, value)?,
            ["ollama", "temperature"] => self.ollama.temperature = parse_value(key, value)?,
            ["script", "metadata_dir"] => self.script.metadata_dir = value.to_string(),
            ["script", "prompt_dir"] => self.script.prompt_dir = value.to_string(),
            ["script", "script_prompt_path"] => {
                self.script.script_prompt_path = if value.is_empty() {
                    None
                } else {
                    Some(value.to_string())
                };
            }
            _ => return Err(ConfigError::Invalid(format!("unknown config key: {}", key))),
        }

        Ok(())
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> ConfigResult<T> {
    value
        .parse()
        .map_err(|_| ConfigError::Invalid(format!("invalid value for {}: {}", key, value)))
}

/// Ollama LLM settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OllamaConfig {
    pub host: String,
    pub model: String,
    pub timeout_seconds: u64,
    pub max_retries: u32,
    pub retry_delay_ms: u64,
    pub temperature: f32,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            host: "http://localhost:11434".to_string(),
            model: "qwen2.5:14b".to_string(),
            timeout_seconds: 300,
            max_retries: 3,
            retry_delay_ms: 2000,
            temperature: 0.7,
        }
    }
}

/// Narration step settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptConfig {
    pub metadata_dir: String,
    pub prompt_dir: String,
    pub script_prompt_path: Option<String>,
}

impl Default for ScriptConfig {
    fn default() -> Self {
        Self {
            metadata_dir: "output/metadata".to_string(),
            prompt_dir: "prompt".to_string(),
            script_prompt_path: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.ollama.host, "http://localhost:11434");
        assert_eq!(config.ollama.max_retries, 3);
        assert_eq!(config.script.metadata_dir, "output/metadata");
        assert!(config.script.script_prompt_path.is_none());
    }

    #[test]
    fn test_default_config_string_parses() {
        let config: Config = toml::from_str(&Config::default_config_string()).unwrap();
        let defaults = Config::default();
        assert_eq!(config.ollama.model, defaults.ollama.model);
        assert_eq!(config.ollama.retry_delay_ms, defaults.ollama.retry_delay_ms);
        assert_eq!(config.script.prompt_dir, defaults.script.prompt_dir);
    }

    #[test]
    fn test_load_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
            [script]
            metadata_dir = "/tmp/project/metadata"
            "#
        )
        .unwrap();

        let config = Config::load_from(temp_file.path()).unwrap();

        assert_eq!(config.script.metadata_dir, "/tmp/project/metadata");
        // Defaults should still work
        assert_eq!(config.script.prompt_dir, "prompt");
        assert_eq!(config.ollama.host, "http://localhost:11434");
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.ollama.timeout_seconds, 300);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.set("ollama.model", "mistral").unwrap();
        config.save_to(&path).unwrap();

        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(reloaded.ollama.model, "mistral");
    }

    #[test]
    fn test_set_rejects_bad_input() {
        let mut config = Config::default();
        assert!(matches!(
            config.set("ollama.nope", "x"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            config.set("ollama.max_retries", "many"),
            Err(ConfigError::Invalid(_))
        ));

        config.set("script.script_prompt_path", "p.txt").unwrap();
        assert_eq!(config.script.script_prompt_path.as_deref(), Some("p.txt"));
        config.set("script.script_prompt_path", "").unwrap();
        assert!(config.script.script_prompt_path.is_none());
    }

    #[test]
    fn test_script_prompt_for_category() {
        let dir = tempfile::tempdir().unwrap();
        let prompt_dir = dir.path().join("prompt");
        std::fs::create_dir_all(prompt_dir.join("knowledge")).unwrap();
        std::fs::write(prompt_dir.join("knowledge").join(SCRIPT_PROMPT_FILE), "k").unwrap();

        let mut config = Config::default();
        config.script.prompt_dir = prompt_dir.to_string_lossy().to_string();

        assert_eq!(
            config.script_prompt_for(Some("knowledge")),
            prompt_dir.join("knowledge").join(SCRIPT_PROMPT_FILE)
        );
        assert_eq!(
            config.script_prompt_for(Some("unknown")),
            prompt_dir.join(SCRIPT_PROMPT_FILE)
        );
        assert_eq!(config.script_prompt_for(None), prompt_dir.join(SCRIPT_PROMPT_FILE));

        config.script.script_prompt_path = Some("/explicit/script.txt".to_string());
        assert_eq!(
            config.script_prompt_for(Some("knowledge")),
            PathBuf::from("/explicit/script.txt")
        );
    }
}
