//! Text generation backends for narration scripts.

use std::time::Duration;

use autoclip_config::OllamaConfig;
use autoclip_ollama::{GenerateOptions, GenerateRequest, OllamaClient, OllamaError, OllamaResult};
use serde_json::Value;
use tokio::runtime::Runtime;
use tracing::{debug, info, warn};

use crate::error::{ScriptError, ScriptResult};

/// Upper bound on tokens the model may produce for one batch.
const MAX_SCRIPT_TOKENS: i32 = 4096;

/// A blocking text generation service.
///
/// Receives the prompt template and the batch payload and returns the raw
/// model output. An empty string means the service produced nothing.
pub trait TextGenerator {
    fn generate(&self, prompt: &str, payload: &Value) -> OllamaResult<String>;
}

impl<T: TextGenerator + ?Sized> TextGenerator for &T {
    fn generate(&self, prompt: &str, payload: &Value) -> OllamaResult<String> {
        (**self).generate(prompt, payload)
    }
}

/// Ollama-backed generator with a fixed-delay retry policy.
pub struct OllamaGenerator {
    client: OllamaClient,
    model: String,
    temperature: f32,
    max_retries: u32,
    retry_delay: Duration,
    rt: Runtime,
}

impl OllamaGenerator {
    /// Create a generator from config.
    pub fn from_config(config: &OllamaConfig) -> ScriptResult<Self> {
        let client = OllamaClient::from_config(config)?;
        let rt = Runtime::new().map_err(ScriptError::Runtime)?;

        Ok(Self {
            client,
            model: config.model.clone(),
            temperature: config.temperature,
            max_retries: config.max_retries,
            retry_delay: Duration::from_millis(config.retry_delay_ms),
            rt,
        })
    }

    /// Use a different model than the configured one.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn host(&self) -> &str {
        self.client.host()
    }

    /// Check if the Ollama server answers.
    pub fn is_available(&self) -> bool {
        self.rt.block_on(self.client.is_available())
    }
}

impl TextGenerator for OllamaGenerator {
    fn generate(&self, prompt: &str, payload: &Value) -> OllamaResult<String> {
        let full_prompt = build_prompt(prompt, payload)?;
        let attempts = self.max_retries.max(1);
        let mut last_error = None;

        for attempt in 1..=attempts {
            let request = GenerateRequest::new(&self.model, full_prompt.as_str()).with_options(
                GenerateOptions::new()
                    .with_temperature(self.temperature)
                    .with_num_predict(MAX_SCRIPT_TOKENS),
            );

            match self.rt.block_on(self.client.generate(request)) {
                Ok(response) => {
                    info!(
                        "Model {} answered on attempt {}/{}",
                        self.model, attempt, attempts
                    );
                    return Ok(response.response);
                }
                Err(e) if !is_retryable(&e) => return Err(e),
                Err(e) => {
                    warn!("Generation attempt {}/{} failed: {}", attempt, attempts, e);
                    last_error = Some(e);
                    if attempt < attempts {
                        debug!("Retrying in {:?}", self.retry_delay);
                        std::thread::sleep(self.retry_delay);
                    }
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| OllamaError::Connection("no generation attempt was made".to_string())))
    }
}

/// Prompt template followed by the batch payload as pretty JSON.
pub fn build_prompt(template: &str, payload: &Value) -> OllamaResult<String> {
    let input = serde_json::to_string_pretty(payload)?;
    Ok(format!("{}\n\n输入数据：\n{}", template.trim_end(), input))
}

fn is_retryable(error: &OllamaError) -> bool {
    !matches!(
        error,
        OllamaError::ModelNotFound { .. } | OllamaError::InvalidConfig(_)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_build_prompt_appends_payload() {
        let payload = json!([{"id": "1", "title": "节日庆典"}]);
        let prompt = build_prompt("请为以下片段撰写解说文稿。\n", &payload).unwrap();

        assert!(prompt.starts_with("请为以下片段撰写解说文稿。\n\n输入数据：\n"));
        // Non-ASCII text is kept as-is
        assert!(prompt.contains("\"title\": \"节日庆典\""));
    }

    #[test]
    fn test_retry_classification() {
        assert!(!is_retryable(&OllamaError::ModelNotFound {
            model: "m".to_string()
        }));
        assert!(is_retryable(&OllamaError::Timeout { seconds: 5 }));
        assert!(is_retryable(&OllamaError::ServerNotRunning {
            host: "h".to_string()
        }));
    }

    #[test]
    fn test_unreachable_server_exhausts_retries() {
        let config = OllamaConfig {
            host: "http://127.0.0.1:9".to_string(),
            timeout_seconds: 2,
            max_retries: 2,
            retry_delay_ms: 10,
            ..OllamaConfig::default()
        };
        let generator = OllamaGenerator::from_config(&config).unwrap().with_model("test-model");
        assert_eq!(generator.model(), "test-model");
        assert_eq!(generator.host(), "http://127.0.0.1:9");

        let result = generator.generate("prompt", &json!([]));
        assert!(result.is_err());
    }
}
