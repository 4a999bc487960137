//! Batch narration script generation.

use std::path::{Path, PathBuf};

use autoclip_core::{json_kind, missing_script_fields, Clip, ClipScript};
use autoclip_ollama::{parse_json_response, OllamaError};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::error::{ScriptError, ScriptResult};
use crate::outcome::{
    BatchError, BatchOutcome, BatchReport, ClipFallback, FallbackReason, ScriptReport,
};
use crate::service::TextGenerator;
use crate::settings::ScriptSettings;
use crate::templates::default_script;

/// Characters of a clip title shown in log lines.
const LOG_TITLE_CHARS: usize = 20;

/// Writes narration scripts for titled clips, one model call per chunk.
pub struct ScriptGenerator<G> {
    service: G,
    prompt: String,
    raw_output_dir: PathBuf,
}

impl<G: TextGenerator> ScriptGenerator<G> {
    /// Load the prompt template and prepare a generator.
    ///
    /// Fails if the prompt template cannot be read.
    pub fn new(settings: &ScriptSettings, service: G) -> ScriptResult<Self> {
        let prompt = std::fs::read_to_string(&settings.script_prompt_path).map_err(|source| {
            ScriptError::PromptTemplate {
                path: settings.script_prompt_path.clone(),
                source,
            }
        })?;
        debug!(
            "Loaded narration prompt from {} ({} chars)",
            settings.script_prompt_path.display(),
            prompt.chars().count()
        );

        Ok(Self {
            service,
            prompt,
            raw_output_dir: settings.raw_output_dir(),
        })
    }

    /// Attach a script to every clip.
    pub fn generate_scripts(&self, clips: Vec<Clip>) -> Vec<Clip> {
        self.generate_scripts_with_report(clips).clips
    }

    /// Attach a script to every clip and report how each batch went.
    ///
    /// Clips come back grouped by chunk, chunks in first-seen order.
    pub fn generate_scripts_with_report(&self, clips: Vec<Clip>) -> ScriptReport {
        if clips.is_empty() {
            return ScriptReport::default();
        }

        info!("Generating narration scripts for {} clips", clips.len());

        let mut report = ScriptReport {
            clips: Vec::with_capacity(clips.len()),
            batches: Vec::new(),
        };

        for (chunk_index, mut batch) in group_by_chunk(clips) {
            info!("Processing chunk {} ({} clips)", chunk_index, batch.len());

            let outcome = self.process_batch(chunk_index, &mut batch);
            report.batches.push(BatchReport {
                chunk_index,
                clip_count: batch.len(),
                outcome,
            });
            report.clips.extend(batch);
        }

        info!(
            "Narration scripts done: {} generated, {} from templates",
            report.generated_count(),
            report.fallback_count()
        );
        report
    }

    fn process_batch(&self, chunk_index: i64, clips: &mut [Clip]) -> BatchOutcome {
        let scripts = match self.request_scripts(chunk_index, clips) {
            Ok(scripts) => scripts,
            Err(e) => {
                warn!(
                    "Chunk {} falls back to template scripts: {}",
                    chunk_index, e
                );
                for clip in clips.iter_mut() {
                    clip.script = Some(default_script(clip).into());
                }
                return BatchOutcome::Degraded(e);
            }
        };

        let mut accepted = 0;
        let mut fallbacks = Vec::new();

        for clip in clips.iter_mut() {
            match lookup_script(&scripts, &clip.id) {
                Ok(script) => {
                    debug!(
                        "Using generated script for clip {} ('{}')",
                        clip.id,
                        clip.effective_title().chars().take(LOG_TITLE_CHARS).collect::<String>()
                    );
                    clip.script = Some(ClipScript::Verbatim(script));
                    accepted += 1;
                }
                Err(reason) => {
                    warn!(
                        "Clip {} gets a template script: {:?}",
                        clip.id, reason
                    );
                    clip.script = Some(default_script(clip).into());
                    fallbacks.push(ClipFallback {
                        id: clip.id.clone(),
                        reason,
                    });
                }
            }
        }

        BatchOutcome::Generated {
            accepted,
            fallbacks,
        }
    }

    fn request_scripts(
        &self,
        chunk_index: i64,
        clips: &[Clip],
    ) -> Result<Map<String, Value>, BatchError> {
        let payload: Vec<_> = clips.iter().map(Clip::to_payload).collect();
        let payload = serde_json::to_value(payload)
            .map_err(|e| BatchError::Generation(OllamaError::Json(e)))?;

        let raw = self
            .service
            .generate(&self.prompt, &payload)
            .map_err(BatchError::Generation)?;

        if raw.is_empty() {
            return Err(BatchError::EmptyResponse);
        }

        let path = self.save_raw_output(chunk_index, &raw)?;
        info!("Raw response for chunk {} saved to {}", chunk_index, path.display());

        if raw.trim().is_empty() {
            return Err(BatchError::EmptyResponse);
        }

        match parse_json_response(&raw).map_err(BatchError::Parse)? {
            Value::Object(scripts) => Ok(scripts),
            other => Err(BatchError::NotAMapping {
                found: json_kind(&other),
            }),
        }
    }

    fn save_raw_output(&self, chunk_index: i64, raw: &str) -> Result<PathBuf, BatchError> {
        let path = ScriptSettings::raw_output_path(&self.raw_output_dir, chunk_index);
        std::fs::create_dir_all(&self.raw_output_dir)
            .and_then(|_| std::fs::write(&path, raw))
            .map_err(|source| BatchError::RawOutput {
                path: path.clone(),
                source,
            })?;
        Ok(path)
    }
}

/// Group clips by chunk index, keeping first-seen chunk order and clip order.
fn group_by_chunk(clips: Vec<Clip>) -> Vec<(i64, Vec<Clip>)> {
    let mut groups: Vec<(i64, Vec<Clip>)> = Vec::new();

    for clip in clips {
        let key = clip.batch_key();
        match groups.iter().position(|(index, _)| *index == key) {
            Some(pos) => groups[pos].1.push(clip),
            None => groups.push((key, vec![clip])),
        }
    }

    groups
}

/// Validated script object for a clip id.
fn lookup_script(
    scripts: &Map<String, Value>,
    id: &str,
) -> Result<Map<String, Value>, FallbackReason> {
    let entry = scripts.get(id).ok_or(FallbackReason::MissingEntry)?;
    let Value::Object(script) = entry else {
        return Err(FallbackReason::NotAMapping);
    };

    let missing = missing_script_fields(script);
    if !missing.is_empty() {
        return Err(FallbackReason::MissingFields(missing));
    }

    Ok(script.clone())
}

/// Write clips as pretty-printed JSON, replacing any existing file.
pub fn save_clips_with_scripts(clips: &[Clip], path: &Path) -> ScriptResult<()> {
    let json = serde_json::to_string_pretty(clips)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| ScriptError::WriteOutput {
            path: path.to_path_buf(),
            source,
        })?;
    }

    std::fs::write(path, json).map_err(|source| ScriptError::WriteOutput {
        path: path.to_path_buf(),
        source,
    })?;

    info!("Saved {} clips with scripts to {}", clips.len(), path.display());
    Ok(())
}
