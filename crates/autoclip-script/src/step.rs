//! The narration step as run by the pipeline.

use std::path::Path;

use autoclip_core::{clips_from_json, Clip};
use tracing::info;

use crate::error::{ScriptError, ScriptResult};
use crate::generator::{save_clips_with_scripts, ScriptGenerator};
use crate::outcome::ScriptReport;
use crate::service::TextGenerator;
use crate::settings::ScriptSettings;

/// Read a JSON array of titled clips.
pub fn load_clips(path: &Path) -> ScriptResult<Vec<Clip>> {
    let json = std::fs::read_to_string(path).map_err(|source| ScriptError::ReadInput {
        path: path.to_path_buf(),
        source,
    })?;

    clips_from_json(&json).map_err(|source| ScriptError::InvalidInput {
        path: path.to_path_buf(),
        source,
    })
}

/// Load clips, attach scripts, and save them.
///
/// The result goes to `output_path`, or `step7_scripts.json` in the metadata
/// directory when none is given.
pub fn run_script_step<G: TextGenerator>(
    input_path: &Path,
    output_path: Option<&Path>,
    settings: &ScriptSettings,
    service: G,
) -> ScriptResult<ScriptReport> {
    info!("Starting narration script step for {}", input_path.display());

    let clips = load_clips(input_path)?;
    let generator = ScriptGenerator::new(settings, service)?;
    let report = generator.generate_scripts_with_report(clips);

    let default_output = settings.default_output_path();
    let output_path = output_path.unwrap_or(&default_output);
    save_clips_with_scripts(&report.clips, output_path)?;

    info!(
        "Narration script step finished: {} clips, {} degraded batches",
        report.clips.len(),
        report.degraded_batches().count()
    );

    Ok(report)
}
