//! Script command - write narration scripts for titled clips.

use super::{expand_path, load_config};
use anyhow::{Context, Result};
use autoclip_config::Config;
use autoclip_script::{run_script_step, BatchOutcome, OllamaGenerator, ScriptSettings};
use colored::Colorize;
use tracing::debug;

/// Options for the script command.
pub struct ScriptArgs {
    pub input: String,
    pub output: Option<String>,
    pub metadata_dir: Option<String>,
    pub prompt: Option<String>,
    pub category: Option<String>,
    pub model: Option<String>,
}

/// Run the script command.
pub fn run(args: ScriptArgs) -> Result<()> {
    let config = expand_config_paths(load_config()?)?;
    let settings = resolve_settings(&config, &args)?;
    let input = expand_path(&args.input)?;
    let output = args.output.as_deref().map(expand_path).transpose()?;

    let mut generator = OllamaGenerator::from_config(&config.ollama)
        .context("Failed to create Ollama client")?;
    if let Some(model) = &args.model {
        generator = generator.with_model(model);
    }

    println!("{} {}", "Clips:".cyan().bold(), input.display());
    println!("{} {}", "Prompt:".cyan(), settings.script_prompt_path.display());
    println!("{} {}", "Model:".cyan(), generator.model());
    println!("{}", "─".repeat(70));

    if !generator.is_available() {
        println!(
            "{} Ollama is not reachable at {}; clips will get template scripts.",
            "Warning:".yellow().bold(),
            generator.host()
        );
    }

    let report = run_script_step(&input, output.as_deref(), &settings, generator)
        .context("Narration script step failed")?;

    println!();
    for batch in &report.batches {
        match &batch.outcome {
            BatchOutcome::Generated { accepted, fallbacks } => {
                let marker = if fallbacks.is_empty() {
                    "✓".green()
                } else {
                    "◐".yellow()
                };
                println!(
                    "  {} Chunk {}: {}/{} generated",
                    marker, batch.chunk_index, accepted, batch.clip_count
                );
                for fallback in fallbacks {
                    println!(
                        "      {} clip {} uses a template ({:?})",
                        "•".dimmed(),
                        fallback.id,
                        fallback.reason
                    );
                }
            }
            BatchOutcome::Degraded(e) => {
                println!(
                    "  {} Chunk {}: {} template scripts ({})",
                    "✗".red(),
                    batch.chunk_index,
                    batch.clip_count,
                    e
                );
            }
        }
    }

    let saved_to = output.unwrap_or_else(|| settings.default_output_path());
    println!();
    println!(
        "{} {} clips ({} generated, {} from templates) saved to {}",
        "Done:".green().bold(),
        report.clips.len(),
        report.generated_count(),
        report.fallback_count(),
        saved_to.display()
    );

    Ok(())
}

fn expand_config_paths(mut config: Config) -> Result<Config> {
    config.script.metadata_dir = expand_path(&config.script.metadata_dir)?
        .to_string_lossy()
        .to_string();
    config.script.prompt_dir = expand_path(&config.script.prompt_dir)?
        .to_string_lossy()
        .to_string();
    if let Some(path) = &config.script.script_prompt_path {
        config.script.script_prompt_path = Some(expand_path(path)?.to_string_lossy().to_string());
    }
    Ok(config)
}

fn resolve_settings(config: &Config, args: &ScriptArgs) -> Result<ScriptSettings> {
    let mut settings = ScriptSettings::from_config(config, args.category.as_deref());

    if let Some(dir) = &args.metadata_dir {
        settings = settings.with_metadata_dir(expand_path(dir)?);
    }
    if let Some(prompt) = &args.prompt {
        settings = settings.with_script_prompt_path(expand_path(prompt)?);
    }

    debug!(
        "Metadata dir {}, prompt {}",
        settings.metadata_dir.display(),
        settings.script_prompt_path.display()
    );
    Ok(settings)
}
