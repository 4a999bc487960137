//! Initialize autoclip.

use super::get_paths;
use anyhow::{Context, Result};
use autoclip_config::Config;
use colored::Colorize;

pub fn run() -> Result<()> {
    let paths = get_paths()?;

    // Check if already initialized
    if paths.is_initialized() {
        println!(
            "{} autoclip is already initialized.",
            "Note:".yellow().bold()
        );
        println!("  Config: {}", paths.config_file.display());
        return Ok(());
    }

    println!("{}", "Initializing autoclip...".cyan().bold());

    paths
        .ensure_dirs()
        .context("Failed to create directories")?;
    println!("  {} Created directories", "✓".green());

    Config::create_default_file(&paths.config_file)
        .context("Failed to create config file")?;
    println!(
        "  {} Created config: {}",
        "✓".green(),
        paths.config_file.display()
    );

    println!();
    println!("{}", "autoclip initialized successfully!".green().bold());
    println!();
    println!("Next steps:");
    println!(
        "  1. Point it at your prompts: {}",
        "autoclip config set script.prompt_dir ./prompt".cyan()
    );
    println!(
        "  2. Write scripts: {}",
        "autoclip script output/metadata/step4_titles.json".cyan()
    );

    Ok(())
}
