//! Configuration commands.

use super::get_paths;
use anyhow::{Context, Result};
use autoclip_config::Config;
use colored::Colorize;

pub fn show() -> Result<()> {
    let paths = get_paths()?;

    println!("{}", "Current Configuration".cyan().bold());
    println!("{}", "─".repeat(50));

    if paths.config_file.exists() {
        let contents = std::fs::read_to_string(&paths.config_file)
            .context("Failed to read config file")?;
        println!("{}", contents);
    } else {
        println!(
            "{} No config file at {}, showing defaults.",
            "Note:".yellow(),
            paths.config_file.display()
        );
        println!();
        println!("{}", Config::default_config_string());
    }

    Ok(())
}

pub fn set(key: &str, value: &str) -> Result<()> {
    let paths = get_paths()?;

    let mut config = Config::load_from(&paths.config_file)
        .context("Failed to load config")?;

    config.set(key, value)?;

    config.save_to(&paths.config_file)
        .context("Failed to save config")?;

    println!(
        "{} Set {} = {}",
        "✓".green(),
        key.cyan(),
        value
    );

    Ok(())
}
