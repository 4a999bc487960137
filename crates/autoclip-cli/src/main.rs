//! Autoclip CLI - narration scripts for highlight clips

mod commands;

use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Autoclip - narration scripts for video highlight clips
#[derive(Parser)]
#[command(name = "autoclip")]
#[command(version)]
#[command(about = "Write narration scripts for video highlight clips", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize Autoclip (create config file)
    Init,

    /// Manage configuration
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate narration scripts for titled clips
    Script {
        /// Clip list with titles (JSON array)
        input: String,

        /// Where to write the clips with scripts (default: <metadata-dir>/step7_scripts.json)
        #[arg(short, long)]
        output: Option<String>,

        /// Metadata directory for raw model output and default output (default: from config)
        #[arg(long)]
        metadata_dir: Option<String>,

        /// Prompt template file (default: from config)
        #[arg(short, long)]
        prompt: Option<String>,

        /// Video category; picks <prompt-dir>/<category>/script.txt when present
        #[arg(short, long)]
        category: Option<String>,

        /// Model to use for generation (default: from config)
        #[arg(short, long)]
        model: Option<String>,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., ollama.model)
        key: String,

        /// Value to set
        value: String,
    },
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("autoclip=debug,info"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("autoclip=info,warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Init => commands::init::run(),
        Commands::Config(cmd) => match cmd {
            ConfigCommands::Show => commands::config::show(),
            ConfigCommands::Set { key, value } => commands::config::set(&key, &value),
        },
        Commands::Script {
            input,
            output,
            metadata_dir,
            prompt,
            category,
            model,
        } => commands::script::run(commands::script::ScriptArgs {
            input,
            output,
            metadata_dir,
            prompt,
            category,
            model,
        }),
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}
