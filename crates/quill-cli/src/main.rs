use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use quill_execution::{LogFormat, init_tracing};
use quill_infrastructure::ConfigService;

mod commands;

#[derive(Parser)]
#[command(name = "quill")]
#[command(about = "Quill - guided generation helpers for chat hosts", long_about = None)]
struct Cli {
    /// Use this config file instead of the platform default
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log Quill's internals to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect and manage the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Print the host commands an action would run
    Render {
        /// impersonate, continue, respond or swipe
        action: String,
        /// Text standing in for the chat input
        #[arg(long, default_value = "")]
        input: String,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the config file location
    Path,
    /// Print the effective configuration
    Show {
        /// Print as JSON instead of TOML
        #[arg(long)]
        json: bool,
    },
    /// Write the default configuration
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Check the configuration file for errors
    Validate,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "quill=debug" } else { "quill=warn" };
    // Nobody consumes the event stream in the CLI.
    let _events = init_tracing(filter, LogFormat::Pretty)?;

    let service = match cli.config {
        Some(path) => ConfigService::with_path(path),
        None => ConfigService::new()?,
    };

    match cli.command {
        Commands::Config { action } => match action {
            ConfigAction::Path => commands::config::path(&service),
            ConfigAction::Show { json } => commands::config::show(&service, json)?,
            ConfigAction::Init { force } => commands::config::init(&service, force)?,
            ConfigAction::Validate => commands::config::validate(&service)?,
        },
        Commands::Render {
            action,
            input,
            json,
        } => commands::render::run(&service, &action, &input, json)?,
    }

    Ok(())
}
