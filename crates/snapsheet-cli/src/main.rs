use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use snapsheet_core::SheetConfig;

mod commands;

#[derive(Parser)]
#[command(name = "snapsheet")]
#[command(author, version, about = "Drive a bottom sheet snap engine from the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (defaults to ~/.config/snapsheet/config.toml)
    #[arg(short = 'c', long = "config", global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short = 'f', long = "format", value_enum, default_value_t = OutputFormat::Text, global = true)]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the resolved snap point table
    Table,
    /// Replay a gesture script against the engine
    Simulate {
        /// TOML script describing drags, scrolls and snap requests
        script: PathBuf,
        /// Print every frame instead of only events
        #[arg(long)]
        frames: bool,
    },
    /// Inspect or create the configuration file
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Print the configuration file path
    Path,
    /// Write the default configuration if none exists
    Init,
}

fn main() -> Result<()> {
    // Logs go to stderr so JSON output stays parseable
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => SheetConfig::from_path(path)?,
        None => SheetConfig::load()?,
    };

    match cli.command {
        Commands::Table => commands::table::run(&config, cli.format),
        Commands::Simulate { script, frames } => {
            commands::simulate::run(&config, &script, frames, cli.format)
        }
        Commands::Config { action } => match action {
            Some(ConfigAction::Show) | None => commands::config::show(&config, cli.format),
            Some(ConfigAction::Path) => commands::config::path(cli.config.as_deref()),
            Some(ConfigAction::Init) => commands::config::init(),
        },
    }
}
