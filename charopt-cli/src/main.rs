//! charopt
//!
//! Inspect the character creation options available to the builder.

mod commands;
mod config;
mod state;

use clap::Parser;
use commands::Command;
use config::{CliOverrides, ConfigLoader};
use state::AppState;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// charopt - character creation options browser
#[derive(Parser, Debug)]
#[command(name = "charopt")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, env = "CHAROPT_CONFIG")]
    config: Option<PathBuf>,

    /// Override the directory of user-supplied option files
    #[arg(short, long)]
    overrides: Option<PathBuf>,

    /// Enable an optional module (repeatable)
    #[arg(short = 'm', long = "enable-module")]
    enable_modules: Vec<String>,

    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    init_tracing();

    // Parse command line arguments
    let args = Args::parse();

    tracing::debug!("Starting charopt v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config_loader = ConfigLoader::new(
        args.config,
        CliOverrides {
            overrides_dir: args.overrides,
            enabled_modules: args.enable_modules,
        },
    );
    let loaded_config = config_loader.load().map_err(|e| {
        tracing::error!("Failed to load configuration: {}", e);
        e
    })?;

    let state = AppState::new(&loaded_config);

    let mut stdout = std::io::stdout().lock();
    commands::run(args.command, &state, &mut stdout)
        .await
        .map_err(|e| {
            tracing::error!("Command failed: {:#}", e);
            e
        })
}

/// Initialize the tracing subscriber with environment-based filtering.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
