//! Prata CLI entry point.

use anyhow::Result;
use clap::Parser;
use prata::cli::{commands, Cli, Commands};
use prata::config::Settings;
use prata::credentials;
use tracing::{debug, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("prata={}", log_level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    // Load .env with override semantics, then report on the API key.
    match credentials::load_default() {
        Ok(true) => debug!("loaded .env file"),
        Ok(false) => debug!("no .env file found"),
        Err(e) => warn!("{}", e),
    }
    credentials::report();

    // Load configuration
    let settings = match &cli.config {
        Some(path) => Settings::load_from(Some(&std::path::PathBuf::from(path)))?,
        None => Settings::load()?,
    };

    // Execute command
    match &cli.command {
        Commands::Start { url, token, room } => {
            commands::run_start(url, token, room, settings).await?;
        }

        Commands::Doctor => {
            commands::run_doctor(&settings)?;
        }

        Commands::Config { action } => {
            commands::run_config(action, settings)?;
        }
    }

    Ok(())
}
