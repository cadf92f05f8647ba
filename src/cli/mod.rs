//! CLI module for Prata.

pub mod commands;
mod output;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Prata - Voice Assistant Agent
///
/// A worker that wires a realtime speech session to callable tools.
/// The name "Prata" comes from the Norwegian/Swedish word for "talk."
#[derive(Parser, Debug)]
#[command(name = "prata")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the worker and handle a room session
    Start {
        /// Framework WebSocket URL
        #[arg(long, env = "LIVEKIT_URL")]
        url: String,

        /// Room access token
        #[arg(long, env = "LIVEKIT_TOKEN")]
        token: String,

        /// Room to join
        #[arg(short, long, default_value = "assistant")]
        room: String,
    },

    /// Check credentials and configuration
    Doctor,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,
}
