//! Start command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::worker::{self, WorkerOptions};
use anyhow::Result;

/// Run the start command: hand one room session to the worker.
pub async fn run_start(url: &str, token: &str, room: &str, settings: Settings) -> Result<()> {
    Output::info(&format!("Joining room '{}' at {}", room, url));

    let options = WorkerOptions {
        settings,
        url: url.to_string(),
        token: token.to_string(),
        room: room.to_string(),
    };

    match worker::run(options).await {
        Ok(()) => {
            Output::success("Session finished.");
            Ok(())
        }
        Err(e) => {
            Output::error(&format!("Worker failed: {}", e));
            Err(e.into())
        }
    }
}
