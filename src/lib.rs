//! Prata - Voice Assistant Agent
//!
//! A worker that wires a realtime speech session (VAD, realtime LLM with
//! a voice, noise cancellation) to a small set of callable tools: weather
//! lookup, web search, and email sending.
//!
//! The name "Prata" comes from the Norwegian/Swedish word for "talk."
//!
//! # Overview
//!
//! The hosting framework assigns one job per room conversation. Per job,
//! the worker connects to the room, builds an agent session from the
//! configured components, starts it bound to an [`agent::Assistant`], and
//! issues one opening reply. Turn-taking, audio transport, and tool
//! invocation then run inside the session loop.
//!
//! # Architecture
//!
//! - `credentials` - Environment/credential loading and diagnostics
//! - `config` - Configuration and fixed instruction texts
//! - `tools` - Tool trait, registry, and the built-in tools
//! - `agent` - Assistant definition, chat seam, session glue
//! - `room` - Job context and room connection seam
//! - `worker` - Per-job entrypoint and worker run loop
//!
//! # Example
//!
//! ```rust,no_run
//! use prata::config::Settings;
//! use prata::worker::{self, WorkerOptions};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     worker::run(WorkerOptions {
//!         settings,
//!         url: "wss://example.livekit.cloud".to_string(),
//!         token: std::env::var("LIVEKIT_TOKEN")?,
//!         room: "assistant".to_string(),
//!     })
//!     .await?;
//!     Ok(())
//! }
//! ```

pub mod agent;
pub mod cli;
pub mod config;
pub mod credentials;
pub mod error;
pub mod room;
pub mod tools;
pub mod worker;

pub use error::{PrataError, Result};
