//! Configuration module for Prata.
//!
//! Handles loading and managing application settings and the fixed
//! assistant instruction texts.

mod instructions;
mod settings;

pub use instructions::{AGENT_INSTRUCTIONS, SESSION_INSTRUCTIONS};
pub use settings::{
    AgentSettings, EmailSettings, GeneralSettings, SearchSettings, SessionSettings, Settings,
    WeatherSettings,
};
