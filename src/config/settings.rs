//! Configuration settings for Prata.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub agent: AgentSettings,
    pub session: SessionSettings,
    pub weather: WeatherSettings,
    pub search: SearchSettings,
    pub email: EmailSettings,
}


/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Agent and realtime model settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentSettings {
    /// Realtime model variant.
    pub model: String,
    /// Voice used for spoken output.
    pub voice: String,
    /// Maximum LLM round-trips when generating a single reply.
    pub max_reply_iterations: usize,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            model: "gpt-4o-realtime-preview".to_string(),
            voice: "coral".to_string(),
            max_reply_iterations: 8,
        }
    }
}

/// Room input settings for a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// Accept video input from the room.
    pub video_enabled: bool,
    /// Noise cancellation algorithm (bvc, off).
    pub noise_cancellation: String,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            video_enabled: true,
            noise_cancellation: "bvc".to_string(),
        }
    }
}

/// Weather tool settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherSettings {
    /// Base URL of the wttr.in-compatible weather service.
    pub endpoint: String,
}

impl Default for WeatherSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://wttr.in".to_string(),
        }
    }
}

/// Web search tool settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Base URL of the DuckDuckGo Instant Answer API.
    pub endpoint: String,
    /// Maximum related results to include beyond the abstract.
    pub max_results: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://api.duckduckgo.com".to_string(),
            max_results: 3,
        }
    }
}

/// Email tool settings.
///
/// The SMTP password is never stored in the config file; `password_env`
/// names the environment variable it is read from at send time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailSettings {
    /// SMTP server hostname.
    pub smtp_host: String,
    /// SMTP server port (465 for implicit TLS, otherwise STARTTLS).
    pub smtp_port: u16,
    /// SMTP username.
    pub username: String,
    /// Environment variable holding the SMTP password.
    pub password_env: String,
    /// From address for outgoing mail.
    pub from: String,
}

impl Default for EmailSettings {
    fn default() -> Self {
        Self {
            smtp_host: String::new(),
            smtp_port: 587,
            username: String::new(),
            password_env: "SMTP_PASSWORD".to_string(),
            from: String::new(),
        }
    }
}

impl EmailSettings {
    /// Check whether enough is configured to attempt a send.
    pub fn is_configured(&self) -> bool {
        !self.smtp_host.is_empty() && !self.username.is_empty() && !self.from.is_empty()
    }
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to the default configuration file.
    pub fn save(&self) -> crate::error::Result<()> {
        self.save_to(&Self::default_config_path())
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::PrataError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("prata")
            .join("config.toml")
    }
}
