//! Error types for Prata.

use thiserror::Error;

/// Library-level error type for Prata operations.
#[derive(Error, Debug)]
pub enum PrataError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Credential error: {0}")]
    Credentials(String),

    #[error("Room connection failed: {0}")]
    Connection(String),

    #[error("Session error: {0}")]
    Session(String),

    #[error("Tool error: {0}")]
    Tool(String),

    #[error("OpenAI API error: {0}")]
    OpenAI(String),

    #[error("Email error: {0}")]
    Email(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for Prata operations.
pub type Result<T> = std::result::Result<T, PrataError>;
