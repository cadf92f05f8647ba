//! Credential loading and diagnostics.
//!
//! Loads key-value pairs from a local `.env` file into the process
//! environment with override semantics (file values win over anything
//! already set), then reports a masked diagnostic of the OpenAI API key.
//! A missing or malformed key is never fatal here; the first component
//! that actually needs the key surfaces the real failure.

use crate::error::{PrataError, Result};
use std::path::Path;
use tracing::{debug, info, warn};

/// Environment variable holding the OpenAI API key.
pub const OPENAI_KEY_VAR: &str = "OPENAI_API_KEY";

/// Scope of an OpenAI API key, derived from its prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyScope {
    /// Key starts with `sk-proj`.
    ProjectScoped,
    /// Key starts with `sk-` but not `sk-proj`.
    UserScoped,
    /// Key has neither recognized prefix.
    InvalidFormat,
}

impl std::fmt::Display for KeyScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeyScope::ProjectScoped => write!(f, "project-scoped"),
            KeyScope::UserScoped => write!(f, "user-scoped"),
            KeyScope::InvalidFormat => write!(f, "invalid format"),
        }
    }
}

/// Diagnostic summary of a loaded API key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyDiagnostics {
    /// Masked preview safe for logging.
    pub preview: String,
    /// Character length of the key.
    pub length: usize,
    /// Scope classification by prefix.
    pub scope: KeyScope,
}

/// Load environment variables from a file, overriding existing values.
///
/// Unlike the common "don't clobber" default, values from the file win
/// over anything already present in the process environment.
pub fn load_env_file(path: &Path) -> Result<()> {
    dotenvy::from_path_override(path).map_err(|e| {
        PrataError::Credentials(format!("failed to load {}: {}", path.display(), e))
    })
}

/// Load `./.env` if it exists. Returns whether a file was loaded.
pub fn load_default() -> Result<bool> {
    let path = Path::new(".env");
    if path.exists() {
        load_env_file(path)?;
        Ok(true)
    } else {
        Ok(false)
    }
}

/// Classify an API key by its prefix.
pub fn classify(key: &str) -> KeyScope {
    if key.starts_with("sk-proj") {
        KeyScope::ProjectScoped
    } else if key.starts_with("sk-") {
        KeyScope::UserScoped
    } else {
        KeyScope::InvalidFormat
    }
}

/// Build diagnostics for an optional key. Absent keys yield `None`.
pub fn diagnose(key: Option<&str>) -> Option<KeyDiagnostics> {
    let key = key?;
    Some(KeyDiagnostics {
        preview: masked(key),
        length: key.chars().count(),
        scope: classify(key),
    })
}

/// Read the OpenAI key from the environment and log a diagnostic.
pub fn report() -> Option<KeyDiagnostics> {
    let key = std::env::var(OPENAI_KEY_VAR).ok();
    let diagnostics = diagnose(key.as_deref());

    match &diagnostics {
        Some(d) => {
            info!(
                "OpenAI API key loaded: {} ({} characters, {})",
                d.preview, d.length, d.scope
            );
            if d.scope == KeyScope::InvalidFormat {
                warn!("OpenAI API key does not start with 'sk-'; check your .env file");
            }
        }
        None => {
            warn!("no OpenAI API key found; realtime model calls will fail");
        }
    }

    debug!("credential diagnostics complete");
    diagnostics
}

/// Mask a key for logging: first 15 characters, ellipsis, last 4.
/// Short keys are masked entirely.
fn masked(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() > 19 {
        let head: String = chars[..15].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}...{}", head, tail)
    } else {
        "*".repeat(chars.len())
    }
}
