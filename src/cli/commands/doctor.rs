//! Doctor command - verify credentials and configuration.

use crate::cli::Output;
use crate::config::Settings;
use crate::credentials::{self, KeyScope, OPENAI_KEY_VAR};
use console::style;

/// Check result for a single item.
#[derive(Debug)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
}

impl CheckResult {
    fn ok(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Ok,
            message: message.to_string(),
            hint: None,
        }
    }

    fn warning(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Warning,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn error(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Error,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn print(&self) {
        let icon = match self.status {
            CheckStatus::Ok => style("✓").green(),
            CheckStatus::Warning => style("!").yellow(),
            CheckStatus::Error => style("✗").red(),
        };

        println!("  {} {} - {}", icon, style(&self.name).bold(), self.message);

        if let Some(hint) = &self.hint {
            println!("    {} {}", style("→").dim(), style(hint).dim());
        }
    }
}

/// Run all diagnostic checks.
pub fn run_doctor(settings: &Settings) -> anyhow::Result<()> {
    Output::header("Prata Doctor");
    println!();
    println!("Checking credentials and configuration...\n");

    let mut checks = Vec::new();

    println!("{}", style("API Configuration").bold());
    let api_check = check_openai_api_key();
    api_check.print();
    checks.push(api_check);

    println!();

    println!("{}", style("Room Connection").bold());
    for check in [
        check_env_var("LIVEKIT_URL", "set it to your framework's WebSocket URL"),
        check_env_var("LIVEKIT_TOKEN", "set it to a room access token"),
    ] {
        check.print();
        checks.push(check);
    }

    println!();

    println!("{}", style("Email").bold());
    let email_check = check_email(settings);
    email_check.print();
    checks.push(email_check);

    println!();

    println!("{}", style("Configuration").bold());
    let config_check = check_config_file();
    config_check.print();
    checks.push(config_check);

    println!();

    let errors = checks.iter().filter(|c| c.status == CheckStatus::Error).count();
    let warnings = checks.iter().filter(|c| c.status == CheckStatus::Warning).count();

    if errors > 0 {
        Output::error(&format!(
            "{} error(s) found. Please fix them before starting the worker.",
            errors
        ));
        std::process::exit(1);
    } else if warnings > 0 {
        Output::warning(&format!("All checks passed with {} warning(s).", warnings));
    } else {
        Output::success("All checks passed! Prata is ready.");
    }

    Ok(())
}

/// Check the OpenAI API key shape using the credential diagnostics.
fn check_openai_api_key() -> CheckResult {
    match credentials::diagnose(std::env::var(OPENAI_KEY_VAR).ok().as_deref()) {
        Some(d) if d.scope != KeyScope::InvalidFormat => CheckResult::ok(
            OPENAI_KEY_VAR,
            &format!("configured ({}, {})", d.preview, d.scope),
        ),
        Some(_) => CheckResult::warning(
            OPENAI_KEY_VAR,
            "set but format looks unusual",
            "Expected format: sk-... (OpenAI API key)",
        ),
        None => CheckResult::error(
            OPENAI_KEY_VAR,
            "not set",
            "Set with: export OPENAI_API_KEY='sk-...' (or put it in .env)",
        ),
    }
}

/// Check a plain environment variable is present and non-empty.
fn check_env_var(name: &str, hint: &str) -> CheckResult {
    match std::env::var(name) {
        Ok(v) if !v.is_empty() => CheckResult::ok(name, "configured"),
        _ => CheckResult::warning(name, "not set", hint),
    }
}

/// Check email tool configuration.
fn check_email(settings: &Settings) -> CheckResult {
    if settings.email.is_configured() {
        CheckResult::ok(
            "SMTP",
            &format!("{}:{}", settings.email.smtp_host, settings.email.smtp_port),
        )
    } else {
        CheckResult::warning(
            "SMTP",
            "not configured",
            "The send_email tool will report an error until [email] is filled in",
        )
    }
}

/// Check if config file exists.
fn check_config_file() -> CheckResult {
    let config_path = Settings::default_config_path();
    if config_path.exists() {
        CheckResult::ok("Config file", &format!("{}", config_path.display()))
    } else {
        CheckResult::warning(
            "Config file",
            "using defaults",
            "Create with: prata config show > config.toml",
        )
    }
}
