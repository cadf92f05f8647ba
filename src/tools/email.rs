//! Email sending tool using SMTP.

use super::{Tool, ToolOutput};
use crate::config::EmailSettings;
use crate::error::{PrataError, Result};
use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct EmailArgs {
    to: String,
    subject: String,
    body: String,
}

/// Send an email on the user's behalf.
pub struct EmailTool {
    config: EmailSettings,
}

impl EmailTool {
    pub fn new(config: EmailSettings) -> Self {
        Self { config }
    }

    async fn send(&self, args: &EmailArgs) -> Result<()> {
        let from: Mailbox = self.config.from.parse().map_err(|e| {
            PrataError::Email(format!("Invalid from address '{}': {}", self.config.from, e))
        })?;

        let to: Mailbox = args.to.parse().map_err(|e| {
            PrataError::Email(format!("Invalid recipient address '{}': {}", args.to, e))
        })?;

        let email = Message::builder()
            .from(from)
            .to(to)
            .subject(args.subject.clone())
            .body(args.body.clone())
            .map_err(|e| PrataError::Email(format!("Failed to build message: {}", e)))?;

        let password = std::env::var(&self.config.password_env).map_err(|_| {
            PrataError::Email(format!(
                "SMTP password not set; export {} to enable sending",
                self.config.password_env
            ))
        })?;

        let creds = Credentials::new(self.config.username.clone(), password);

        // Port 465 is implicit TLS; anything else negotiates STARTTLS.
        let mailer = if self.config.smtp_port == 465 {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&self.config.smtp_host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.smtp_host)
        }
        .map_err(|e| PrataError::Email(format!("SMTP transport error: {}", e)))?
        .port(self.config.smtp_port)
        .credentials(creds)
        .build();

        mailer
            .send(email)
            .await
            .map_err(|e| PrataError::Email(format!("Failed to send email: {}", e)))?;

        Ok(())
    }
}

#[async_trait]
impl Tool for EmailTool {
    fn name(&self) -> &'static str {
        "send_email"
    }

    fn description(&self) -> &'static str {
        "Send an email on the user's behalf. \
        Confirm the recipient, subject, and body with the user before calling."
    }

    fn parameters(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "to": {
                    "type": "string",
                    "description": "Recipient email address"
                },
                "subject": {
                    "type": "string",
                    "description": "Email subject line"
                },
                "body": {
                    "type": "string",
                    "description": "Plain text body of the email"
                }
            },
            "required": ["to", "subject", "body"]
        })
    }

    async fn call(&self, args: serde_json::Value) -> ToolOutput {
        let args: EmailArgs = match serde_json::from_value(args) {
            Ok(a) => a,
            Err(e) => return ToolOutput::error(format!("Invalid email arguments: {}", e)),
        };

        if !self.config.is_configured() {
            return ToolOutput::error(
                "Email is not configured; set smtp_host, username, and from in the [email] \
                section of the config file.",
            );
        }

        match self.send(&args).await {
            Ok(()) => ToolOutput::success(format!("Email sent to {}.", args.to)),
            Err(e) => ToolOutput::error(e.to_string()),
        }
    }
}
