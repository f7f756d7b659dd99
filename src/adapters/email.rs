//! Welcome mail delivery over the Resend HTTP API.
//!
//! Mail is a configuration-resolved capability: [`WelcomeMailer::from_config`]
//! decides once at startup whether a real provider client or a logging no-op
//! backs the [`Mailer`] port. Call sites never check configuration again.

use async_trait::async_trait;
use secrecy::{ExposeSecret, Secret};
use serde_json::json;

use crate::config::EmailConfig;
use crate::domain::{EmailAddress, MailError};
use crate::ports::Mailer;

const RESEND_ENDPOINT: &str = "https://api.resend.com/emails";

const WELCOME_SUBJECT: &str = "Welcome to Pulsefeed";

/// Configuration-resolved mail capability.
pub enum WelcomeMailer {
    /// Mail is configured; deliver through Resend.
    Resend(ResendMailer),
    /// No API key configured; log and succeed trivially.
    Disabled,
}

impl WelcomeMailer {
    /// Resolves the capability from configuration. Called once at startup.
    pub fn from_config(config: &EmailConfig) -> Self {
        match &config.resend_api_key {
            Some(api_key) => WelcomeMailer::Resend(ResendMailer::new(
                api_key.clone(),
                config.from_header(),
            )),
            None => {
                tracing::warn!("no mail API key configured, welcome mail disabled");
                WelcomeMailer::Disabled
            }
        }
    }

    /// Whether mail will actually be sent.
    pub fn is_enabled(&self) -> bool {
        matches!(self, WelcomeMailer::Resend(_))
    }
}

#[async_trait]
impl Mailer for WelcomeMailer {
    async fn send_welcome(&self, recipient: &EmailAddress) -> Result<(), MailError> {
        match self {
            WelcomeMailer::Resend(mailer) => mailer.send_welcome(recipient).await,
            WelcomeMailer::Disabled => {
                tracing::info!(recipient = %recipient, "mail disabled, skipping welcome mail");
                Ok(())
            }
        }
    }
}

/// Resend API client for the welcome mail.
pub struct ResendMailer {
    client: reqwest::Client,
    api_key: Secret<String>,
    from_header: String,
}

impl ResendMailer {
    pub fn new(api_key: Secret<String>, from_header: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            from_header,
        }
    }

    async fn send_welcome(&self, recipient: &EmailAddress) -> Result<(), MailError> {
        let response = self
            .client
            .post(RESEND_ENDPOINT)
            .bearer_auth(self.api_key.expose_secret())
            .json(&json!({
                "from": self.from_header,
                "to": [recipient.as_str()],
                "subject": WELCOME_SUBJECT,
                "html": welcome_body(),
            }))
            .send()
            .await
            .map_err(|e| MailError::Request(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(MailError::Rejected(format!("{}: {}", status, body)));
        }

        tracing::debug!(recipient = %recipient, "welcome mail sent");
        Ok(())
    }
}

fn welcome_body() -> String {
    concat!(
        "<p>Thank you for subscribing to <strong>Pulsefeed</strong>! ",
        "Your subscription is now active.</p>",
        "<p>You will receive live insight digests and early access to new features.</p>",
        "<p style=\"font-size:12px; color:#777;\">",
        "This is an automated message. Please do not reply.",
        "</p>",
    )
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unconfigured_email_resolves_to_disabled() {
        let mailer = WelcomeMailer::from_config(&EmailConfig::default());
        assert!(!mailer.is_enabled());
    }

    #[test]
    fn configured_email_resolves_to_resend() {
        let config = EmailConfig {
            resend_api_key: Some(Secret::new("re_abcd1234".to_string())),
            ..Default::default()
        };
        let mailer = WelcomeMailer::from_config(&config);
        assert!(mailer.is_enabled());
    }

    #[tokio::test]
    async fn disabled_mailer_succeeds_trivially() {
        let mailer = WelcomeMailer::Disabled;
        let recipient = EmailAddress::parse("a@x.com").unwrap();
        assert!(mailer.send_welcome(&recipient).await.is_ok());
    }

    #[test]
    fn welcome_body_is_html() {
        assert!(welcome_body().contains("<p>"));
    }
}
