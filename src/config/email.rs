//! Email configuration (Resend)

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;

use super::error::ValidationError;

/// Email configuration.
///
/// Mail is optional: when no API key is configured the server runs with a
/// no-op mailer that logs instead of sending. That decision is made once at
/// startup, see `adapters::email::WelcomeMailer::from_config`.
#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    /// Resend API key; absent means mail delivery is disabled
    #[serde(default)]
    pub resend_api_key: Option<Secret<String>>,

    /// From email address
    #[serde(default = "default_from_email")]
    pub from_email: String,

    /// From name
    #[serde(default = "default_from_name")]
    pub from_name: String,
}

impl EmailConfig {
    /// Whether an API key is present
    pub fn is_configured(&self) -> bool {
        self.resend_api_key.is_some()
    }

    /// Get formatted "From" header value
    pub fn from_header(&self) -> String {
        format!("{} <{}>", self.from_name, self.from_email)
    }

    /// Validate email configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(key) = &self.resend_api_key {
            if !key.expose_secret().starts_with("re_") {
                return Err(ValidationError::InvalidResendKey);
            }
            if !self.from_email.contains('@') {
                return Err(ValidationError::InvalidFromEmail);
            }
        }
        Ok(())
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            resend_api_key: None,
            from_email: default_from_email(),
            from_name: default_from_name(),
        }
    }
}

fn default_from_email() -> String {
    "noreply@pulsefeed.dev".to_string()
}

fn default_from_name() -> String {
    "Pulsefeed".to_string()
}
