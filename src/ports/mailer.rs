//! Mailer port - interface for outbound notification mail.

use async_trait::async_trait;

use crate::domain::{EmailAddress, MailError};

/// Port for sending the welcome notification.
///
/// Whether mail is actually delivered is a configuration-resolved capability:
/// the adapter selected at startup either talks to the provider or is a
/// logging no-op. Callers never probe for configuration at call time.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Sends the welcome mail to a new subscriber.
    ///
    /// Best-effort: callers run this in a detached task and only log
    /// failures. A mail error must never fail or roll back a subscription.
    async fn send_welcome(&self, recipient: &EmailAddress) -> Result<(), MailError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[allow(dead_code)]
    fn assert_object_safe(_: &dyn Mailer) {}
}
