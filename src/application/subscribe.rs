//! Subscribe use case: validate, persist, then notify in the background.

use std::sync::Arc;

use crate::domain::{EmailAddress, SubscribeError, Subscriber};
use crate::ports::{Mailer, SubscriberRepository};

/// Raw subscribe input as received from the request surface.
#[derive(Debug, Clone, Default)]
pub struct SubscribeCommand {
    pub email: Option<String>,
}

/// Handles new email subscriptions.
pub struct SubscribeHandler {
    repository: Arc<dyn SubscriberRepository>,
    mailer: Arc<dyn Mailer>,
}

impl SubscribeHandler {
    pub fn new(repository: Arc<dyn SubscriberRepository>, mailer: Arc<dyn Mailer>) -> Self {
        Self { repository, mailer }
    }

    /// Subscribes an email address.
    ///
    /// Returns once the subscriber is persisted. The welcome mail is
    /// dispatched as a detached task: its outcome never affects the result
    /// and a failure is logged, not rolled back.
    pub async fn handle(&self, command: SubscribeCommand) -> Result<Subscriber, SubscribeError> {
        let email = EmailAddress::parse(command.email.unwrap_or_default())?;

        if self.repository.find_by_email(&email).await?.is_some() {
            return Err(SubscribeError::AlreadySubscribed(email.to_string()));
        }

        let subscriber = self.repository.create(&email).await?;
        tracing::info!(email = %email, subscriber_id = %subscriber.id(), "new subscription");

        let mailer = self.mailer.clone();
        tokio::spawn(async move {
            if let Err(e) = mailer.send_welcome(&email).await {
                tracing::warn!(email = %email, error = %e, "welcome mail failed");
            }
        });

        Ok(subscriber)
    }
}
