//! In-memory subscriber store for testing.
//!
//! Synchronous and deterministic; not for production use. Uses `.expect()`
//! on lock operations which will panic if locks are poisoned, which is
//! acceptable for test code.

use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::{EmailAddress, RepositoryError, Subscriber};
use crate::ports::SubscriberRepository;

/// In-memory implementation of [`SubscriberRepository`].
///
/// Enforces email uniqueness the way the Postgres adapter's unique index
/// does, so conflict behavior matches in tests.
pub struct InMemorySubscriberRepository {
    subscribers: RwLock<Vec<Subscriber>>,
}

impl InMemorySubscriberRepository {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            subscribers: RwLock::new(Vec::new()),
        }
    }

    /// Number of persisted subscribers (for test assertions).
    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .read()
            .expect("InMemorySubscriberRepository: lock poisoned")
            .len()
    }
}

impl Default for InMemorySubscriberRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SubscriberRepository for InMemorySubscriberRepository {
    async fn create_schema(&self) -> Result<(), RepositoryError> {
        Ok(())
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<Subscriber>, RepositoryError> {
        Ok(self
            .subscribers
            .read()
            .expect("InMemorySubscriberRepository: lock poisoned")
            .iter()
            .find(|s| s.email() == email)
            .cloned())
    }

    async fn create(&self, email: &EmailAddress) -> Result<Subscriber, RepositoryError> {
        let mut subscribers = self
            .subscribers
            .write()
            .expect("InMemorySubscriberRepository: lock poisoned");

        if subscribers.iter().any(|s| s.email() == email) {
            return Err(RepositoryError::Duplicate(email.to_string()));
        }

        let subscriber = Subscriber::new(email.clone());
        subscribers.push(subscriber.clone());
        Ok(subscriber)
    }

    async fn list(&self) -> Result<Vec<Subscriber>, RepositoryError> {
        let mut subscribers = self
            .subscribers
            .read()
            .expect("InMemorySubscriberRepository: lock poisoned")
            .clone();
        subscribers.sort_by(|a, b| b.subscribed_at().cmp(&a.subscribed_at()));
        Ok(subscribers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn email(raw: &str) -> EmailAddress {
        EmailAddress::parse(raw).unwrap()
    }

    #[tokio::test]
    async fn create_then_find_roundtrips() {
        let repository = InMemorySubscriberRepository::new();

        let created = repository.create(&email("a@x.com")).await.unwrap();
        let found = repository.find_by_email(&email("a@x.com")).await.unwrap();

        assert_eq!(found.unwrap().id(), created.id());
    }

    #[tokio::test]
    async fn find_missing_email_returns_none() {
        let repository = InMemorySubscriberRepository::new();
        assert!(repository
            .find_by_email(&email("a@x.com"))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn create_duplicate_email_is_rejected() {
        let repository = InMemorySubscriberRepository::new();
        repository.create(&email("a@x.com")).await.unwrap();

        let second = repository.create(&email("a@x.com")).await;
        assert!(matches!(second, Err(RepositoryError::Duplicate(_))));
        assert_eq!(repository.subscriber_count(), 1);
    }

    #[tokio::test]
    async fn list_returns_all_subscribers() {
        let repository = InMemorySubscriberRepository::new();
        repository.create(&email("a@x.com")).await.unwrap();
        repository.create(&email("b@x.com")).await.unwrap();

        let listed = repository.list().await.unwrap();
        assert_eq!(listed.len(), 2);
    }
}
