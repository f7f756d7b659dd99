//! SubscriberRepository port - interface to the subscriber store.

use async_trait::async_trait;

use crate::domain::{EmailAddress, RepositoryError, Subscriber};

/// Port for persisting and querying subscribers.
///
/// Implementations must enforce email uniqueness at the storage level:
/// `create` for an email that already exists returns
/// [`RepositoryError::Duplicate`] even when a concurrent request won the race
/// after the caller's `find_by_email` check.
#[async_trait]
pub trait SubscriberRepository: Send + Sync {
    /// Creates the backing schema if it does not exist. Called once at
    /// startup, before the first request is served.
    async fn create_schema(&self) -> Result<(), RepositoryError>;

    /// Looks up a subscriber by email.
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<Subscriber>, RepositoryError>;

    /// Persists a new active subscriber for the given email.
    async fn create(&self, email: &EmailAddress) -> Result<Subscriber, RepositoryError>;

    /// All persisted subscribers, newest first. Backs the read-only admin
    /// listing; this core never mutates through it.
    async fn list(&self) -> Result<Vec<Subscriber>, RepositoryError>;
}
