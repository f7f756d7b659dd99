//! PostgreSQL implementation of SubscriberRepository.

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::{EmailAddress, RepositoryError, Subscriber, SubscriberId, Timestamp};
use crate::ports::SubscriberRepository;

/// PostgreSQL implementation of [`SubscriberRepository`].
#[derive(Clone)]
pub struct PgSubscriberRepository {
    pool: PgPool,
}

impl PgSubscriberRepository {
    /// Creates a new PgSubscriberRepository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SubscriberRepository for PgSubscriberRepository {
    async fn create_schema(&self) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS subscribers (
                id UUID PRIMARY KEY,
                email TEXT NOT NULL UNIQUE,
                is_active BOOLEAN NOT NULL DEFAULT TRUE,
                subscribed_at TIMESTAMPTZ NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(format!("Failed to create schema: {}", e)))?;

        Ok(())
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<Subscriber>, RepositoryError> {
        let row = sqlx::query(
            "SELECT id, email, is_active, subscribed_at FROM subscribers WHERE email = $1",
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(format!("Failed to fetch subscriber: {}", e)))?;

        match row {
            Some(row) => Ok(Some(row_to_subscriber(row)?)),
            None => Ok(None),
        }
    }

    async fn create(&self, email: &EmailAddress) -> Result<Subscriber, RepositoryError> {
        let subscriber = Subscriber::new(email.clone());

        sqlx::query(
            r#"
            INSERT INTO subscribers (id, email, is_active, subscribed_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(subscriber.id().as_uuid())
        .bind(subscriber.email().as_str())
        .bind(subscriber.is_active())
        .bind(subscriber.subscribed_at().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                RepositoryError::Duplicate(email.to_string())
            }
            _ => RepositoryError::Database(format!("Failed to insert subscriber: {}", e)),
        })?;

        Ok(subscriber)
    }

    async fn list(&self) -> Result<Vec<Subscriber>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT id, email, is_active, subscribed_at FROM subscribers ORDER BY subscribed_at DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(format!("Failed to list subscribers: {}", e)))?;

        rows.into_iter().map(row_to_subscriber).collect()
    }
}

fn row_to_subscriber(row: sqlx::postgres::PgRow) -> Result<Subscriber, RepositoryError> {
    let id: uuid::Uuid = row
        .try_get("id")
        .map_err(|e| RepositoryError::Database(format!("Failed to get id: {}", e)))?;

    let email: String = row
        .try_get("email")
        .map_err(|e| RepositoryError::Database(format!("Failed to get email: {}", e)))?;
    let email = EmailAddress::parse(&email)
        .map_err(|e| RepositoryError::Database(format!("Invalid stored email: {}", e)))?;

    let is_active: bool = row
        .try_get("is_active")
        .map_err(|e| RepositoryError::Database(format!("Failed to get is_active: {}", e)))?;

    let subscribed_at: chrono::DateTime<chrono::Utc> = row
        .try_get("subscribed_at")
        .map_err(|e| RepositoryError::Database(format!("Failed to get subscribed_at: {}", e)))?;

    Ok(Subscriber::reconstitute(
        SubscriberId::from_uuid(id),
        email,
        is_active,
        Timestamp::from_datetime(subscribed_at),
    ))
}
