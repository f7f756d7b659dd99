//! Error types shared across the request and background paths.

use thiserror::Error;

/// Errors that occur during value object construction.
#[derive(Debug, Clone, Error)]
pub enum ValidationError {
    #[error("field '{field}' cannot be empty")]
    EmptyField { field: &'static str },

    #[error("field '{field}' has invalid format: {reason}")]
    InvalidFormat { field: &'static str, reason: String },
}

/// Errors surfaced by the subscriber store.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Unique-email constraint rejected the insert.
    #[error("email already exists: {0}")]
    Duplicate(String),

    #[error("database error: {0}")]
    Database(String),
}

/// Errors returned by the subscribe operation.
///
/// Validation and conflict are user-correctable; repository failures are
/// server-side and logged. The welcome mail never appears here: its failure
/// is contained in the background task.
#[derive(Debug, Error)]
pub enum SubscribeError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("email already subscribed: {0}")]
    AlreadySubscribed(String),

    #[error(transparent)]
    Repository(RepositoryError),
}

impl From<RepositoryError> for SubscribeError {
    fn from(error: RepositoryError) -> Self {
        match error {
            // A duplicate that slipped past the pre-check is still a conflict
            // to the caller, not a server error.
            RepositoryError::Duplicate(email) => SubscribeError::AlreadySubscribed(email),
            other => SubscribeError::Repository(other),
        }
    }
}

/// Errors from the welcome mail path. Logged, never propagated to callers.
#[derive(Debug, Error)]
pub enum MailError {
    #[error("mail request failed: {0}")]
    Request(String),

    #[error("mail provider rejected the message: {0}")]
    Rejected(String),
}
