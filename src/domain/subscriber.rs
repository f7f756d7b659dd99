//! Subscriber aggregate and the EmailAddress value object.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::ValidationError;
use super::timestamp::Timestamp;

/// Unique identifier for a persisted subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubscriberId(Uuid);

impl SubscriberId {
    /// Creates a new random subscriber ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a subscriber ID from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for SubscriberId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validated email address.
///
/// Validation is deliberately shallow: the address must be non-empty and have
/// text on both sides of an `@`. Deliverability is the mail provider's
/// problem, not ours.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Parses and validates a raw email string.
    ///
    /// Surrounding whitespace is trimmed before validation.
    pub fn parse(raw: impl AsRef<str>) -> Result<Self, ValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyField { field: "email" });
        }

        let mut parts = trimmed.splitn(2, '@');
        let local = parts.next().unwrap_or_default();
        let domain = parts.next();
        match domain {
            Some(domain) if !local.is_empty() && !domain.is_empty() => {
                Ok(Self(trimmed.to_string()))
            }
            _ => Err(ValidationError::InvalidFormat {
                field: "email",
                reason: "expected local@domain".to_string(),
            }),
        }
    }

    /// Returns the address as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A persisted email subscription.
///
/// Created once on the first successful subscribe request for an email and
/// never mutated or deleted by this service afterwards. Email uniqueness
/// across the persisted set is enforced by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Subscriber {
    id: SubscriberId,
    email: EmailAddress,
    is_active: bool,
    subscribed_at: Timestamp,
}

impl Subscriber {
    /// Creates a new active subscriber, subscribed now.
    pub fn new(email: EmailAddress) -> Self {
        Self {
            id: SubscriberId::new(),
            email,
            is_active: true,
            subscribed_at: Timestamp::now(),
        }
    }

    /// Rebuilds a subscriber from persisted state.
    pub fn reconstitute(
        id: SubscriberId,
        email: EmailAddress,
        is_active: bool,
        subscribed_at: Timestamp,
    ) -> Self {
        Self {
            id,
            email,
            is_active,
            subscribed_at,
        }
    }

    pub fn id(&self) -> SubscriberId {
        self.id
    }

    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn subscribed_at(&self) -> Timestamp {
        self.subscribed_at
    }
}
