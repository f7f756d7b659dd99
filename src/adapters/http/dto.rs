//! Request/response DTOs for the HTTP surface.

use serde::{Deserialize, Serialize};

use crate::domain::Subscriber;

/// Body of `POST /api/subscribe`.
#[derive(Debug, Clone, Deserialize)]
pub struct SubscribeRequest {
    #[serde(default)]
    pub email: Option<String>,
}

/// Success acknowledgment for a new subscription.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscribeResponse {
    pub subscriber_id: String,
    pub message: String,
}

/// One subscriber in the admin listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriberView {
    pub id: String,
    pub email: String,
    pub is_active: bool,
    pub subscribed_at: String,
}

impl From<&Subscriber> for SubscriberView {
    fn from(subscriber: &Subscriber) -> Self {
        Self {
            id: subscriber.id().to_string(),
            email: subscriber.email().to_string(),
            is_active: subscriber.is_active(),
            subscribed_at: subscriber.subscribed_at().to_rfc3339(),
        }
    }
}

/// Response of `GET /api/subscribers`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriberListResponse {
    pub subscribers: Vec<SubscriberView>,
    pub total: usize,
}

/// Response of `GET /health`.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Structured error body.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            code: "VALIDATION_FAILED".to_string(),
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self {
            code: "ALREADY_SUBSCRIBED".to_string(),
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            code: "INTERNAL_ERROR".to_string(),
            message: message.into(),
        }
    }
}
