//! HTTP handlers for the subscription and admin endpoints.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::application::SubscribeCommand;
use crate::domain::SubscribeError;

use super::dto::{
    ErrorResponse, HealthResponse, SubscribeRequest, SubscribeResponse, SubscriberListResponse,
    SubscriberView,
};
use super::AppState;

/// POST /api/subscribe - Create a new subscription
pub async fn subscribe(
    State(state): State<AppState>,
    Json(req): Json<SubscribeRequest>,
) -> Response {
    let command = SubscribeCommand { email: req.email };

    match state.subscribe_handler.handle(command).await {
        Ok(subscriber) => {
            let response = SubscribeResponse {
                subscriber_id: subscriber.id().to_string(),
                message: "Subscription successful. A welcome email is being sent.".to_string(),
            };
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(e) => handle_subscribe_error(e),
    }
}

/// GET /api/subscribers - Read-only listing of the subscriber set
pub async fn list_subscribers(State(state): State<AppState>) -> Response {
    match state.repository.list().await {
        Ok(subscribers) => {
            let views: Vec<SubscriberView> =
                subscribers.iter().map(SubscriberView::from).collect();
            let response = SubscriberListResponse {
                total: views.len(),
                subscribers: views,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to list subscribers");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::internal("Failed to list subscribers")),
            )
                .into_response()
        }
    }
}

/// GET /health - Liveness check
pub async fn health() -> Response {
    (StatusCode::OK, Json(HealthResponse { status: "healthy" })).into_response()
}

fn handle_subscribe_error(error: SubscribeError) -> Response {
    match error {
        SubscribeError::Validation(e) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ErrorResponse::validation(e.to_string())),
        )
            .into_response(),
        SubscribeError::AlreadySubscribed(email) => (
            StatusCode::CONFLICT,
            Json(ErrorResponse::conflict(format!(
                "Email already subscribed: {}",
                email
            ))),
        )
            .into_response(),
        SubscribeError::Repository(e) => {
            tracing::error!(error = %e, "subscription persistence failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::internal("Server error during subscription")),
            )
                .into_response()
        }
    }
}
