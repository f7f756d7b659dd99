//! Integration tests for the HTTP subscription surface.
//!
//! Drives the real router over an in-memory subscriber store with mail
//! disabled, verifying status codes, bodies, and persistence side effects.

use std::sync::Arc;

use axum::body::Body;
use http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use pulsefeed::adapters::email::WelcomeMailer;
use pulsefeed::adapters::http::{router, AppState};
use pulsefeed::adapters::memory::InMemorySubscriberRepository;
use pulsefeed::application::SubscribeHandler;
use pulsefeed::config::ServerConfig;
use pulsefeed::fanout::ConnectionRegistry;

fn app() -> (axum::Router, Arc<InMemorySubscriberRepository>) {
    let repository = Arc::new(InMemorySubscriberRepository::new());
    let state = AppState {
        subscribe_handler: Arc::new(SubscribeHandler::new(
            repository.clone(),
            Arc::new(WelcomeMailer::Disabled),
        )),
        repository: repository.clone(),
        registry: Arc::new(ConnectionRegistry::new()),
    };
    (router(state, &ServerConfig::default()), repository)
}

fn subscribe_request(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/subscribe")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_returns_static_healthy_status() {
    let (app, _) = app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn subscribe_returns_created_and_persists_one_record() {
    let (app, repository) = app();

    let response = app
        .oneshot(subscribe_request(r#"{"email":"a@x.com"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert!(body["subscriberId"].is_string());
    assert_eq!(repository.subscriber_count(), 1);
}

#[tokio::test]
async fn duplicate_subscribe_conflicts_and_keeps_exactly_one_record() {
    let (app, repository) = app();

    let first = app
        .clone()
        .oneshot(subscribe_request(r#"{"email":"a@x.com"}"#))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = app
        .oneshot(subscribe_request(r#"{"email":"a@x.com"}"#))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::CONFLICT);

    let body = body_json(second).await;
    assert_eq!(body["code"], "ALREADY_SUBSCRIBED");
    assert_eq!(repository.subscriber_count(), 1);
}

#[tokio::test]
async fn missing_email_is_a_validation_error_with_no_side_effect() {
    let (app, repository) = app();

    let response = app.oneshot(subscribe_request("{}")).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["code"], "VALIDATION_FAILED");
    assert_eq!(repository.subscriber_count(), 0);
}

#[tokio::test]
async fn empty_email_is_a_validation_error_with_no_side_effect() {
    let (app, repository) = app();

    let response = app
        .oneshot(subscribe_request(r#"{"email":"  "}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(repository.subscriber_count(), 0);
}

#[tokio::test]
async fn listing_returns_all_persisted_subscribers() {
    let (app, _repository) = app();

    for email in ["a@x.com", "b@x.com"] {
        let response = app
            .clone()
            .oneshot(subscribe_request(&format!(r#"{{"email":"{}"}}"#, email)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/subscribers")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["total"], 2);
    let emails: Vec<&str> = body["subscribers"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["email"].as_str().unwrap())
        .collect();
    assert!(emails.contains(&"a@x.com"));
    assert!(emails.contains(&"b@x.com"));
}
