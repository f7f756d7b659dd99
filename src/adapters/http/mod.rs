//! HTTP surface: router, shared state, and CORS wiring.

pub mod dto;
pub mod handlers;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use http::HeaderValue;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::application::SubscribeHandler;
use crate::config::ServerConfig;
use crate::fanout::ConnectionRegistry;
use crate::ports::SubscriberRepository;

use super::websocket;

/// Shared state handed to every handler.
///
/// Constructed once at startup and passed by handle; nothing here is a
/// module-level singleton, which keeps teardown and tests straightforward.
#[derive(Clone)]
pub struct AppState {
    pub subscribe_handler: Arc<SubscribeHandler>,
    pub repository: Arc<dyn SubscriberRepository>,
    pub registry: Arc<ConnectionRegistry>,
}

/// Builds the full application router.
pub fn router(state: AppState, server: &ServerConfig) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/subscribe", post(handlers::subscribe))
        .route("/api/subscribers", get(handlers::list_subscribers))
        .route("/api/live", get(websocket::ws_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(server))
        .with_state(state)
}

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = server
        .cors_origins_list()
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if !origins.is_empty() {
        return CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any);
    }

    // The permissive fallback is for local development only; in production
    // an explicit origin list is required for cross-origin access.
    if server.is_production() {
        tracing::warn!("no CORS origins configured, cross-origin requests disabled");
        return CorsLayer::new();
    }

    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}
