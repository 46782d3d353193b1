//! HTTP surface: ingress (publish) and query/admin endpoints.
//!
//! Boundary errors are structured `{error, message}` JSON; internal pipeline
//! failures never surface here because they occur asynchronously after the
//! API call returns.

pub mod publish;
pub mod query;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use message_bus::MessageBus;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::config::Channels;
use crate::health::health;
use crate::store::EventStore;

/// Shared state for every handler.
#[derive(Clone)]
pub struct AppState {
    pub bus: Arc<dyn MessageBus>,
    pub store: Arc<dyn EventStore>,
    pub channels: Channels,
}

/// Build the full application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/events/simple", post(publish::publish_simple))
        .route("/api/events/legacy", post(publish::publish_legacy))
        .route("/api/events/action", post(publish::publish_action))
        .route(
            "/api/events/inbound-message",
            post(publish::publish_inbound_message),
        )
        .route("/api/events/original", get(query::list_original))
        .route("/api/events/original", delete(query::delete_original))
        .route("/api/events/processed", get(query::list_processed))
        .route("/api/events/processed", delete(query::delete_processed))
        .route("/api/events/processed/stats", get(query::processed_stats))
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
}

/// Structured error response for both API surfaces.
#[derive(Debug)]
pub struct ErrorResponse {
    pub status: StatusCode,
    pub error: &'static str,
    pub message: String,
}

impl ErrorResponse {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error: "invalid_request",
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            error: "internal_error",
            message: message.into(),
        }
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({
            "error": self.error,
            "message": self.message,
        }));

        (self.status, body).into_response()
    }
}

impl From<crate::store::StoreError> for ErrorResponse {
    fn from(e: crate::store::StoreError) -> Self {
        tracing::error!(error = %e, "store operation failed");
        Self::internal(e.to_string())
    }
}

impl From<message_bus::BusError> for ErrorResponse {
    fn from(e: message_bus::BusError) -> Self {
        tracing::error!(error = %e, "bus publish failed");
        Self::internal(e.to_string())
    }
}

impl From<crate::codec::DecodeError> for ErrorResponse {
    fn from(e: crate::codec::DecodeError) -> Self {
        Self::bad_request(e.to_string())
    }
}
