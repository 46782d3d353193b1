//! Query/admin handlers over the correlation store.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::Value;

use crate::listener;
use crate::store::EventFilter;

use super::{AppState, ErrorResponse};

/// Query parameters shared by both list endpoints; present filters combine
/// with AND.
#[derive(Debug, Deserialize)]
pub struct EventQuery {
    pub event_type: Option<String>,
    pub source_channel: Option<String>,
}

impl From<EventQuery> for EventFilter {
    fn from(q: EventQuery) -> Self {
        EventFilter {
            event_type: q.event_type,
            source_channel: q.source_channel,
        }
    }
}

/// GET /api/events/original
pub async fn list_original(
    State(state): State<AppState>,
    Query(params): Query<EventQuery>,
) -> Result<Json<Value>, ErrorResponse> {
    let events = state.store.list_original(&params.into()).await?;

    Ok(Json(serde_json::json!({
        "status": "ok",
        "count": events.len(),
        "events": events,
    })))
}

/// GET /api/events/processed
pub async fn list_processed(
    State(state): State<AppState>,
    Query(params): Query<EventQuery>,
) -> Result<Json<Value>, ErrorResponse> {
    let events = state.store.list_processed(&params.into()).await?;

    Ok(Json(serde_json::json!({
        "status": "ok",
        "count": events.len(),
        "events": events,
    })))
}

/// GET /api/events/processed/stats
pub async fn processed_stats(
    State(state): State<AppState>,
) -> Result<Json<Value>, ErrorResponse> {
    let stats = state.store.processed_stats().await?;

    let total: i64 = stats.iter().map(|(_, count)| count).sum();

    // Every pipeline tag appears in the breakdown, zero-counted when no
    // record has been processed for it yet.
    let mut breakdown: serde_json::Map<String, Value> = [
        listener::SIMPLE_EVENT_TRANSFORMED,
        listener::LEGACY_EVENT_CONVERTED,
        listener::GENERIC_ACTION_TYPE_A,
        listener::GENERIC_ACTION_TYPE_B,
        listener::CREATE_CHAT_EVENT,
        listener::CREATE_MESSAGE_EVENT,
    ]
    .into_iter()
    .map(|tag| (tag.to_string(), Value::from(0)))
    .collect();
    for (tag, count) in stats {
        breakdown.insert(tag, Value::from(count));
    }

    Ok(Json(serde_json::json!({
        "status": "ok",
        "total_processed_events": total,
        "event_type_breakdown": breakdown,
    })))
}

/// DELETE /api/events/original — bulk, idempotent.
pub async fn delete_original(
    State(state): State<AppState>,
) -> Result<Json<Value>, ErrorResponse> {
    let deleted = state.store.delete_all_original().await?;

    Ok(Json(serde_json::json!({
        "status": "ok",
        "message": "original events deleted",
        "deleted": deleted,
    })))
}

/// DELETE /api/events/processed — bulk, idempotent.
pub async fn delete_processed(
    State(state): State<AppState>,
) -> Result<Json<Value>, ErrorResponse> {
    let deleted = state.store.delete_all_processed().await?;

    Ok(Json(serde_json::json!({
        "status": "ok",
        "message": "processed events deleted",
        "deleted": deleted,
    })))
}
