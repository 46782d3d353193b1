//! Ingress handlers: parse a loose JSON body into a typed record, write the
//! OriginalEvent, publish to the input channel, echo the typed record back.

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use serde_json::Value;

use crate::codec::{self, generated_key};
use crate::contracts::{GenericAction, InboundMessageEvent, LegacyEvent, SimpleEvent};
use crate::store::OriginalEvent;

use super::{AppState, ErrorResponse};

/// POST /api/events/simple
///
/// Channel key is the event id (generated when the caller supplied none).
pub async fn publish_simple(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Value>), ErrorResponse> {
    let event = SimpleEvent::parse_with_defaults(&body)?;
    let key = event.id.clone();
    let channel = state.channels.input.clone();

    publish_event(&state, "SimpleEvent", &channel, &key, &event).await
}

/// POST /api/events/legacy
pub async fn publish_legacy(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Value>), ErrorResponse> {
    let event = LegacyEvent::parse_with_defaults(&body)?;
    let key = generated_key();
    let channel = state.channels.legacy_events.clone();

    publish_event(&state, "LegacyEvent", &channel, &key, &event).await
}

/// POST /api/events/action
pub async fn publish_action(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Value>), ErrorResponse> {
    let action = GenericAction::parse_with_defaults(&body)?;
    let key = generated_key();
    let channel = state.channels.actions.clone();

    publish_event(&state, "GenericAction", &channel, &key, &action).await
}

/// POST /api/events/inbound-message
///
/// Channel key is the message id after defaults.
pub async fn publish_inbound_message(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Value>), ErrorResponse> {
    let event = InboundMessageEvent::parse_with_defaults(&body)?;
    let key = if event.payload.id.is_empty() {
        generated_key()
    } else {
        event.payload.id.clone()
    };
    let channel = state.channels.inbound_message.clone();

    publish_event(&state, "InboundMessageEvent", &channel, &key, &event).await
}

/// Shared publish path: record the original, publish the typed record under
/// the key, echo it back.
async fn publish_event<T: Serialize>(
    state: &AppState,
    event_type: &str,
    channel: &str,
    key: &str,
    event: &T,
) -> Result<(StatusCode, Json<Value>), ErrorResponse> {
    let payload = codec::encode(event).map_err(|e| ErrorResponse::internal(e.to_string()))?;
    let payload_text = String::from_utf8_lossy(&payload).into_owned();

    state
        .store
        .insert_original(OriginalEvent::new(key, event_type, channel, payload_text))
        .await?;

    state.bus.publish(channel, key, payload).await?;

    tracing::info!(event_type, channel = %channel, key = %key, "event published");

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "status": "published",
            "message": format!("{} accepted", event_type),
            "key": key,
            "channel": channel,
            "event_type": event_type,
            "data": serde_json::to_value(event)
                .map_err(|e| ErrorResponse::internal(e.to_string()))?,
        })),
    ))
}
