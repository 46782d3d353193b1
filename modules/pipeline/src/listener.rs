//! Persistence listener: subscribes to every pipeline output channel and
//! writes one correlated ProcessedEvent per consumed record.
//!
//! The listener never decodes payloads. Correlation and persistence need
//! only the channel key and the raw bytes, and decoding would reject exactly
//! the fail-open records it must record. Failure policy: log and continue;
//! one bad record never stops a channel's consumer.

use futures::StreamExt;
use message_bus::MessageBus;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::config::Channels;
use crate::store::{EventStore, ProcessedEvent};

/// Pipeline tags written to ProcessedEvent.event_type, one per output
/// channel.
pub const SIMPLE_EVENT_TRANSFORMED: &str = "SIMPLE_EVENT_TRANSFORMED";
pub const LEGACY_EVENT_CONVERTED: &str = "LEGACY_EVENT_CONVERTED";
pub const GENERIC_ACTION_TYPE_A: &str = "GENERIC_ACTION_TYPE_A";
pub const GENERIC_ACTION_TYPE_B: &str = "GENERIC_ACTION_TYPE_B";
pub const CREATE_CHAT_EVENT: &str = "CREATE_CHAT_EVENT";
pub const CREATE_MESSAGE_EVENT: &str = "CREATE_MESSAGE_EVENT";

/// (output channel, pipeline tag) pairs the listener covers.
fn bindings(channels: &Channels) -> Vec<(String, &'static str)> {
    vec![
        (channels.transformed.clone(), SIMPLE_EVENT_TRANSFORMED),
        (channels.json_converted.clone(), LEGACY_EVENT_CONVERTED),
        (channels.action_a.clone(), GENERIC_ACTION_TYPE_A),
        (channels.action_b.clone(), GENERIC_ACTION_TYPE_B),
        (channels.create_chat.clone(), CREATE_CHAT_EVENT),
        (channels.create_message.clone(), CREATE_MESSAGE_EVENT),
    ]
}

/// Spawn one listener task per pipeline output channel.
pub fn spawn_listeners(
    bus: Arc<dyn MessageBus>,
    store: Arc<dyn EventStore>,
    channels: &Channels,
    group: &str,
    shutdown: &watch::Receiver<bool>,
) -> Vec<JoinHandle<()>> {
    bindings(channels)
        .into_iter()
        .map(|(channel, tag)| {
            spawn_listener(
                bus.clone(),
                store.clone(),
                channel,
                tag,
                group.to_string(),
                shutdown.clone(),
            )
        })
        .collect()
}

fn spawn_listener(
    bus: Arc<dyn MessageBus>,
    store: Arc<dyn EventStore>,
    channel: String,
    tag: &'static str,
    group: String,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        tracing::info!(channel = %channel, tag, "starting persistence listener");

        let mut stream = match bus.queue_subscribe(&channel, &group).await {
            Ok(s) => s,
            Err(e) => {
                tracing::error!(channel = %channel, error = %e, "failed to subscribe");
                return;
            }
        };

        loop {
            tokio::select! {
                biased;
                changed = shutdown.changed() => {
                    // A dropped sender means the service is going away too.
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
                record = stream.next() => {
                    let Some(record) = record else { break };

                    if let Err(e) = persist_record(&*store, tag, &channel, &record.key, &record.payload).await {
                        tracing::error!(
                            channel = %channel,
                            key = %record.key,
                            error = %e,
                            "failed to persist processed record, continuing"
                        );
                    }
                }
            }
        }

        tracing::info!(channel = %channel, "persistence listener stopped");
    })
}

async fn persist_record(
    store: &dyn EventStore,
    tag: &str,
    channel: &str,
    key: &str,
    payload: &[u8],
) -> Result<(), crate::store::StoreError> {
    // Best-effort correlation: a miss is recorded as null, not raised.
    let original_event_id = store
        .find_original(key)
        .await?
        .map(|original| original.event_id);

    if original_event_id.is_none() {
        tracing::debug!(key = %key, channel = %channel, "no original event for key");
    }

    store
        .insert_processed(ProcessedEvent::new(
            tag,
            key,
            original_event_id,
            String::from_utf8_lossy(payload).into_owned(),
            channel,
        ))
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_output_channel_is_bound_to_a_distinct_tag() {
        let channels = Channels::default();
        let bindings = bindings(&channels);

        assert_eq!(bindings.len(), 6);

        let mut tags: Vec<&str> = bindings.iter().map(|(_, tag)| *tag).collect();
        tags.sort_unstable();
        tags.dedup();
        assert_eq!(tags.len(), 6);
    }
}
