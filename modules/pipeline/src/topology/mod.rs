//! The four stateless processing pipelines and the generic subscription
//! runner that drives them.
//!
//! Each pipeline module exposes a pure transform plus an `emissions`
//! function mapping one input payload to zero or more (channel, payload)
//! outputs; [`spawn_pipeline`] turns that function into a consumer task.
//! The runner publishes every emission under the input record's key, so
//! correlation keys propagate unchanged through every stage.

pub mod convert;
pub mod fanout;
pub mod route;
pub mod transform;

use futures::StreamExt;
use message_bus::MessageBus;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// One output record produced by a pipeline for a single input record.
#[derive(Debug, Clone, PartialEq)]
pub struct Emission {
    pub channel: String,
    pub payload: Vec<u8>,
}

impl Emission {
    pub fn new(channel: &str, payload: Vec<u8>) -> Self {
        Self {
            channel: channel.to_string(),
            payload,
        }
    }
}

/// Spawn one pipeline consumer task.
///
/// Subscribes to `input_channel` as a member of `group` and feeds every
/// record through `process`. Emissions are published under the input
/// record's key; a publish failure is logged and the loop continues.
///
/// Shutdown: the select is biased toward the watch so no new record is
/// pulled after the flag flips, while a record already pulled finishes
/// processing and publishing.
pub fn spawn_pipeline<F>(
    bus: Arc<dyn MessageBus>,
    input_channel: String,
    group: String,
    pipeline: &'static str,
    mut shutdown: watch::Receiver<bool>,
    process: F,
) -> JoinHandle<()>
where
    F: Fn(&[u8]) -> Vec<Emission> + Send + Sync + 'static,
{
    tokio::spawn(async move {
        tracing::info!(pipeline, channel = %input_channel, "starting pipeline consumer");

        let mut stream = match bus.queue_subscribe(&input_channel, &group).await {
            Ok(s) => s,
            Err(e) => {
                tracing::error!(pipeline, channel = %input_channel, error = %e, "failed to subscribe");
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

                    for emission in process(&record.payload) {
                        if let Err(e) = bus
                            .publish(&emission.channel, &record.key, emission.payload)
                            .await
                        {
                            tracing::error!(
                                pipeline,
                                channel = %emission.channel,
                                key = %record.key,
                                error = %e,
                                "failed to publish pipeline output"
                            );
                        }
                    }
                }
            }
        }

        tracing::info!(pipeline, channel = %input_channel, "pipeline consumer stopped");
    })
}
