//! NATS-based implementation of the MessageBus trait

use crate::{BusError, BusResult, ChannelRecord, MessageBus};
use async_nats::{Client, HeaderMap};
use async_trait::async_trait;
use futures::stream::{BoxStream, StreamExt};

/// Header under which the routing key travels on a NATS message.
const KEY_HEADER: &str = "Record-Key";

/// MessageBus implementation using NATS
///
/// This is the production implementation that connects to a NATS server.
/// It wraps an `async_nats::Client` and implements the `MessageBus` trait.
/// NATS subjects have no native record key, so the key is carried in the
/// `Record-Key` header; consumer groups map onto NATS queue groups.
///
/// # Example
/// ```rust,no_run
/// use message_bus::{MessageBus, NatsBus};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let nats_client = async_nats::connect("nats://localhost:4222").await?;
/// let bus = NatsBus::new(nats_client);
///
/// bus.publish("input", "evt-1", b"{}".to_vec()).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct NatsBus {
    client: Client,
}

impl NatsBus {
    /// Create a new NatsBus from an existing NATS client
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Get a reference to the underlying NATS client
    pub fn client(&self) -> &Client {
        &self.client
    }

    fn to_record(nats_msg: async_nats::Message) -> ChannelRecord {
        let key = nats_msg
            .headers
            .as_ref()
            .and_then(|headers| headers.get(KEY_HEADER))
            .map(|value| value.to_string())
            .unwrap_or_default();

        ChannelRecord::new(
            nats_msg.subject.to_string(),
            key,
            nats_msg.payload.to_vec(),
        )
    }
}

#[async_trait]
impl MessageBus for NatsBus {
    async fn publish(&self, channel: &str, key: &str, payload: Vec<u8>) -> BusResult<()> {
        let mut headers = HeaderMap::new();
        headers.insert(KEY_HEADER, key);

        self.client
            .publish_with_headers(channel.to_string(), headers, payload.into())
            .await
            .map_err(|e| BusError::PublishError(e.to_string()))?;

        Ok(())
    }

    async fn subscribe(&self, channel: &str) -> BusResult<BoxStream<'static, ChannelRecord>> {
        let subscriber = self
            .client
            .subscribe(channel.to_string())
            .await
            .map_err(|e| BusError::SubscribeError(e.to_string()))?;

        Ok(subscriber.map(Self::to_record).boxed())
    }

    async fn queue_subscribe(
        &self,
        channel: &str,
        group: &str,
    ) -> BusResult<BoxStream<'static, ChannelRecord>> {
        let subscriber = self
            .client
            .queue_subscribe(channel.to_string(), group.to_string())
            .await
            .map_err(|e| BusError::SubscribeError(e.to_string()))?;

        Ok(subscriber.map(Self::to_record).boxed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Note: These tests require a running NATS server
    // For CI, use InMemoryBus tests instead
    // For manual testing: docker run -p 4222:4222 nats:2.10-alpine

    #[tokio::test]
    #[ignore] // Requires NATS server
    async fn test_nats_bus_key_roundtrip() {
        let client = async_nats::connect("nats://localhost:4222")
            .await
            .expect("NATS server must be running on localhost:4222");

        let bus = NatsBus::new(client);

        // Subscribe first
        let mut stream = bus.subscribe("test.pipeline.input").await.unwrap();

        // Publish a keyed record
        let payload = b"test record".to_vec();
        bus.publish("test.pipeline.input", "evt-42", payload.clone())
            .await
            .unwrap();

        // Receive it with the key intact
        let record = tokio::time::timeout(std::time::Duration::from_secs(2), stream.next())
            .await
            .expect("timeout waiting for record")
            .expect("stream ended");

        assert_eq!(record.channel, "test.pipeline.input");
        assert_eq!(record.key, "evt-42");
        assert_eq!(record.payload, payload);
    }

    #[tokio::test]
    #[ignore] // Requires NATS server
    async fn test_nats_bus_queue_subscribe() {
        let client = async_nats::connect("nats://localhost:4222")
            .await
            .expect("NATS server must be running on localhost:4222");

        let bus = NatsBus::new(client);

        let mut stream = bus
            .queue_subscribe("test.pipeline.grouped", "workers")
            .await
            .unwrap();

        bus.publish("test.pipeline.grouped", "evt-7", b"grouped".to_vec())
            .await
            .unwrap();

        let record = tokio::time::timeout(std::time::Duration::from_secs(2), stream.next())
            .await
            .expect("timeout waiting for record")
            .expect("stream ended");

        assert_eq!(record.key, "evt-7");
        assert_eq!(record.payload, b"grouped");
    }
}
