//! In-memory implementation of the MessageBus trait for testing and development

use crate::{BusResult, ChannelRecord, MessageBus};
use async_trait::async_trait;
use futures::stream::{BoxStream, StreamExt};
use std::sync::Arc;
use tokio::sync::broadcast;

/// MessageBus implementation using in-memory channels
///
/// This implementation is suitable for:
/// - Unit tests (no external dependencies)
/// - Local development without Docker
/// - Integration tests that need fast, isolated message buses
///
/// Records are broadcast to all subscribers via a Tokio broadcast channel and
/// filtered per subscription by exact channel name. Consumer groups are
/// advisory here: every subscription receives every record on its channel,
/// which makes single-process tests deterministic.
///
/// # Example
/// ```rust
/// use message_bus::{InMemoryBus, MessageBus};
/// use futures::StreamExt;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let bus = InMemoryBus::new();
///
/// // Subscribe before publishing
/// let mut stream = bus.subscribe("events").await?;
///
/// // Publish a record
/// bus.publish("events", "k1", b"hello".to_vec()).await?;
///
/// // Receive it
/// let record = stream.next().await.unwrap();
/// assert_eq!(record.key, "k1");
/// assert_eq!(record.payload, b"hello");
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct InMemoryBus {
    // Global broadcast channel for all records, filtered per subscription.
    // Large buffer so slow test subscribers do not drop records.
    sender: Arc<broadcast::Sender<ChannelRecord>>,
}

impl InMemoryBus {
    /// Create a new in-memory bus
    ///
    /// The bus uses a broadcast channel with a buffer of 1000 records.
    /// If the buffer is exceeded, the oldest records are dropped.
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(1000);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Create a new in-memory bus with a custom buffer size
    pub fn with_capacity(buffer_size: usize) -> Self {
        let (sender, _) = broadcast::channel(buffer_size);
        Self {
            sender: Arc::new(sender),
        }
    }

    fn subscription(&self, channel: &str) -> BoxStream<'static, ChannelRecord> {
        let mut receiver = self.sender.subscribe();
        let channel = channel.to_string();

        let stream = async_stream::stream! {
            loop {
                match receiver.recv().await {
                    Ok(record) => {
                        if record.channel == channel {
                            yield record;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(channel = %channel, skipped, "in-memory subscriber lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        break;
                    }
                }
            }
        };

        stream.boxed()
    }
}

impl Default for InMemoryBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessageBus for InMemoryBus {
    async fn publish(&self, channel: &str, key: &str, payload: Vec<u8>) -> BusResult<()> {
        let record = ChannelRecord::new(channel.to_string(), key.to_string(), payload);

        // Ignore the error if there are no receivers (that's fine)
        let _ = self.sender.send(record);

        Ok(())
    }

    async fn subscribe(&self, channel: &str) -> BusResult<BoxStream<'static, ChannelRecord>> {
        Ok(self.subscription(channel))
    }

    async fn queue_subscribe(
        &self,
        channel: &str,
        _group: &str,
    ) -> BusResult<BoxStream<'static, ChannelRecord>> {
        Ok(self.subscription(channel))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    #[tokio::test]
    async fn test_publish_and_subscribe() {
        let bus = InMemoryBus::new();

        // Subscribe first
        let mut stream = bus.subscribe("orders").await.unwrap();

        // Publish a record
        let payload = b"test record".to_vec();
        bus.publish("orders", "order-1", payload.clone())
            .await
            .unwrap();

        // Receive the record
        let record = tokio::time::timeout(std::time::Duration::from_secs(1), stream.next())
            .await
            .expect("timeout")
            .expect("stream ended");

        assert_eq!(record.channel, "orders");
        assert_eq!(record.key, "order-1");
        assert_eq!(record.payload, payload);
    }

    #[tokio::test]
    async fn test_records_arrive_in_publish_order() {
        let bus = InMemoryBus::new();
        let mut stream = bus.subscribe("seq").await.unwrap();

        for i in 0..5 {
            let payload = format!("record {}", i).into_bytes();
            bus.publish("seq", &format!("k{}", i), payload).await.unwrap();
        }

        for i in 0..5 {
            let record = tokio::time::timeout(std::time::Duration::from_secs(1), stream.next())
                .await
                .expect("timeout")
                .expect("stream ended");

            assert_eq!(record.key, format!("k{}", i));
            assert_eq!(record.payload, format!("record {}", i).into_bytes());
        }
    }

    #[tokio::test]
    async fn test_channel_isolation() {
        let bus = InMemoryBus::new();

        let mut stream = bus.subscribe("wanted").await.unwrap();

        bus.publish("other", "k1", b"no".to_vec()).await.unwrap();
        bus.publish("wanted", "k2", b"yes".to_vec()).await.unwrap();

        // Only the record on the subscribed channel arrives
        let record = tokio::time::timeout(std::time::Duration::from_millis(100), stream.next())
            .await
            .expect("timeout")
            .expect("stream ended");
        assert_eq!(record.channel, "wanted");
        assert_eq!(record.payload, b"yes");

        let result =
            tokio::time::timeout(std::time::Duration::from_millis(100), stream.next()).await;
        assert!(result.is_err(), "should timeout, no more records");
    }

    #[tokio::test]
    async fn test_multiple_subscribers_all_receive() {
        let bus = InMemoryBus::new();

        let mut stream1 = bus.subscribe("fanout").await.unwrap();
        let mut stream2 = bus.queue_subscribe("fanout", "group-a").await.unwrap();

        let payload = b"broadcast".to_vec();
        bus.publish("fanout", "k", payload.clone()).await.unwrap();

        let record1 = tokio::time::timeout(std::time::Duration::from_secs(1), stream1.next())
            .await
            .expect("timeout")
            .expect("stream ended");
        let record2 = tokio::time::timeout(std::time::Duration::from_secs(1), stream2.next())
            .await
            .expect("timeout")
            .expect("stream ended");

        assert_eq!(record1.payload, payload);
        assert_eq!(record2.payload, payload);
    }

    #[tokio::test]
    async fn test_key_travels_with_payload() {
        let bus = InMemoryBus::new();
        let mut stream = bus.subscribe("keyed").await.unwrap();

        bus.publish("keyed", "correlation-42", b"{}".to_vec())
            .await
            .unwrap();

        let record = tokio::time::timeout(std::time::Duration::from_secs(1), stream.next())
            .await
            .expect("timeout")
            .expect("stream ended");

        assert_eq!(record.key, "correlation-42");
    }
}
