//! # MessageBus Abstraction
//!
//! A platform-level abstraction for keyed publish-subscribe messaging over
//! named channels.
//!
//! Every record published through the bus carries a **key**: the routing
//! identifier that downstream consumers use to correlate derived records back
//! to the record that produced them. Implementations must deliver the key
//! unchanged alongside the payload.
//!
//! ## Implementations
//!
//! - **NatsBus**: Production implementation over a NATS connection; the key
//!   travels in a message header, consumer groups map to NATS queue groups
//! - **InMemoryBus**: Test/dev implementation using in-memory channels
//!
//! ## Usage
//!
//! ```rust,no_run
//! use message_bus::{InMemoryBus, MessageBus, NatsBus};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Production: NATS
//! let nats_client = async_nats::connect("nats://localhost:4222").await?;
//! let bus: Arc<dyn MessageBus> = Arc::new(NatsBus::new(nats_client));
//!
//! // Dev/Test: In-Memory
//! let bus: Arc<dyn MessageBus> = Arc::new(InMemoryBus::new());
//!
//! // Publish a keyed record
//! bus.publish("orders", "order-123", b"{\"qty\":2}".to_vec()).await?;
//!
//! // Subscribe to a channel
//! let mut stream = bus.subscribe("orders").await?;
//! while let Some(record) = futures::StreamExt::next(&mut stream).await {
//!     println!("Received {} bytes keyed {}", record.payload.len(), record.key);
//! }
//! # Ok(())
//! # }
//! ```

mod memory;
mod nats;

pub use memory::InMemoryBus;
pub use nats::NatsBus;

use async_trait::async_trait;
use futures::stream::BoxStream;
use std::fmt;

/// A keyed record received from a channel
#[derive(Debug, Clone)]
pub struct ChannelRecord {
    /// The channel this record was published to
    pub channel: String,
    /// The routing key the record was published under
    pub key: String,
    /// The record payload (raw bytes)
    pub payload: Vec<u8>,
}

impl ChannelRecord {
    /// Create a new channel record
    pub fn new(channel: String, key: String, payload: Vec<u8>) -> Self {
        Self {
            channel,
            key,
            payload,
        }
    }
}

/// Errors that can occur when using the message bus
#[derive(Debug, thiserror::Error)]
pub enum BusError {
    #[error("failed to publish record: {0}")]
    PublishError(String),

    #[error("failed to subscribe to channel: {0}")]
    SubscribeError(String),

    #[error("connection error: {0}")]
    ConnectionError(String),
}

/// Result type for message bus operations
pub type BusResult<T> = Result<T, BusError>;

/// Core bus abstraction for keyed publish-subscribe messaging
///
/// Channels are flat names (no wildcard hierarchy). The key published with a
/// record is delivered unchanged to every subscriber; it is the correlation
/// handle between a record and anything derived from it downstream.
#[async_trait]
pub trait MessageBus: Send + Sync {
    /// Publish a keyed record to a channel
    ///
    /// # Arguments
    /// * `channel` - The channel to publish to (e.g., "inbound-message")
    /// * `key` - The routing key carried with the record
    /// * `payload` - The record payload as raw bytes
    async fn publish(&self, channel: &str, key: &str, payload: Vec<u8>) -> BusResult<()>;

    /// Subscribe to every record published on a channel
    async fn subscribe(&self, channel: &str) -> BusResult<BoxStream<'static, ChannelRecord>>;

    /// Subscribe as a member of a named consumer group
    ///
    /// Implementations backed by a broker deliver each record to exactly one
    /// member of the group; the in-memory implementation treats the group as
    /// advisory and behaves like [`MessageBus::subscribe`].
    async fn queue_subscribe(
        &self,
        channel: &str,
        group: &str,
    ) -> BusResult<BoxStream<'static, ChannelRecord>>;
}

impl fmt::Debug for dyn MessageBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MessageBus")
    }
}
