//! Correlation store: append-only records of every event as originally
//! published and every record that emerged from a pipeline, joined by the
//! channel key.
//!
//! Trait with a PostgreSQL implementation for production and an in-memory
//! implementation for development and tests, mirroring the message-bus
//! duality.

mod memory;
mod postgres;

pub use memory::InMemoryStore;
pub use postgres::PostgresStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// An inbound event as first published, keyed by `event_id`.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct OriginalEvent {
    pub id: Uuid,
    pub event_id: String,
    pub event_type: String,
    pub source_channel: String,
    pub original_payload: String,
    pub published_at: DateTime<Utc>,
}

impl OriginalEvent {
    pub fn new(
        event_id: impl Into<String>,
        event_type: impl Into<String>,
        source_channel: impl Into<String>,
        original_payload: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            event_id: event_id.into(),
            event_type: event_type.into(),
            source_channel: source_channel.into(),
            original_payload: original_payload.into(),
            published_at: Utc::now(),
        }
    }
}

/// One pipeline output record, correlated back to its original event where
/// one exists.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ProcessedEvent {
    pub id: Uuid,
    pub event_type: String,
    pub original_key: String,
    /// Null when no OriginalEvent existed for the key at lookup time;
    /// correlation is best-effort, not guaranteed.
    pub original_event_id: Option<String>,
    pub processed_payload: String,
    pub source_channel: String,
    pub processed_at: DateTime<Utc>,
}

impl ProcessedEvent {
    pub fn new(
        event_type: impl Into<String>,
        original_key: impl Into<String>,
        original_event_id: Option<String>,
        processed_payload: impl Into<String>,
        source_channel: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            event_type: event_type.into(),
            original_key: original_key.into(),
            original_event_id,
            processed_payload: processed_payload.into(),
            source_channel: source_channel.into(),
            processed_at: Utc::now(),
        }
    }
}

/// Query filter for either collection; present filters combine with AND.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    pub event_type: Option<String>,
    pub source_channel: Option<String>,
}

impl EventFilter {
    fn matches(&self, event_type: &str, source_channel: &str) -> bool {
        self.event_type
            .as_deref()
            .map_or(true, |t| t == event_type)
            && self
                .source_channel
                .as_deref()
                .map_or(true, |c| c == source_channel)
    }
}

/// Errors raised by a correlation store backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store query failed: {0}")]
    Query(#[from] sqlx::Error),

    #[error("store migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Append-only correlation store.
///
/// Writes must tolerate at-least-once delivery: inserting an OriginalEvent
/// with a duplicate `event_id` is silently ignored, never an error to the
/// publisher. Deletion is bulk-only.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Record an inbound event; a duplicate `event_id` is ignored.
    async fn insert_original(&self, event: OriginalEvent) -> Result<(), StoreError>;

    /// Look up the original event for a channel key. `None` is a correlation
    /// miss, not an error.
    async fn find_original(&self, event_id: &str) -> Result<Option<OriginalEvent>, StoreError>;

    /// Record one pipeline output.
    async fn insert_processed(&self, event: ProcessedEvent) -> Result<(), StoreError>;

    async fn list_original(&self, filter: &EventFilter) -> Result<Vec<OriginalEvent>, StoreError>;

    async fn list_processed(&self, filter: &EventFilter)
        -> Result<Vec<ProcessedEvent>, StoreError>;

    /// Count of processed events per pipeline tag.
    async fn processed_stats(&self) -> Result<Vec<(String, i64)>, StoreError>;

    /// Bulk delete; idempotent, returns the number of rows removed.
    async fn delete_all_original(&self) -> Result<u64, StoreError>;

    /// Bulk delete; idempotent, returns the number of rows removed.
    async fn delete_all_processed(&self) -> Result<u64, StoreError>;
}

impl std::fmt::Debug for dyn EventStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EventStore")
    }
}
