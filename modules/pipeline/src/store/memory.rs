//! In-memory implementation of the correlation store for development and
//! tests.

use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use super::{EventFilter, EventStore, OriginalEvent, ProcessedEvent, StoreError};

#[derive(Default)]
pub struct InMemoryStore {
    originals: RwLock<Vec<OriginalEvent>>,
    processed: RwLock<Vec<ProcessedEvent>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EventStore for InMemoryStore {
    async fn insert_original(&self, event: OriginalEvent) -> Result<(), StoreError> {
        let mut originals = self.originals.write().await;

        // Same duplicate-key semantics as ON CONFLICT DO NOTHING.
        if originals.iter().any(|o| o.event_id == event.event_id) {
            return Ok(());
        }

        originals.push(event);
        Ok(())
    }

    async fn find_original(&self, event_id: &str) -> Result<Option<OriginalEvent>, StoreError> {
        let originals = self.originals.read().await;
        Ok(originals.iter().find(|o| o.event_id == event_id).cloned())
    }

    async fn insert_processed(&self, event: ProcessedEvent) -> Result<(), StoreError> {
        self.processed.write().await.push(event);
        Ok(())
    }

    async fn list_original(&self, filter: &EventFilter) -> Result<Vec<OriginalEvent>, StoreError> {
        let originals = self.originals.read().await;
        Ok(originals
            .iter()
            .filter(|o| filter.matches(&o.event_type, &o.source_channel))
            .cloned()
            .collect())
    }

    async fn list_processed(
        &self,
        filter: &EventFilter,
    ) -> Result<Vec<ProcessedEvent>, StoreError> {
        let processed = self.processed.read().await;
        Ok(processed
            .iter()
            .filter(|p| filter.matches(&p.event_type, &p.source_channel))
            .cloned()
            .collect())
    }

    async fn processed_stats(&self) -> Result<Vec<(String, i64)>, StoreError> {
        let processed = self.processed.read().await;

        let mut counts: BTreeMap<String, i64> = BTreeMap::new();
        for event in processed.iter() {
            *counts.entry(event.event_type.clone()).or_insert(0) += 1;
        }

        Ok(counts.into_iter().collect())
    }

    async fn delete_all_original(&self) -> Result<u64, StoreError> {
        let mut originals = self.originals.write().await;
        let deleted = originals.len() as u64;
        originals.clear();
        Ok(deleted)
    }

    async fn delete_all_processed(&self) -> Result<u64, StoreError> {
        let mut processed = self.processed.write().await;
        let deleted = processed.len() as u64;
        processed.clear();
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_duplicate_event_id_is_ignored() {
        let store = InMemoryStore::new();

        store
            .insert_original(OriginalEvent::new("k1", "SimpleEvent", "input", "{}"))
            .await
            .unwrap();
        store
            .insert_original(OriginalEvent::new("k1", "SimpleEvent", "input", "{\"v\":2}"))
            .await
            .unwrap();

        let all = store.list_original(&EventFilter::default()).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].original_payload, "{}");
    }

    #[tokio::test]
    async fn test_find_original_by_key() {
        let store = InMemoryStore::new();
        store
            .insert_original(OriginalEvent::new("k1", "SimpleEvent", "input", "{}"))
            .await
            .unwrap();

        assert!(store.find_original("k1").await.unwrap().is_some());
        assert!(store.find_original("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_filters_combine_with_and() {
        let store = InMemoryStore::new();
        store
            .insert_original(OriginalEvent::new("k1", "SimpleEvent", "input", "{}"))
            .await
            .unwrap();
        store
            .insert_original(OriginalEvent::new("k2", "LegacyEvent", "legacy-events", "{}"))
            .await
            .unwrap();

        let filter = EventFilter {
            event_type: Some("SimpleEvent".to_string()),
            source_channel: Some("legacy-events".to_string()),
        };
        assert!(store.list_original(&filter).await.unwrap().is_empty());

        let filter = EventFilter {
            event_type: Some("LegacyEvent".to_string()),
            source_channel: None,
        };
        assert_eq!(store.list_original(&filter).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_stats_count_per_tag() {
        let store = InMemoryStore::new();
        for _ in 0..2 {
            store
                .insert_processed(ProcessedEvent::new(
                    "SIMPLE_EVENT_TRANSFORMED",
                    "k1",
                    None,
                    "{}",
                    "transformed",
                ))
                .await
                .unwrap();
        }
        store
            .insert_processed(ProcessedEvent::new(
                "LEGACY_EVENT_CONVERTED",
                "k2",
                None,
                "{}",
                "json-converted",
            ))
            .await
            .unwrap();

        let stats = store.processed_stats().await.unwrap();
        assert_eq!(
            stats,
            vec![
                ("LEGACY_EVENT_CONVERTED".to_string(), 1),
                ("SIMPLE_EVENT_TRANSFORMED".to_string(), 2),
            ]
        );
    }

    #[tokio::test]
    async fn test_bulk_delete_is_idempotent() {
        let store = InMemoryStore::new();
        store
            .insert_original(OriginalEvent::new("k1", "SimpleEvent", "input", "{}"))
            .await
            .unwrap();

        assert_eq!(store.delete_all_original().await.unwrap(), 1);
        assert_eq!(store.delete_all_original().await.unwrap(), 0);
    }
}
