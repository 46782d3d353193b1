//! PostgreSQL implementation of the correlation store.

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use super::{EventFilter, EventStore, OriginalEvent, ProcessedEvent, StoreError};

pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Wrap an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect and run the embedded migrations.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;

        sqlx::migrate!("./db/migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl EventStore for PostgresStore {
    async fn insert_original(&self, event: OriginalEvent) -> Result<(), StoreError> {
        // ON CONFLICT DO NOTHING: at-least-once delivery may replay the
        // same event_id and the publisher must not see an error.
        sqlx::query(
            r#"
            INSERT INTO original_events
                (id, event_id, event_type, source_channel, original_payload, published_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (event_id) DO NOTHING
            "#,
        )
        .bind(event.id)
        .bind(&event.event_id)
        .bind(&event.event_type)
        .bind(&event.source_channel)
        .bind(&event.original_payload)
        .bind(event.published_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_original(&self, event_id: &str) -> Result<Option<OriginalEvent>, StoreError> {
        let event = sqlx::query_as::<_, OriginalEvent>(
            r#"
            SELECT id, event_id, event_type, source_channel, original_payload, published_at
            FROM original_events
            WHERE event_id = $1
            "#,
        )
        .bind(event_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(event)
    }

    async fn insert_processed(&self, event: ProcessedEvent) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO processed_events
                (id, event_type, original_key, original_event_id,
                 processed_payload, source_channel, processed_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(event.id)
        .bind(&event.event_type)
        .bind(&event.original_key)
        .bind(&event.original_event_id)
        .bind(&event.processed_payload)
        .bind(&event.source_channel)
        .bind(event.processed_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list_original(&self, filter: &EventFilter) -> Result<Vec<OriginalEvent>, StoreError> {
        let events = sqlx::query_as::<_, OriginalEvent>(
            r#"
            SELECT id, event_id, event_type, source_channel, original_payload, published_at
            FROM original_events
            WHERE ($1::TEXT IS NULL OR event_type = $1)
              AND ($2::TEXT IS NULL OR source_channel = $2)
            ORDER BY published_at DESC
            "#,
        )
        .bind(&filter.event_type)
        .bind(&filter.source_channel)
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    async fn list_processed(
        &self,
        filter: &EventFilter,
    ) -> Result<Vec<ProcessedEvent>, StoreError> {
        let events = sqlx::query_as::<_, ProcessedEvent>(
            r#"
            SELECT id, event_type, original_key, original_event_id,
                   processed_payload, source_channel, processed_at
            FROM processed_events
            WHERE ($1::TEXT IS NULL OR event_type = $1)
              AND ($2::TEXT IS NULL OR source_channel = $2)
            ORDER BY processed_at DESC
            "#,
        )
        .bind(&filter.event_type)
        .bind(&filter.source_channel)
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    async fn processed_stats(&self) -> Result<Vec<(String, i64)>, StoreError> {
        let stats = sqlx::query_as::<_, (String, i64)>(
            r#"
            SELECT event_type, COUNT(*)
            FROM processed_events
            GROUP BY event_type
            ORDER BY event_type
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(stats)
    }

    async fn delete_all_original(&self) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM original_events")
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn delete_all_processed(&self) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM processed_events")
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
