use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::Row;

use crate::repository::{SlotRecord, SnapshotSlotRepository, StorageError};

use super::SqliteRepository;

#[async_trait]
impl SnapshotSlotRepository for SqliteRepository {
    async fn read_slot(&self, key: &str) -> Result<Option<SlotRecord>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT key, value, updated_at
            FROM kv_slots
            WHERE key = ?1
            ",
        )
        .bind(key)
        .fetch_optional(self.pool())
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let key: String = row
            .try_get("key")
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        let value: String = row
            .try_get("value")
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        let updated_at: DateTime<Utc> = row
            .try_get("updated_at")
            .map_err(|err| StorageError::Serialization(err.to_string()))?;

        Ok(Some(SlotRecord {
            key,
            value,
            updated_at,
        }))
    }

    async fn write_slot(
        &self,
        key: &str,
        value: &str,
        written_at: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO kv_slots (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            ",
        )
        .bind(key)
        .bind(value)
        .bind(written_at)
        .execute(self.pool())
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        tracing::trace!(key, bytes = value.len(), "slot written");
        Ok(())
    }

    async fn clear_slot(&self, key: &str) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM kv_slots WHERE key = ?1")
            .bind(key)
            .execute(self.pool())
            .await
            .map_err(|err| StorageError::Connection(err.to_string()))?;
        Ok(())
    }
}
