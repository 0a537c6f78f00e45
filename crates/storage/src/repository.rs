use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Value stored under one named slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotRecord {
    pub key: String,
    pub value: String,
    pub updated_at: DateTime<Utc>,
}

/// Durable key-value slots holding serialized exam progress.
///
/// Writes overwrite whatever the slot held before; the last write wins.
#[async_trait]
pub trait SnapshotSlotRepository: Send + Sync {
    /// Read the slot, `None` when nothing was written.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be queried.
    async fn read_slot(&self, key: &str) -> Result<Option<SlotRecord>, StorageError>;

    /// Overwrite the slot with `value`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the value cannot be stored.
    async fn write_slot(
        &self,
        key: &str,
        value: &str,
        written_at: DateTime<Utc>,
    ) -> Result<(), StorageError>;

    /// Remove the slot. Clearing an empty slot is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be updated.
    async fn clear_slot(&self, key: &str) -> Result<(), StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    slots: Arc<Mutex<HashMap<String, SlotRecord>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl SnapshotSlotRepository for InMemoryRepository {
    async fn read_slot(&self, key: &str) -> Result<Option<SlotRecord>, StorageError> {
        let guard = self
            .slots
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(key).cloned())
    }

    async fn write_slot(
        &self,
        key: &str,
        value: &str,
        written_at: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        let mut guard = self
            .slots
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(
            key.to_owned(),
            SlotRecord {
                key: key.to_owned(),
                value: value.to_owned(),
                updated_at: written_at,
            },
        );
        Ok(())
    }

    async fn clear_slot(&self, key: &str) -> Result<(), StorageError> {
        let mut guard = self
            .slots
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.remove(key);
        Ok(())
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub slots: Arc<dyn SnapshotSlotRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let slots: Arc<dyn SnapshotSlotRepository> = Arc::new(InMemoryRepository::new());
        Self { slots }
    }
}
