use std::sync::Arc;

use chrono::{DateTime, Utc};
use storage::repository::SnapshotSlotRepository;

use exam_core::Clock;

use super::active::ActiveExam;
use super::snapshot::{ExamSnapshot, PROGRESS_SLOT_KEY};
use crate::error::SnapshotError;

/// A snapshot read back from the slot, with the time it was written.
#[derive(Debug, Clone, PartialEq)]
pub struct SavedProgress {
    pub snapshot: ExamSnapshot,
    pub saved_at: DateTime<Utc>,
}

/// Saves and loads the exam snapshot in one named slot.
///
/// The `try_*` methods report every failure. `save`, `load` and `clear` log
/// failures and carry on, so a broken store only costs the resume feature.
#[derive(Clone)]
pub struct ProgressService {
    clock: Clock,
    slots: Arc<dyn SnapshotSlotRepository>,
    key: String,
}

impl ProgressService {
    #[must_use]
    pub fn new(clock: Clock, slots: Arc<dyn SnapshotSlotRepository>) -> Self {
        Self {
            clock,
            slots,
            key: PROGRESS_SLOT_KEY.to_owned(),
        }
    }

    /// Use a different slot name.
    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Overwrite the slot with the current state of `exam`.
    ///
    /// # Errors
    ///
    /// Returns `SnapshotError` if encoding or the write fails.
    pub async fn try_save(&self, exam: &ActiveExam) -> Result<(), SnapshotError> {
        let now = self.clock.now();
        let text = ExamSnapshot::capture(exam, now.timestamp_millis()).encode()?;
        self.slots.write_slot(&self.key, &text, now).await?;
        tracing::debug!(
            slot = %self.key,
            answered = exam.session().results().len(),
            "progress saved"
        );
        Ok(())
    }

    /// Read the slot. An empty slot is `Ok(None)`.
    ///
    /// A snapshot from another format version is removed before the error is
    /// returned.
    ///
    /// # Errors
    ///
    /// Returns `SnapshotError` if the read fails or the stored text does not
    /// decode.
    pub async fn try_load(&self) -> Result<Option<SavedProgress>, SnapshotError> {
        let Some(record) = self.slots.read_slot(&self.key).await? else {
            return Ok(None);
        };
        match ExamSnapshot::decode(&record.value) {
            Ok(snapshot) => Ok(Some(SavedProgress {
                snapshot,
                saved_at: record.updated_at,
            })),
            Err(err @ SnapshotError::VersionMismatch { .. }) => {
                self.slots.clear_slot(&self.key).await?;
                Err(err)
            }
            Err(err) => Err(err),
        }
    }

    /// # Errors
    ///
    /// Returns `SnapshotError::Storage` if the slot cannot be cleared.
    pub async fn try_clear(&self) -> Result<(), SnapshotError> {
        self.slots.clear_slot(&self.key).await?;
        Ok(())
    }

    /// Save, logging instead of failing.
    pub async fn save(&self, exam: &ActiveExam) {
        if let Err(err) = self.try_save(exam).await {
            tracing::warn!(slot = %self.key, error = %err, "could not save exam progress");
        }
    }

    /// Load, treating any failure as "nothing saved".
    pub async fn load(&self) -> Option<SavedProgress> {
        match self.try_load().await {
            Ok(saved) => saved,
            Err(err @ SnapshotError::VersionMismatch { .. }) => {
                tracing::debug!(slot = %self.key, error = %err, "discarded saved progress");
                None
            }
            Err(err) => {
                tracing::warn!(slot = %self.key, error = %err, "could not load exam progress");
                None
            }
        }
    }

    /// Clear, logging instead of failing.
    pub async fn clear(&self) {
        if let Err(err) = self.try_clear().await {
            tracing::warn!(slot = %self.key, error = %err, "could not clear exam progress");
        }
    }
}
