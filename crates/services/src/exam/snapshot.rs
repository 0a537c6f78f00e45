use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use exam_core::model::{ExamSession, OptionLetter, Question, QuestionNumber, SessionParts};

use super::active::ActiveExam;
use crate::error::SnapshotError;

/// Format version written into every snapshot.
pub const SNAPSHOT_VERSION: &str = "1.0";

/// Name of the single slot holding the saved exam.
pub const PROGRESS_SLOT_KEY: &str = "exam-simulator-progress";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotConfig {
    #[serde(default)]
    pub shuffle_options: bool,
}

/// Serialized form of an `ActiveExam`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamSnapshot {
    pub version: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    pub filename: String,
    pub questions: Vec<Question>,
    pub current_index: usize,
    #[serde(default)]
    pub answers: BTreeMap<QuestionNumber, Vec<OptionLetter>>,
    #[serde(default)]
    pub results: BTreeMap<QuestionNumber, bool>,
    #[serde(default)]
    pub marked_questions: Vec<QuestionNumber>,
    #[serde(default)]
    pub score: usize,
    #[serde(default)]
    pub selected_categories: Vec<String>,
    #[serde(default)]
    pub config: SnapshotConfig,
}

impl ExamSnapshot {
    /// Capture the full state of `exam` at `timestamp` (epoch millis).
    #[must_use]
    pub fn capture(exam: &ActiveExam, timestamp: i64) -> Self {
        let parts = exam.session().to_parts();
        Self {
            version: SNAPSHOT_VERSION.to_owned(),
            timestamp,
            filename: exam.filename().to_owned(),
            questions: parts.questions,
            current_index: parts.current_index,
            answers: parts.answers,
            results: parts.results,
            marked_questions: parts.marked.into_iter().collect(),
            score: parts.score,
            selected_categories: exam.selected_categories().to_vec(),
            config: SnapshotConfig {
                shuffle_options: exam.shuffle_options(),
            },
        }
    }

    /// # Errors
    ///
    /// Returns `SnapshotError::Json` if serialization fails.
    pub fn encode(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode a stored snapshot, checking the version tag before anything else.
    ///
    /// # Errors
    ///
    /// Returns `SnapshotError::VersionMismatch` when the tag is missing or
    /// differs from [`SNAPSHOT_VERSION`], and `SnapshotError::Json` when the
    /// text is not a well-formed snapshot.
    pub fn decode(text: &str) -> Result<Self, SnapshotError> {
        let value: serde_json::Value = serde_json::from_str(text)?;
        let found = value
            .get("version")
            .and_then(serde_json::Value::as_str)
            .unwrap_or_default();
        if found != SNAPSHOT_VERSION {
            return Err(SnapshotError::VersionMismatch {
                found: found.to_owned(),
                expected: SNAPSHOT_VERSION,
            });
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Number of questions with a recorded result.
    #[must_use]
    pub fn answered(&self) -> usize {
        self.results.len()
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        !self.questions.is_empty() && self.answered() >= self.total()
    }

    #[must_use]
    pub fn into_parts(self) -> SessionParts {
        SessionParts {
            questions: self.questions,
            current_index: self.current_index,
            answers: self.answers,
            results: self.results,
            marked: self.marked_questions.into_iter().collect(),
            score: self.score,
        }
    }

    /// Rebuild the exam this snapshot was captured from.
    ///
    /// # Errors
    ///
    /// Returns `SnapshotError::Restore` if the stored state is inconsistent.
    pub fn into_active(self) -> Result<ActiveExam, SnapshotError> {
        let filename = self.filename.clone();
        let selected_categories = self.selected_categories.clone();
        let shuffle_options = self.config.shuffle_options;
        let session = ExamSession::restore(self.into_parts())?;
        Ok(ActiveExam::new(
            session,
            filename,
            selected_categories,
            shuffle_options,
        ))
    }
}
