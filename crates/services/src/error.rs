//! Shared error types for the services crate.

use thiserror::Error;

use exam_core::model::{OptionLetter, ParseLetterError, QuestionError, QuestionNumber, RestoreError};
use storage::repository::StorageError;

/// Errors emitted while loading a question file.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuestionFileError {
    #[error("could not read question file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid question file: expected an array of questions")]
    NotAnArray,

    #[error("invalid question file: no questions found")]
    Empty,

    #[error("invalid question format at entry {index}: {source}")]
    MalformedEntry {
        index: usize,
        source: serde_json::Error,
    },

    #[error("invalid question format at entry {index}: {source}")]
    InvalidQuestion { index: usize, source: QuestionError },

    #[error("question number {0} is used by more than one question")]
    DuplicateNumber(QuestionNumber),
}

/// Validation errors for an exam configuration. Messages are user-facing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ExamConfigError {
    #[error("Please enter a valid number of questions (at least 1)")]
    InvalidCount,

    #[error("Please select at least one category")]
    NoCategories,

    #[error("No questions found in the selected categories")]
    NoQuestions,

    #[error("Cannot select more than {available} questions from the selected categories")]
    TooManyQuestions { requested: usize, available: usize },
}

/// Validation errors for an answer selection. Messages are user-facing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AnswerInputError {
    #[error("Please select at least one answer")]
    Empty,

    #[error("Please select exactly {expected} answers. You selected {selected}.")]
    WrongCount { expected: usize, selected: usize },

    #[error("This question has only one correct answer. Please select a single option.")]
    SingleAnswerOnly,

    #[error("Option {0} is not available for this question")]
    UnknownOption(OptionLetter),

    #[error(transparent)]
    InvalidLetter(#[from] ParseLetterError),

    #[error("There is no question to answer")]
    NoActiveQuestion,

    #[error("This question has already been answered")]
    AlreadyAnswered,
}

/// Errors while encoding, decoding or storing a progress snapshot.
///
/// These never reach the user; `ProgressService` logs and swallows them.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SnapshotError {
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("snapshot version {found:?} does not match {expected:?}")]
    VersionMismatch { found: String, expected: &'static str },

    #[error(transparent)]
    Restore(#[from] RestoreError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors returned by `ExamLoopService` operations that take user input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ExamError {
    #[error(transparent)]
    Config(#[from] ExamConfigError),

    #[error(transparent)]
    Answer(#[from] AnswerInputError),
}
