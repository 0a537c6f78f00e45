use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use exam_core::model::{Question, QuestionDraft};

use crate::error::QuestionFileError;

/// Number of questions in one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryCount {
    pub name: String,
    pub count: usize,
}

/// A validated question file, as loaded from disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionBank {
    filename: String,
    questions: Vec<Question>,
}

impl QuestionBank {
    /// Parse and validate a question file.
    ///
    /// The whole file is rejected on the first structural problem; nothing is
    /// partially accepted.
    ///
    /// # Errors
    ///
    /// Returns `QuestionFileError` describing why the file was rejected.
    pub fn from_json(filename: impl Into<String>, text: &str) -> Result<Self, QuestionFileError> {
        let value: serde_json::Value = serde_json::from_str(text)?;
        let serde_json::Value::Array(entries) = value else {
            return Err(QuestionFileError::NotAnArray);
        };
        if entries.is_empty() {
            return Err(QuestionFileError::Empty);
        }

        let mut questions = Vec::with_capacity(entries.len());
        let mut seen = HashSet::new();
        for (index, entry) in entries.into_iter().enumerate() {
            let draft: QuestionDraft = serde_json::from_value(entry)
                .map_err(|source| QuestionFileError::MalformedEntry { index, source })?;
            let question = draft
                .validate()
                .map_err(|source| QuestionFileError::InvalidQuestion { index, source })?;
            if !seen.insert(question.number().clone()) {
                return Err(QuestionFileError::DuplicateNumber(question.number().clone()));
            }
            questions.push(question);
        }

        Ok(Self {
            filename: filename.into(),
            questions,
        })
    }

    /// Read and parse a question file. The bank is named after the file name.
    ///
    /// # Errors
    ///
    /// Returns `QuestionFileError::Io` if the file cannot be read, or any
    /// validation error from [`QuestionBank::from_json`].
    pub async fn load(path: &Path) -> Result<Self, QuestionFileError> {
        let text = tokio::fs::read_to_string(path).await?;
        let filename = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |name| name.to_string_lossy().into_owned());
        let bank = Self::from_json(filename, &text)?;
        tracing::debug!(file = %bank.filename, questions = bank.len(), "question file loaded");
        Ok(bank)
    }

    #[must_use]
    pub fn filename(&self) -> &str {
        &self.filename
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Categories sorted by name, with the number of questions in each.
    #[must_use]
    pub fn category_counts(&self) -> Vec<CategoryCount> {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for question in &self.questions {
            *counts.entry(question.category_or_default()).or_default() += 1;
        }
        counts
            .into_iter()
            .map(|(name, count)| CategoryCount {
                name: name.to_owned(),
                count,
            })
            .collect()
    }

    /// All category names, sorted.
    #[must_use]
    pub fn categories(&self) -> Vec<String> {
        self.category_counts()
            .into_iter()
            .map(|category| category.name)
            .collect()
    }

    /// Number of questions covered by the selected categories.
    #[must_use]
    pub fn selected_total(&self, selected: &[String]) -> usize {
        self.category_counts()
            .iter()
            .filter(|category| selected.contains(&category.name))
            .map(|category| category.count)
            .sum()
    }
}
