use rand::Rng;

use exam_core::model::Question;
use exam_core::shuffle::fisher_yates;

use crate::error::ExamConfigError;
use crate::question_bank::QuestionBank;

/// User choices for one practice run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExamConfig {
    pub categories: Vec<String>,
    pub count: usize,
    pub shuffle_questions: bool,
    pub shuffle_options: bool,
}

impl ExamConfig {
    /// Every category selected and every question asked, no shuffling.
    #[must_use]
    pub fn all_questions(bank: &QuestionBank) -> Self {
        Self {
            categories: bank.categories(),
            count: bank.len(),
            shuffle_questions: false,
            shuffle_options: false,
        }
    }
}

/// Questions picked for an exam.
#[derive(Debug, Clone, PartialEq)]
pub struct ExamPlan {
    pub questions: Vec<Question>,
    /// Questions that matched the category filter before truncation.
    pub available: usize,
}

impl ExamPlan {
    /// Total number of questions in this plan.
    #[must_use]
    pub fn total(&self) -> usize {
        self.questions.len()
    }
}

/// Derives the question list for an exam from a full question set.
///
/// Filters by category, optionally shuffles the filtered list, then keeps the
/// first `count` questions.
pub struct ExamPlanBuilder<'a> {
    questions: &'a [Question],
    categories: &'a [String],
    count: usize,
    shuffle: bool,
}

impl<'a> ExamPlanBuilder<'a> {
    #[must_use]
    pub fn new(questions: &'a [Question]) -> Self {
        Self {
            questions,
            categories: &[],
            count: questions.len(),
            shuffle: false,
        }
    }

    #[must_use]
    pub fn with_categories(mut self, categories: &'a [String]) -> Self {
        self.categories = categories;
        self
    }

    #[must_use]
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    /// Enable or disable shuffling of the filtered questions before truncation.
    #[must_use]
    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    /// Validate the configuration and build the plan.
    ///
    /// # Errors
    ///
    /// Returns `ExamConfigError` when the count is zero, no category is
    /// selected, the selection matches nothing, or the count exceeds the matches.
    pub fn build<R: Rng + ?Sized>(self, rng: &mut R) -> Result<ExamPlan, ExamConfigError> {
        if self.count < 1 {
            return Err(ExamConfigError::InvalidCount);
        }
        if self.categories.is_empty() {
            return Err(ExamConfigError::NoCategories);
        }

        let mut selected: Vec<Question> = self
            .questions
            .iter()
            .filter(|q| {
                let category = q.category_or_default();
                self.categories.iter().any(|c| c == category)
            })
            .cloned()
            .collect();

        if selected.is_empty() {
            return Err(ExamConfigError::NoQuestions);
        }
        let available = selected.len();
        if self.count > available {
            return Err(ExamConfigError::TooManyQuestions {
                requested: self.count,
                available,
            });
        }

        if self.shuffle {
            fisher_yates(&mut selected, rng);
        }
        selected.truncate(self.count);

        Ok(ExamPlan {
            questions: selected,
            available,
        })
    }
}
