use rand::Rng;
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

use crate::model::ids::QuestionNumber;
use crate::model::letter::OptionLetter;
use crate::model::question::Question;
use crate::model::summary::ExamSummary;
use crate::shuffle::fisher_yates;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RestoreError {
    #[error("saved exam has no questions")]
    NoQuestions,

    #[error("current index {index} is out of bounds for {len} questions")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("question number {0} appears more than once")]
    DuplicateQuestion(QuestionNumber),

    #[error("question number {0} is not part of this exam")]
    UnknownQuestion(QuestionNumber),

    #[error("answers and results disagree for question {0}")]
    AnswerResultMismatch(QuestionNumber),

    #[error("score {score} does not match {correct} correct results")]
    ScoreMismatch { score: usize, correct: usize },
}

/// Aggregated view of exam progress, useful for UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExamProgress {
    pub total: usize,
    pub answered: usize,
    pub remaining: usize,
    pub is_complete: bool,
}

/// Persisted parts a session can be rebuilt from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionParts {
    pub questions: Vec<Question>,
    pub current_index: usize,
    pub answers: BTreeMap<QuestionNumber, Vec<OptionLetter>>,
    pub results: BTreeMap<QuestionNumber, bool>,
    pub marked: BTreeSet<QuestionNumber>,
    pub score: usize,
}

/// State of one exam attempt.
///
/// The question list is fixed at construction. Answers are final: once a
/// question has a result it is never overwritten. `answers` and `results`
/// always share the same keys and `score` equals the number of `true`
/// results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExamSession {
    original_questions: Vec<Question>,
    questions: Vec<Question>,
    current_index: usize,
    answers: BTreeMap<QuestionNumber, Vec<OptionLetter>>,
    results: BTreeMap<QuestionNumber, bool>,
    marked: BTreeSet<QuestionNumber>,
    score: usize,
}

impl ExamSession {
    /// Start a session over a copy of `questions`.
    ///
    /// The untouched input is kept as `original_questions`. The working list is
    /// optionally shuffled (question order, then option order per question)
    /// with `rng`.
    pub fn create<R: Rng + ?Sized>(
        questions: &[Question],
        shuffle_question_order: bool,
        shuffle_option_order: bool,
        rng: &mut R,
    ) -> Self {
        let original_questions = questions.to_vec();
        let mut working = questions.to_vec();

        if shuffle_question_order {
            fisher_yates(&mut working, rng);
        }
        if shuffle_option_order {
            for question in &mut working {
                question.shuffle_options(rng);
            }
        }

        Self {
            original_questions,
            questions: working,
            current_index: 0,
            answers: BTreeMap::new(),
            results: BTreeMap::new(),
            marked: BTreeSet::new(),
            score: 0,
        }
    }

    /// Rebuild a session from persisted parts without reshuffling.
    ///
    /// # Errors
    ///
    /// Returns `RestoreError` if the parts break a session invariant.
    pub fn restore(parts: SessionParts) -> Result<Self, RestoreError> {
        let SessionParts {
            questions,
            current_index,
            answers,
            results,
            marked,
            score,
        } = parts;

        if questions.is_empty() {
            return Err(RestoreError::NoQuestions);
        }
        if current_index >= questions.len() {
            return Err(RestoreError::IndexOutOfBounds {
                index: current_index,
                len: questions.len(),
            });
        }

        let mut known = BTreeSet::new();
        for question in &questions {
            if !known.insert(question.number().clone()) {
                return Err(RestoreError::DuplicateQuestion(question.number().clone()));
            }
        }

        for number in answers.keys().chain(results.keys()).chain(marked.iter()) {
            if !known.contains(number) {
                return Err(RestoreError::UnknownQuestion(number.clone()));
            }
        }
        if let Some(number) = answers
            .keys()
            .find(|n| !results.contains_key(*n))
            .or_else(|| results.keys().find(|n| !answers.contains_key(*n)))
        {
            return Err(RestoreError::AnswerResultMismatch(number.clone()));
        }

        let correct = results.values().filter(|ok| **ok).count();
        if correct != score {
            return Err(RestoreError::ScoreMismatch { score, correct });
        }

        Ok(Self {
            original_questions: questions.clone(),
            questions,
            current_index,
            answers,
            results,
            marked,
            score,
        })
    }

    //
    // ─── ACCESSORS ──────────────────────────────────────────────────────────────
    //

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// The question list as it was passed in, before any shuffling.
    #[must_use]
    pub fn original_questions(&self) -> &[Question] {
        &self.original_questions
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current_index)
    }

    #[must_use]
    pub fn answers(&self) -> &BTreeMap<QuestionNumber, Vec<OptionLetter>> {
        &self.answers
    }

    #[must_use]
    pub fn answer_for(&self, number: &QuestionNumber) -> Option<&[OptionLetter]> {
        self.answers.get(number).map(Vec::as_slice)
    }

    #[must_use]
    pub fn results(&self) -> &BTreeMap<QuestionNumber, bool> {
        &self.results
    }

    /// `None` means the question has not been answered.
    #[must_use]
    pub fn result_for(&self, number: &QuestionNumber) -> Option<bool> {
        self.results.get(number).copied()
    }

    #[must_use]
    pub fn is_answered(&self, number: &QuestionNumber) -> bool {
        self.results.contains_key(number)
    }

    #[must_use]
    pub fn marked(&self) -> &BTreeSet<QuestionNumber> {
        &self.marked
    }

    #[must_use]
    pub fn marked_count(&self) -> usize {
        self.marked.len()
    }

    #[must_use]
    pub fn score(&self) -> usize {
        self.score
    }

    /// Every question has a recorded result. An empty exam is never finished.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        !self.questions.is_empty() && self.results.len() >= self.questions.len()
    }

    #[must_use]
    pub fn progress(&self) -> ExamProgress {
        let total = self.total_questions();
        let answered = self.results.len();
        ExamProgress {
            total,
            answered,
            remaining: total.saturating_sub(answered),
            is_complete: self.is_finished(),
        }
    }

    //
    // ─── TRANSITIONS ────────────────────────────────────────────────────────────
    //

    /// Record an answer for the current question.
    ///
    /// Returns `Some(correct)` when recorded. Returns `None` and changes nothing
    /// when there is no current question or it was already answered.
    pub fn submit_answer(&mut self, letters: &[OptionLetter]) -> Option<bool> {
        let question = self.questions.get(self.current_index)?;
        let number = question.number().clone();
        if self.results.contains_key(&number) {
            return None;
        }

        let correct = question.is_correct_submission(letters);
        self.answers.insert(number.clone(), letters.to_vec());
        self.results.insert(number, correct);
        if correct {
            self.score += 1;
        }
        Some(correct)
    }

    /// Advance one question. Returns false at the last question.
    pub fn next_question(&mut self) -> bool {
        if self.current_index + 1 < self.questions.len() {
            self.current_index += 1;
            true
        } else {
            false
        }
    }

    /// Step back one question. Returns false at the first question.
    pub fn prev_question(&mut self) -> bool {
        if self.current_index > 0 {
            self.current_index -= 1;
            true
        } else {
            false
        }
    }

    /// Jump to an absolute position. Negative or out-of-range indexes are rejected.
    pub fn go_to_question<I: TryInto<usize>>(&mut self, index: I) -> bool {
        match index.try_into() {
            Ok(index) if index < self.questions.len() => {
                self.current_index = index;
                true
            }
            _ => false,
        }
    }

    #[must_use]
    pub fn is_marked(&self, number: &QuestionNumber) -> bool {
        self.marked.contains(number)
    }

    /// Flip the review mark of a question and return the new state.
    pub fn toggle_mark(&mut self, number: &QuestionNumber) -> bool {
        if self.marked.remove(number) {
            false
        } else {
            self.marked.insert(number.clone());
            true
        }
    }

    #[must_use]
    pub fn summary(&self) -> ExamSummary {
        let correct = self.results.values().filter(|ok| **ok).count();
        ExamSummary::from_counts(
            self.questions.len(),
            self.results.len(),
            correct,
            self.score,
        )
    }

    /// Copy the session into its persistable parts.
    #[must_use]
    pub fn to_parts(&self) -> SessionParts {
        SessionParts {
            questions: self.questions.clone(),
            current_index: self.current_index,
            answers: self.answers.clone(),
            results: self.results.clone(),
            marked: self.marked.clone(),
            score: self.score,
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
