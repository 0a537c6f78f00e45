use chrono::{DateTime, Utc};
use rand::Rng;

use exam_core::model::{ExamSession, OptionLetter, QuestionNumber, percentage_of};

use super::active::ActiveExam;
use super::plan::{ExamConfig, ExamPlanBuilder};
use super::progress::ProgressService;
use crate::answer_input::validate_selection;
use crate::error::{AnswerInputError, ExamError};
use crate::question_bank::QuestionBank;

/// A saved exam that can be picked up again.
#[derive(Debug, Clone, PartialEq)]
pub struct ResumeOffer {
    pub filename: String,
    pub saved_at: DateTime<Utc>,
    pub answered: usize,
    pub total: usize,
    /// Share of questions answered, rounded to a whole percent.
    pub progress_percent: u32,
    /// When set, the saved exam has nothing left to answer and only its
    /// summary is worth showing.
    pub is_finished: bool,
}

/// Result of submitting one answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub number: QuestionNumber,
    pub correct: bool,
    pub is_finished: bool,
}

/// Drives an exam: start or resume, answer, navigate and mark, saving
/// progress after every change.
#[derive(Clone)]
pub struct ExamLoopService {
    progress: ProgressService,
}

impl ExamLoopService {
    #[must_use]
    pub fn new(progress: ProgressService) -> Self {
        Self { progress }
    }

    #[must_use]
    pub fn progress(&self) -> &ProgressService {
        &self.progress
    }

    /// Describe saved progress for `filename`, if any.
    ///
    /// Progress saved for another question file is not offered.
    pub async fn resume_offer(&self, filename: &str) -> Option<ResumeOffer> {
        let saved = self.progress.load().await?;
        let snapshot = &saved.snapshot;
        if snapshot.filename != filename {
            tracing::debug!(
                saved = %snapshot.filename,
                loaded = %filename,
                "saved progress belongs to another file"
            );
            return None;
        }

        let answered = snapshot.answered();
        let total = snapshot.total();
        Some(ResumeOffer {
            filename: snapshot.filename.clone(),
            saved_at: saved.saved_at,
            answered,
            total,
            progress_percent: whole_percent(answered, total),
            is_finished: snapshot.is_finished(),
        })
    }

    /// Build a fresh exam from `bank` and drop any saved progress.
    ///
    /// Question order is shuffled while the plan is drawn; option order is
    /// shuffled by the session itself.
    ///
    /// # Errors
    ///
    /// Returns `ExamError::Config` when the configuration is rejected; nothing
    /// is cleared in that case.
    pub async fn start_exam<R: Rng + ?Sized>(
        &self,
        bank: &QuestionBank,
        config: &ExamConfig,
        rng: &mut R,
    ) -> Result<ActiveExam, ExamError> {
        let plan = ExamPlanBuilder::new(bank.questions())
            .with_categories(&config.categories)
            .with_count(config.count)
            .with_shuffle(config.shuffle_questions)
            .build(rng)?;

        let session = ExamSession::create(&plan.questions, false, config.shuffle_options, rng);
        self.progress.clear().await;
        tracing::debug!(
            file = %bank.filename(),
            questions = plan.total(),
            available = plan.available,
            "exam started"
        );

        Ok(ActiveExam::new(
            session,
            bank.filename(),
            config.categories.clone(),
            config.shuffle_options,
        ))
    }

    /// Rebuild the saved exam for `filename`.
    ///
    /// Returns `None` when nothing usable is saved for that file.
    pub async fn resume(&self, filename: &str) -> Option<ActiveExam> {
        let saved = self.progress.load().await?;
        if saved.snapshot.filename != filename {
            return None;
        }
        match saved.snapshot.into_active() {
            Ok(exam) => {
                tracing::debug!(
                    file = %filename,
                    answered = exam.session().results().len(),
                    "exam resumed"
                );
                Some(exam)
            }
            Err(err) => {
                tracing::warn!(file = %filename, error = %err, "saved progress is inconsistent");
                None
            }
        }
    }

    /// Forget saved progress.
    pub async fn discard_progress(&self) {
        self.progress.clear().await;
    }

    /// Score `letters` against the current question and save.
    ///
    /// # Errors
    ///
    /// Returns `ExamError::Answer` when there is no current question, it was
    /// already answered, or the selection is not acceptable.
    pub async fn submit_answer(
        &self,
        exam: &mut ActiveExam,
        letters: &[OptionLetter],
    ) -> Result<AnswerOutcome, ExamError> {
        let question = exam
            .session()
            .current_question()
            .ok_or(AnswerInputError::NoActiveQuestion)?;
        let number = question.number().clone();
        if exam.session().is_answered(&number) {
            return Err(AnswerInputError::AlreadyAnswered.into());
        }
        validate_selection(question, letters)?;

        let correct = exam
            .session_mut()
            .submit_answer(letters)
            .ok_or(AnswerInputError::AlreadyAnswered)?;
        self.progress.save(exam).await;
        tracing::debug!(question = %number, correct, "answer recorded");

        Ok(AnswerOutcome {
            number,
            correct,
            is_finished: exam.is_finished(),
        })
    }

    /// Move to the next question. Returns whether the index changed.
    pub async fn next_question(&self, exam: &mut ActiveExam) -> bool {
        let moved = exam.session_mut().next_question();
        self.save_if(moved, exam).await
    }

    /// Move to the previous question. Returns whether the index changed.
    pub async fn prev_question(&self, exam: &mut ActiveExam) -> bool {
        let moved = exam.session_mut().prev_question();
        self.save_if(moved, exam).await
    }

    /// Jump to a zero-based question index. Returns whether it was accepted.
    pub async fn go_to_question<I: TryInto<usize>>(&self, exam: &mut ActiveExam, index: I) -> bool {
        let moved = exam.session_mut().go_to_question(index);
        self.save_if(moved, exam).await
    }

    /// Flip the mark on the current question. Returns the new state, or
    /// `None` when there is no current question.
    pub async fn toggle_mark_current(&self, exam: &mut ActiveExam) -> Option<bool> {
        let number = exam.session().current_question()?.number().clone();
        self.toggle_mark(exam, &number).await
    }

    /// Flip the mark on any question of the exam, for marking from the
    /// summary grid. Returns the new state, or `None` for a number that is not
    /// part of the exam.
    pub async fn toggle_mark(
        &self,
        exam: &mut ActiveExam,
        number: &QuestionNumber,
    ) -> Option<bool> {
        let known = exam
            .session()
            .questions()
            .iter()
            .any(|q| q.number() == number);
        if !known {
            return None;
        }
        let marked = exam.session_mut().toggle_mark(number);
        self.progress.save(exam).await;
        Some(marked)
    }

    async fn save_if(&self, changed: bool, exam: &ActiveExam) -> bool {
        if changed {
            self.progress.save(exam).await;
        }
        changed
    }
}

fn whole_percent(answered: usize, total: usize) -> u32 {
    // percentage_of keeps one decimal; the resume prompt shows whole percents.
    let percent = percentage_of(answered, total).round();
    if percent <= 0.0 {
        0
    } else {
        percent as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_percent_rounds() {
        assert_eq!(whole_percent(0, 0), 0);
        assert_eq!(whole_percent(1, 3), 33);
        assert_eq!(whole_percent(2, 3), 67);
        assert_eq!(whole_percent(5, 5), 100);
    }
}
