use exam_core::model::{ExamSession, OptionLetter, Question, QuestionNumber};
use services::ActiveExam;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OptionState {
    /// Not answered yet, or neither selected nor correct.
    Plain,
    /// One of the correct answers.
    Correct,
    /// Selected but wrong.
    Incorrect,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionVm {
    pub letter: OptionLetter,
    pub text: String,
    pub selected: bool,
    pub state: OptionState,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeedbackVm {
    pub correct: bool,
    pub title: String,
    pub your_answer: String,
    pub correct_answer: String,
    pub explanation: Option<String>,
    pub references: Vec<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DotStatus {
    Unanswered,
    Correct,
    Incorrect,
}

/// One cell of the question grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionDotVm {
    pub index: usize,
    pub label: String,
    pub status: DotStatus,
    pub is_current: bool,
    pub is_marked: bool,
    pub title: &'static str,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProgressVm {
    pub answered: usize,
    pub total: usize,
    pub percent: u32,
    pub label: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExamQuestionVm {
    pub number: QuestionNumber,
    pub header: String,
    pub instruction: String,
    pub category: String,
    pub text: String,
    pub is_multi_select: bool,
    pub options: Vec<OptionVm>,
    pub feedback: Option<FeedbackVm>,
    pub is_marked: bool,
    pub mark_label: &'static str,
    pub can_prev: bool,
    pub can_next: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExamScreenVm {
    pub progress: ProgressVm,
    pub question: Option<ExamQuestionVm>,
    pub navigator: Vec<QuestionDotVm>,
}

#[must_use]
pub fn mark_label(is_marked: bool) -> &'static str {
    if is_marked {
        "Unmark Question"
    } else {
        "Mark for Review"
    }
}

/// Letters joined for display, `"None"` when empty.
#[must_use]
pub fn join_letters(letters: &[OptionLetter]) -> String {
    if letters.is_empty() {
        return "None".to_string();
    }
    letters
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[must_use]
pub fn map_progress(session: &ExamSession) -> ProgressVm {
    let progress = session.progress();
    let percent = if progress.total == 0 {
        0
    } else {
        u32::try_from((progress.answered * 100 + progress.total / 2) / progress.total)
            .unwrap_or(100)
    };
    ProgressVm {
        answered: progress.answered,
        total: progress.total,
        percent,
        label: format!(
            "Progress: {}/{} questions answered ({percent}%)",
            progress.answered, progress.total
        ),
    }
}

/// Options of `question` as they should be shown, given the submitted answer.
#[must_use]
pub fn map_options(question: &Question, submitted: Option<&[OptionLetter]>) -> Vec<OptionVm> {
    question
        .options()
        .iter()
        .map(|option| {
            let letter = option.letter();
            let selected = submitted.is_some_and(|letters| letters.contains(&letter));
            let state = match submitted {
                None => OptionState::Plain,
                Some(_) if question.is_correct_letter(letter) => OptionState::Correct,
                Some(_) if selected => OptionState::Incorrect,
                Some(_) => OptionState::Plain,
            };
            OptionVm {
                letter,
                text: option.text().to_string(),
                selected,
                state,
            }
        })
        .collect()
}

#[must_use]
pub fn map_feedback(question: &Question, submitted: &[OptionLetter], correct: bool) -> FeedbackVm {
    FeedbackVm {
        correct,
        title: if correct { "Correct!" } else { "Incorrect" }.to_string(),
        your_answer: join_letters(submitted),
        correct_answer: join_letters(question.correct_answers()),
        explanation: question.explanation().map(str::to_string),
        references: question.references().to_vec(),
    }
}

/// Grid of every question, highlighting `current` when given.
#[must_use]
pub fn map_question_grid(session: &ExamSession, current: Option<usize>) -> Vec<QuestionDotVm> {
    session
        .questions()
        .iter()
        .enumerate()
        .map(|(index, question)| {
            let number = question.number();
            let status = match session.result_for(number) {
                None => DotStatus::Unanswered,
                Some(true) => DotStatus::Correct,
                Some(false) => DotStatus::Incorrect,
            };
            let is_marked = session.is_marked(number);
            let title = if is_marked {
                "Marked for review"
            } else {
                match status {
                    DotStatus::Unanswered => "Unanswered",
                    DotStatus::Correct => "Correct",
                    DotStatus::Incorrect => "Incorrect",
                }
            };
            QuestionDotVm {
                index,
                label: (index + 1).to_string(),
                status,
                is_current: current == Some(index),
                is_marked,
                title,
            }
        })
        .collect()
}

fn map_question(session: &ExamSession, question: &Question) -> ExamQuestionVm {
    let number = question.number().clone();
    let index = session.current_index();
    let total = session.total_questions();
    let submitted = session.answer_for(&number);
    let feedback = submitted
        .zip(session.result_for(&number))
        .map(|(letters, correct)| map_feedback(question, letters, correct));
    let instruction = if question.is_multi_select() {
        format!("Select {} answers", question.correct_answers().len())
    } else {
        "Select 1 answer".to_string()
    };
    let is_marked = session.is_marked(&number);

    ExamQuestionVm {
        header: format!("Question {} of {total}", index + 1),
        instruction,
        category: question.category_or_default().to_string(),
        text: question.text().to_string(),
        is_multi_select: question.is_multi_select(),
        options: map_options(question, submitted),
        feedback,
        is_marked,
        mark_label: mark_label(is_marked),
        can_prev: index > 0,
        can_next: index + 1 < total,
        number,
    }
}

#[must_use]
pub fn map_exam_screen(exam: &ActiveExam) -> ExamScreenVm {
    let session = exam.session();
    ExamScreenVm {
        progress: map_progress(session),
        question: session
            .current_question()
            .map(|question| map_question(session, question)),
        navigator: map_question_grid(session, Some(session.current_index())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use exam_core::model::QuestionDraft;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use OptionLetter::{A, B, C};

    fn session() -> ExamSession {
        let questions = vec![
            QuestionDraft::new(1, "Pick b")
                .with_option("a", "x")
                .with_option("b", "y")
                .with_correct("b")
                .with_explanation("because")
                .validate()
                .unwrap(),
            QuestionDraft::new(2, "Pick a and c")
                .with_option("a", "x")
                .with_option("b", "y")
                .with_option("c", "z")
                .with_correct("a")
                .with_correct("c")
                .with_category("Net")
                .validate()
                .unwrap(),
            QuestionDraft::new(3, "Pick a")
                .with_option("a", "x")
                .with_option("b", "y")
                .with_correct("a")
                .validate()
                .unwrap(),
        ];
        let mut rng = StdRng::seed_from_u64(0);
        ExamSession::create(&questions, false, false, &mut rng)
    }

    fn active(session: ExamSession) -> ActiveExam {
        ActiveExam::new(session, "bank.json", Vec::new(), false)
    }

    #[test]
    fn unanswered_question_has_no_feedback() {
        let vm = map_exam_screen(&active(session()));
        let question = vm.question.unwrap();

        assert_eq!(question.header, "Question 1 of 3");
        assert_eq!(question.instruction, "Select 1 answer");
        assert_eq!(question.category, "Uncategorized");
        assert!(question.feedback.is_none());
        assert!(question.options.iter().all(|o| o.state == OptionState::Plain));
        assert!(!question.can_prev);
        assert!(question.can_next);
        assert_eq!(question.mark_label, "Mark for Review");
        assert_eq!(vm.progress.label, "Progress: 0/3 questions answered (0%)");
    }

    #[test]
    fn answered_question_shows_correct_and_wrong_options() {
        let mut session = session();
        session.submit_answer(&[A]);
        let vm = map_exam_screen(&active(session));
        let question = vm.question.unwrap();
        let feedback = question.feedback.unwrap();

        assert_eq!(question.options[0].state, OptionState::Incorrect);
        assert!(question.options[0].selected);
        assert_eq!(question.options[1].state, OptionState::Correct);
        assert!(!feedback.correct);
        assert_eq!(feedback.title, "Incorrect");
        assert_eq!(feedback.your_answer, "a");
        assert_eq!(feedback.correct_answer, "b");
        assert_eq!(feedback.explanation.as_deref(), Some("because"));
        assert_eq!(vm.progress.percent, 33);
    }

    #[test]
    fn multi_select_instruction_counts_answers() {
        let mut session = session();
        session.next_question();
        let question = map_exam_screen(&active(session)).question.unwrap();

        assert_eq!(question.header, "Question 2 of 3");
        assert_eq!(question.instruction, "Select 2 answers");
        assert_eq!(question.category, "Net");
        assert!(question.is_multi_select);
        assert!(question.can_prev);
    }

    #[test]
    fn grid_reports_status_current_and_marks() {
        let mut session = session();
        session.submit_answer(&[B]);
        session.toggle_mark(&QuestionNumber::from(3));

        let grid = map_question_grid(&session, Some(0));
        assert_eq!(grid[0].status, DotStatus::Correct);
        assert!(grid[0].is_current);
        assert_eq!(grid[0].title, "Correct");
        assert_eq!(grid[1].status, DotStatus::Unanswered);
        assert!(!grid[1].is_current);
        assert!(grid[2].is_marked);
        assert_eq!(grid[2].title, "Marked for review");
        assert_eq!(grid[2].label, "3");
    }

    #[test]
    fn empty_selection_joins_to_none() {
        assert_eq!(join_letters(&[]), "None");
        assert_eq!(join_letters(&[A, C]), "a, c");
    }
}
