use exam_core::model::{ExamSummary, PASS_THRESHOLD};
use services::ActiveExam;

use crate::vm::exam_vm::{
    OptionVm, QuestionDotVm, join_letters, map_options, map_question_grid, mark_label,
};

#[derive(Clone, Debug, PartialEq)]
pub struct SummaryVm {
    pub passed: bool,
    pub headline: &'static str,
    pub score_line: String,
    pub total: usize,
    pub answered: usize,
    pub unanswered: usize,
    pub correct: usize,
    pub incorrect: usize,
    pub percentage: f64,
    pub percentage_label: String,
    pub marked_count: usize,
    pub selected_categories: Vec<String>,
    pub grid: Vec<QuestionDotVm>,
}

/// Drill-down into one question from the summary grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReviewDetailVm {
    pub index: usize,
    pub heading: String,
    pub text: String,
    pub is_multi_select: bool,
    pub options: Vec<OptionVm>,
    pub your_answer: String,
    pub correct_answer: String,
    pub result_label: &'static str,
    pub explanation: Option<String>,
    pub references: Vec<String>,
    pub is_marked: bool,
    pub mark_label: &'static str,
}

fn headline(summary: &ExamSummary) -> &'static str {
    if summary.passed {
        "PASSED!"
    } else {
        "DID NOT PASS"
    }
}

/// Summary screen; `reviewing` is the grid cell whose detail is open.
#[must_use]
pub fn map_summary(exam: &ActiveExam, reviewing: Option<usize>) -> SummaryVm {
    let session = exam.session();
    let summary = session.summary();
    let selected_categories = if exam.selected_categories().is_empty() {
        vec!["All".to_string()]
    } else {
        exam.selected_categories().to_vec()
    };

    SummaryVm {
        passed: summary.passed,
        headline: headline(&summary),
        score_line: format!(
            "Score: {}% ({PASS_THRESHOLD}% required to pass)",
            summary.percentage
        ),
        total: summary.total,
        answered: summary.answered,
        unanswered: summary.unanswered,
        correct: summary.correct,
        incorrect: summary.incorrect,
        percentage: summary.percentage,
        percentage_label: format!("{}%", summary.percentage),
        marked_count: session.marked_count(),
        selected_categories,
        grid: map_question_grid(session, reviewing),
    }
}

/// Detail for the question at `index`, `None` when out of range.
#[must_use]
pub fn map_review_detail(exam: &ActiveExam, index: usize) -> Option<ReviewDetailVm> {
    let session = exam.session();
    let question = session.questions().get(index)?;
    let number = question.number();
    let submitted = session.answer_for(number);
    let result_label = match session.result_for(number) {
        Some(true) => "Correct",
        Some(false) => "Incorrect",
        None => "Not answered",
    };
    let is_marked = session.is_marked(number);

    Some(ReviewDetailVm {
        index,
        heading: format!("Question {}", index + 1),
        text: question.text().to_string(),
        is_multi_select: question.is_multi_select(),
        // Unanswered questions still reveal the correct options here.
        options: map_options(question, Some(submitted.unwrap_or_default())),
        your_answer: join_letters(submitted.unwrap_or_default()),
        correct_answer: join_letters(question.correct_answers()),
        result_label,
        explanation: question.explanation().map(str::to_string),
        references: question.references().to_vec(),
        is_marked,
        mark_label: mark_label(is_marked),
    })
}
