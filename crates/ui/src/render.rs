//! Plain-text rendering of the view models for a terminal.

use crate::vm::{
    ConfigVm, DotStatus, ExamScreenVm, FeedbackVm, OptionState, OptionVm, QuestionDotVm,
    ResumePromptVm, ReviewDetailVm, SummaryVm,
};

/// Marker shown next to a marked question.
pub const PIN: &str = "*";

fn option_line(option: &OptionVm, multi_select: bool) -> String {
    let check = match (multi_select, option.selected) {
        (true, true) => "[x]",
        (true, false) => "[ ]",
        (false, true) => "(o)",
        (false, false) => "( )",
    };
    let verdict = match option.state {
        OptionState::Plain => "",
        OptionState::Correct => "  ✓",
        OptionState::Incorrect => "  ✗",
    };
    format!("  {check} {}) {}{verdict}", option.letter, option.text)
}

fn feedback_lines(feedback: &FeedbackVm, lines: &mut Vec<String>) {
    let mark = if feedback.correct { "✓" } else { "✗" };
    lines.push(format!("{mark} {}", feedback.title));
    lines.push(format!("Your answer: {}", feedback.your_answer));
    lines.push(format!("Correct answer: {}", feedback.correct_answer));
    notes_lines(feedback.explanation.as_deref(), &feedback.references, lines);
}

fn notes_lines(explanation: Option<&str>, references: &[String], lines: &mut Vec<String>) {
    if let Some(explanation) = explanation {
        lines.push(String::new());
        lines.push("Explanation".to_string());
        lines.push(format!("  {explanation}"));
    }
    if !references.is_empty() {
        lines.push(String::new());
        lines.push("References".to_string());
        lines.extend(references.iter().map(|url| format!("  {url}")));
    }
}

fn dot(dot: &QuestionDotVm) -> String {
    let status = match dot.status {
        DotStatus::Unanswered => "·",
        DotStatus::Correct => "✓",
        DotStatus::Incorrect => "✗",
    };
    let pin = if dot.is_marked { PIN } else { "" };
    if dot.is_current {
        format!("[{}{status}{pin}]", dot.label)
    } else {
        format!(" {}{status}{pin} ", dot.label)
    }
}

/// Question grid, ten cells per row.
#[must_use]
pub fn render_grid(grid: &[QuestionDotVm]) -> String {
    grid.chunks(10)
        .map(|row| row.iter().map(dot).collect::<Vec<_>>().join(""))
        .collect::<Vec<_>>()
        .join("\n")
}

#[must_use]
pub fn render_config(vm: &ConfigVm) -> String {
    let mut lines = vec![
        format!("File: {}", vm.filename),
        format!(
            "{} questions in {} categories",
            vm.total_questions, vm.total_categories
        ),
        String::new(),
    ];
    for category in &vm.categories {
        let check = if category.selected { "[x]" } else { "[ ]" };
        lines.push(format!("  {check} {}", category.label));
    }
    lines.push(String::new());
    lines.push(vm.count_help.clone());
    lines.join("\n")
}

#[must_use]
pub fn render_exam_screen(vm: &ExamScreenVm) -> String {
    let mut lines = vec![vm.progress.label.clone()];
    let Some(question) = &vm.question else {
        lines.push("No questions in this exam.".to_string());
        return lines.join("\n");
    };

    lines.push(String::new());
    let pin = if question.is_marked { format!(" {PIN}") } else { String::new() };
    lines.push(format!(
        "{}  [{}]  {}{pin}",
        question.header, question.category, question.instruction
    ));
    lines.push(String::new());
    lines.push(question.text.clone());
    lines.push(String::new());
    lines.extend(
        question
            .options
            .iter()
            .map(|option| option_line(option, question.is_multi_select)),
    );
    if let Some(feedback) = &question.feedback {
        lines.push(String::new());
        feedback_lines(feedback, &mut lines);
    }
    lines.push(String::new());
    lines.push(render_grid(&vm.navigator));
    lines.join("\n")
}

#[must_use]
pub fn render_summary(vm: &SummaryVm) -> String {
    let mark = if vm.passed { "✓" } else { "✗" };
    let mut lines = vec![
        format!("{mark} {}", vm.headline),
        vm.score_line.clone(),
        String::new(),
        format!("Total questions: {}", vm.total),
        format!("Correct: {}", vm.correct),
        format!("Incorrect: {}", vm.incorrect),
        format!("Unanswered: {}", vm.unanswered),
        format!("Score: {}", vm.percentage_label),
        format!("Marked for review: {}", vm.marked_count),
        format!("Categories: {}", vm.selected_categories.join(", ")),
        String::new(),
    ];
    lines.push(render_grid(&vm.grid));
    lines.join("\n")
}

#[must_use]
pub fn render_review_detail(vm: &ReviewDetailVm) -> String {
    let pin = if vm.is_marked { format!(" {PIN}") } else { String::new() };
    let mut lines = vec![
        format!("{}{pin}", vm.heading),
        String::new(),
        vm.text.clone(),
        String::new(),
    ];
    lines.extend(
        vm.options
            .iter()
            .map(|option| option_line(option, vm.is_multi_select)),
    );
    lines.push(String::new());
    lines.push(format!("Your answer: {}", vm.your_answer));
    lines.push(format!("Correct answer: {}", vm.correct_answer));
    lines.push(vm.result_label.to_string());
    notes_lines(vm.explanation.as_deref(), &vm.references, &mut lines);
    lines.join("\n")
}

#[must_use]
pub fn render_resume_prompt(vm: &ResumePromptVm) -> String {
    [
        vm.title.to_string(),
        vm.message.clone(),
        vm.progress_line.clone(),
        format!("[c] {}   [r] {}", vm.continue_label, vm.restart_label),
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use exam_core::model::{ExamSession, OptionLetter, QuestionDraft, QuestionNumber};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use services::ActiveExam;

    use crate::vm::{map_exam_screen, map_review_detail, map_summary};

    fn exam() -> ActiveExam {
        let questions: Vec<_> = (1..=12)
            .map(|n| {
                QuestionDraft::new(n, format!("Question text {n}"))
                    .with_option("a", "alpha")
                    .with_option("b", "beta")
                    .with_correct("a")
                    .with_explanation("alpha is first")
                    .validate()
                    .unwrap()
            })
            .collect();
        let mut rng = StdRng::seed_from_u64(5);
        let mut session = ExamSession::create(&questions, false, false, &mut rng);
        session.submit_answer(&[OptionLetter::B]);
        session.toggle_mark(&QuestionNumber::from(1));
        ActiveExam::new(session, "bank.json", Vec::new(), false)
    }

    #[test]
    fn exam_screen_shows_feedback_and_grid() {
        let text = render_exam_screen(&map_exam_screen(&exam()));

        assert!(text.starts_with("Progress: 1/12 questions answered (8%)"));
        assert!(text.contains("Question 1 of 12  [Uncategorized]  Select 1 answer *"));
        assert!(text.contains("  ( ) a) alpha  ✓"));
        assert!(text.contains("  (o) b) beta  ✗"));
        assert!(text.contains("✗ Incorrect"));
        assert!(text.contains("Explanation\n  alpha is first"));
        assert!(text.contains("[1✗*]"));
        assert_eq!(text.lines().last(), Some(" 11·  12· "));
    }

    #[test]
    fn grid_wraps_every_ten_cells() {
        let vm = map_exam_screen(&exam());
        assert_eq!(render_grid(&vm.navigator).lines().count(), 2);
    }

    #[test]
    fn summary_and_detail_render() {
        let exam = exam();
        let summary = render_summary(&map_summary(&exam, Some(0)));
        assert!(summary.starts_with("✗ DID NOT PASS\nScore: 0% (70% required to pass)"));
        assert!(summary.contains("Unanswered: 11"));
        assert!(summary.contains("Categories: All"));

        let detail = render_review_detail(&map_review_detail(&exam, 0).unwrap());
        assert!(detail.starts_with("Question 1 *"));
        assert!(detail.contains("Your answer: b\nCorrect answer: a\nIncorrect"));
    }
}
