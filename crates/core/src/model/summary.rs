/// Percentage needed to pass an exam.
pub const PASS_THRESHOLD: f64 = 70.0;

/// Pass/fail summary of one exam attempt.
///
/// `percentage` is measured against the total number of questions, so an
/// unfinished exam cannot score above `answered / total`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExamSummary {
    pub total: usize,
    pub answered: usize,
    pub unanswered: usize,
    pub correct: usize,
    pub incorrect: usize,
    pub percentage: f64,
    pub passed: bool,
    pub score: usize,
}

impl ExamSummary {
    /// Build a summary from raw counts.
    ///
    /// `answered` and `correct` are clamped so the derived counts never underflow.
    #[must_use]
    pub fn from_counts(total: usize, answered: usize, correct: usize, score: usize) -> Self {
        let answered = answered.min(total);
        let correct = correct.min(answered);
        let percentage = percentage_of(correct, total);

        Self {
            total,
            answered,
            unanswered: total - answered,
            correct,
            incorrect: answered - correct,
            percentage,
            passed: percentage >= PASS_THRESHOLD,
            score,
        }
    }
}

/// `correct / total` as a percentage rounded to one decimal place.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn percentage_of(correct: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (correct as f64 / total as f64 * 1000.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seven_of_ten_passes() {
        let summary = ExamSummary::from_counts(10, 9, 7, 7);
        assert_eq!(summary.percentage, 70.0);
        assert!(summary.passed);
        assert_eq!(summary.incorrect, 2);
        assert_eq!(summary.unanswered, 1);
    }

    #[test]
    fn six_of_ten_fails() {
        let summary = ExamSummary::from_counts(10, 10, 6, 6);
        assert_eq!(summary.percentage, 60.0);
        assert!(!summary.passed);
    }

    #[test]
    fn rounds_to_one_decimal() {
        assert_eq!(percentage_of(2, 3), 66.7);
        assert_eq!(percentage_of(1, 3), 33.3);
        assert_eq!(percentage_of(1, 8), 12.5);
    }

    #[test]
    fn empty_exam_scores_zero() {
        let summary = ExamSummary::from_counts(0, 0, 0, 0);
        assert_eq!(summary.percentage, 0.0);
        assert!(!summary.passed);
    }
}
