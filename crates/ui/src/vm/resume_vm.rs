use services::ResumeOffer;

use crate::vm::time_fmt::format_datetime;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResumePromptVm {
    pub title: &'static str,
    pub message: String,
    pub progress_line: String,
    pub is_finished: bool,
    pub continue_label: &'static str,
    pub restart_label: &'static str,
}

impl From<&ResumeOffer> for ResumePromptVm {
    fn from(offer: &ResumeOffer) -> Self {
        let saved_at = format_datetime(offer.saved_at);
        let (message, progress_line, continue_label) = if offer.is_finished {
            (
                format!("You have a completed exam from {saved_at}."),
                format!(
                    "All {} questions completed ({}%)",
                    offer.total, offer.progress_percent
                ),
                "View Summary",
            )
        } else {
            (
                format!("You have an unfinished exam from {saved_at}."),
                format!(
                    "Progress: {}/{} answered ({}%)",
                    offer.answered, offer.total, offer.progress_percent
                ),
                "Resume Exam",
            )
        };

        Self {
            title: "Resume Previous Session?",
            message,
            progress_line,
            is_finished: offer.is_finished,
            continue_label,
            restart_label: "Start New",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use exam_core::time::fixed_now;

    fn offer(answered: usize, is_finished: bool) -> ResumeOffer {
        ResumeOffer {
            filename: "bank.json".into(),
            saved_at: fixed_now(),
            answered,
            total: 4,
            progress_percent: u32::try_from(answered * 25).unwrap(),
            is_finished,
        }
    }

    #[test]
    fn unfinished_offer_resumes() {
        let vm = ResumePromptVm::from(&offer(1, false));
        assert_eq!(
            vm.message,
            "You have an unfinished exam from 2023-11-14 22:13 UTC."
        );
        assert_eq!(vm.progress_line, "Progress: 1/4 answered (25%)");
        assert_eq!(vm.continue_label, "Resume Exam");
    }

    #[test]
    fn finished_offer_views_summary() {
        let vm = ResumePromptVm::from(&offer(4, true));
        assert_eq!(vm.progress_line, "All 4 questions completed (100%)");
        assert_eq!(vm.continue_label, "View Summary");
    }
}
