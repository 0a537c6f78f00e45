//! Line-oriented exam loop over any async reader and writer.

use anyhow::{Context, Result};
use rand::Rng;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, Lines};

use services::{ActiveExam, ExamConfig, ExamLoopService, QuestionBank};
use ui::render::{
    render_config, render_exam_screen, render_resume_prompt, render_review_detail, render_summary,
};
use ui::vm::{ResumePromptVm, map_config, map_exam_screen, map_review_detail, map_summary};

use crate::commands::{
    EXAM_HELP, ExamCommand, ResumeChoice, SUMMARY_HELP, SummaryCommand, parse_exam_command,
    parse_resume_choice, parse_summary_command,
};

enum Flow {
    Exam,
    Summary,
    Quit,
}

/// What the user chose at the resume prompt.
enum ResumeDecision {
    Resume(ActiveExam),
    StartNew,
    /// Input ended before a choice was made; saved progress stays untouched.
    Quit,
}

pub struct Terminal<R, W> {
    lines: Lines<R>,
    out: W,
    exam_loop: ExamLoopService,
}

impl<R, W> Terminal<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(input: R, out: W, exam_loop: ExamLoopService) -> Self {
        Self {
            lines: input.lines(),
            out,
            exam_loop,
        }
    }

    /// Hand back the writer, mainly so tests can inspect the transcript.
    pub fn into_output(self) -> W {
        self.out
    }

    async fn say(&mut self, text: &str) -> Result<()> {
        self.out.write_all(text.as_bytes()).await?;
        self.out.write_all(b"\n").await?;
        self.out.flush().await?;
        Ok(())
    }

    async fn prompt(&mut self, label: &str) -> Result<Option<String>> {
        self.out.write_all(label.as_bytes()).await?;
        self.out.flush().await?;
        Ok(self.lines.next_line().await.context("read input")?)
    }

    /// Offer to resume, then run an exam until the user quits or input ends.
    ///
    /// # Errors
    ///
    /// Fails when the configuration is rejected or the terminal cannot be
    /// read or written.
    pub async fn run<G: Rng + ?Sized>(
        &mut self,
        bank: &QuestionBank,
        config: &ExamConfig,
        restart: bool,
        rng: &mut G,
    ) -> Result<()> {
        let decision = if restart {
            ResumeDecision::StartNew
        } else {
            self.offer_resume(bank.filename()).await?
        };

        let (mut exam, mut flow) = match decision {
            ResumeDecision::Quit => return Ok(()),
            ResumeDecision::Resume(exam) => {
                let flow = if exam.is_finished() {
                    Flow::Summary
                } else {
                    Flow::Exam
                };
                (exam, flow)
            }
            ResumeDecision::StartNew => {
                self.say(&render_config(&map_config(bank, &config.categories)))
                    .await?;
                let exam = self
                    .exam_loop
                    .start_exam(bank, config, rng)
                    .await
                    .context("start exam")?;
                (exam, Flow::Exam)
            }
        };

        loop {
            flow = match flow {
                Flow::Exam => self.exam_screen(&mut exam).await?,
                Flow::Summary => self.summary_screen(&mut exam).await?,
                Flow::Quit => return Ok(()),
            };
        }
    }

    async fn offer_resume(&mut self, filename: &str) -> Result<ResumeDecision> {
        let Some(offer) = self.exam_loop.resume_offer(filename).await else {
            return Ok(ResumeDecision::StartNew);
        };
        self.say(&render_resume_prompt(&ResumePromptVm::from(&offer)))
            .await?;

        loop {
            let Some(line) = self.prompt("> ").await? else {
                return Ok(ResumeDecision::Quit);
            };
            match parse_resume_choice(&line) {
                Some(ResumeChoice::Continue) => {
                    let decision = match self.exam_loop.resume(filename).await {
                        Some(exam) => ResumeDecision::Resume(exam),
                        None => ResumeDecision::StartNew,
                    };
                    return Ok(decision);
                }
                Some(ResumeChoice::Restart) => return Ok(ResumeDecision::StartNew),
                None => self.say("Type c to continue or r to start a new exam.").await?,
            }
        }
    }

    async fn exam_screen(&mut self, exam: &mut ActiveExam) -> Result<Flow> {
        self.say(&render_exam_screen(&map_exam_screen(exam))).await?;

        loop {
            let Some(line) = self.prompt("> ").await? else {
                return Ok(Flow::Quit);
            };
            let command = match parse_exam_command(&line) {
                Ok(Some(command)) => command,
                Ok(None) => continue,
                Err(err) => {
                    self.say(&format!("{err} (type h for help)")).await?;
                    continue;
                }
            };

            let redraw = match command {
                ExamCommand::Answer(letters) => {
                    match self.exam_loop.submit_answer(exam, &letters).await {
                        Ok(outcome) => {
                            if outcome.is_finished {
                                self.say("All questions answered. Type finish for the summary.")
                                    .await?;
                            }
                            true
                        }
                        Err(err) => {
                            self.say(&err.to_string()).await?;
                            false
                        }
                    }
                }
                ExamCommand::Next => {
                    let moved = self.exam_loop.next_question(exam).await;
                    self.moved(moved, "This is the last question.").await?
                }
                ExamCommand::Prev => {
                    let moved = self.exam_loop.prev_question(exam).await;
                    self.moved(moved, "This is the first question.").await?
                }
                ExamCommand::GoTo(position) => {
                    let moved = self
                        .exam_loop
                        .go_to_question(exam, position.saturating_sub(1))
                        .await;
                    self.moved(moved, "No question with that number.").await?
                }
                ExamCommand::Mark => {
                    if let Some(marked) = self.exam_loop.toggle_mark_current(exam).await {
                        let note = if marked { "Marked for review." } else { "Mark removed." };
                        self.say(note).await?;
                    }
                    true
                }
                ExamCommand::Finish => return Ok(Flow::Summary),
                ExamCommand::Help => {
                    self.say(EXAM_HELP).await?;
                    false
                }
                ExamCommand::Quit => {
                    let saved = self.exam_loop.resume_offer(exam.filename()).await.is_some();
                    let note = if saved {
                        "Progress saved."
                    } else {
                        "Nothing to save yet."
                    };
                    self.say(note).await?;
                    return Ok(Flow::Quit);
                }
            };

            if redraw {
                self.say(&render_exam_screen(&map_exam_screen(exam))).await?;
            }
        }
    }

    async fn moved(&mut self, moved: bool, refusal: &str) -> Result<bool> {
        if !moved {
            self.say(refusal).await?;
        }
        Ok(moved)
    }

    async fn summary_screen(&mut self, exam: &mut ActiveExam) -> Result<Flow> {
        let mut reviewing: Option<usize> = None;
        self.say(&render_summary(&map_summary(exam, reviewing))).await?;

        loop {
            let Some(line) = self.prompt("summary> ").await? else {
                return Ok(Flow::Quit);
            };
            let Some(command) = parse_summary_command(&line) else {
                if !line.trim().is_empty() {
                    self.say("Unknown command (type h for help)").await?;
                }
                continue;
            };

            match command {
                SummaryCommand::Review(position) => {
                    let detail = usize::try_from(position.saturating_sub(1))
                        .ok()
                        .and_then(|index| map_review_detail(exam, index));
                    match detail {
                        Some(detail) => {
                            reviewing = Some(detail.index);
                            self.say(&render_summary(&map_summary(exam, reviewing)))
                                .await?;
                            self.say("").await?;
                            self.say(&render_review_detail(&detail)).await?;
                        }
                        None => self.say("No question with that number.").await?,
                    }
                }
                SummaryCommand::Mark => {
                    let number = reviewing
                        .and_then(|index| exam.session().questions().get(index))
                        .map(|question| question.number().clone());
                    let Some(number) = number else {
                        self.say("Open a question first (type its number).").await?;
                        continue;
                    };
                    if let Some(marked) = self.exam_loop.toggle_mark(exam, &number).await {
                        let note = if marked { "Marked for review." } else { "Mark removed." };
                        self.say(note).await?;
                    }
                }
                SummaryCommand::Back => return Ok(Flow::Exam),
                SummaryCommand::Help => self.say(SUMMARY_HELP).await?,
                SummaryCommand::Quit => return Ok(Flow::Quit),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use exam_core::Clock;
    use exam_core::time::fixed_now;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use services::ProgressService;
    use services::exam::PROGRESS_SLOT_KEY;
    use storage::repository::{InMemoryRepository, SnapshotSlotRepository};

    const BANK: &str = r#"[
        {"question_number": 1, "question_text": "Two plus two?",
         "options": [{"letter": "a", "text": "4"}, {"letter": "b", "text": "5"}],
         "correct_answers": ["a"], "category": "Math"},
        {"question_number": 2, "question_text": "Pick the primes",
         "options": [{"letter": "a", "text": "2"}, {"letter": "b", "text": "4"}, {"letter": "c", "text": "5"}],
         "correct_answers": ["a", "c"], "category": "Math"}
    ]"#;

    fn exam_loop(repo: Arc<dyn SnapshotSlotRepository>) -> ExamLoopService {
        ExamLoopService::new(ProgressService::new(Clock::fixed(fixed_now()), repo))
    }

    async fn session(repo: Arc<dyn SnapshotSlotRepository>, script: &str, restart: bool) -> String {
        let bank = QuestionBank::from_json("bank.json", BANK).unwrap();
        let config = ExamConfig::all_questions(&bank);
        let mut terminal = Terminal::new(script.as_bytes(), Vec::new(), exam_loop(repo));
        let mut rng = StdRng::seed_from_u64(1);
        terminal
            .run(&bank, &config, restart, &mut rng)
            .await
            .unwrap();
        String::from_utf8(terminal.into_output()).unwrap()
    }

    #[tokio::test]
    async fn answers_and_reaches_summary() {
        let repo: Arc<dyn SnapshotSlotRepository> = Arc::new(InMemoryRepository::new());
        let transcript = session(repo, "a\nn\nb\na,c\nfinish\n2\nm\nq\n", true).await;

        assert!(transcript.contains("Question 1 of 2"));
        assert!(transcript.contains("✓ Correct!"));
        assert!(transcript.contains("Please select exactly 2 answers. You selected 1."));
        assert!(transcript.contains("All questions answered."));
        assert!(transcript.contains("✓ PASSED!"));
        assert!(transcript.contains("Score: 100% (70% required to pass)"));
        assert!(transcript.contains("Question 2\n"));
        assert!(transcript.contains("Marked for review."));
    }

    #[tokio::test]
    async fn navigation_refusals_are_reported() {
        let repo: Arc<dyn SnapshotSlotRepository> = Arc::new(InMemoryRepository::new());
        let transcript = session(repo, "p\ng 0\ng 3\nzz\nq\n", true).await;

        assert!(transcript.contains("This is the first question."));
        assert_eq!(transcript.matches("No question with that number.").count(), 2);
        assert!(transcript.contains("invalid option letter"));
        assert!(transcript.contains("Nothing to save yet."));
        assert!(!transcript.contains("Progress saved."));
    }

    #[tokio::test]
    async fn quitting_and_resuming_keeps_progress() {
        let repo: Arc<dyn SnapshotSlotRepository> = Arc::new(InMemoryRepository::new());
        session(repo.clone(), "a\nn\nm\nq\n", true).await;

        let transcript = session(repo, "c\nq\n", false).await;
        assert!(transcript.contains("Resume Previous Session?"));
        assert!(transcript.contains("Progress: 1/2 answered (50%)"));
        assert!(transcript.contains("Question 2 of 2"));
        assert!(transcript.contains("Select 2 answers *"));
    }

    #[tokio::test]
    async fn finished_exam_resumes_into_summary() {
        let repo: Arc<dyn SnapshotSlotRepository> = Arc::new(InMemoryRepository::new());
        session(repo.clone(), "b\nn\na,c\nq\n", true).await;

        let transcript = session(repo, "c\nq\n", false).await;
        assert!(transcript.contains("[c] View Summary"));
        assert!(transcript.contains("Score: 50% (70% required to pass)"));
        assert!(transcript.contains("DID NOT PASS"));
    }

    #[tokio::test]
    async fn restart_choice_starts_fresh() {
        let repo: Arc<dyn SnapshotSlotRepository> = Arc::new(InMemoryRepository::new());
        session(repo.clone(), "a\nq\n", true).await;

        let transcript = session(repo.clone(), "r\nq\n", false).await;
        assert!(transcript.contains("Progress: 0/2 questions answered (0%)"));
        assert!(exam_loop(repo).resume_offer("bank.json").await.is_none());
    }

    #[tokio::test]
    async fn quit_after_answering_reports_saved_progress() {
        let repo: Arc<dyn SnapshotSlotRepository> = Arc::new(InMemoryRepository::new());
        let transcript = session(repo, "a\nq\n", true).await;
        assert!(transcript.contains("Progress saved."));
    }

    #[tokio::test]
    async fn closed_input_at_resume_prompt_keeps_progress() {
        let repo: Arc<dyn SnapshotSlotRepository> = Arc::new(InMemoryRepository::new());
        session(repo.clone(), "a\nq\n", true).await;

        let transcript = session(repo.clone(), "", false).await;
        assert!(transcript.contains("Resume Previous Session?"));
        assert!(!transcript.contains("Question 1 of 2"));

        let slot = repo.read_slot(PROGRESS_SLOT_KEY).await.unwrap();
        assert!(slot.is_some());
        let offer = exam_loop(repo).resume_offer("bank.json").await.unwrap();
        assert_eq!(offer.answered, 1);
    }
}
