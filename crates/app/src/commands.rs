use exam_core::model::OptionLetter;
use services::{AnswerInputError, parse_letters};

/// Input accepted while answering questions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExamCommand {
    Answer(Vec<OptionLetter>),
    Next,
    Prev,
    /// One-based question position as typed; may be out of range.
    GoTo(i64),
    Mark,
    Finish,
    Help,
    Quit,
}

/// Input accepted on the summary screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryCommand {
    /// One-based question position as typed.
    Review(i64),
    Mark,
    Back,
    Help,
    Quit,
}

/// Answer on the resume prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeChoice {
    Continue,
    Restart,
}

pub const EXAM_HELP: &str = "\
Commands:
  a, b, ac, a,c  submit an answer
  n or ]         next question
  p or [         previous question
  g N            go to question N
  m              mark or unmark for review
  finish         show the summary
  q              quit (progress is saved)";

pub const SUMMARY_HELP: &str = "\
Commands:
  N              review question N
  m              mark or unmark the reviewed question
  back           return to the questions
  q              quit";

fn parse_position(raw: &str) -> Option<i64> {
    raw.trim().parse().ok()
}

/// # Errors
///
/// Returns the `AnswerInputError` for text that is neither a command nor a
/// list of option letters.
pub fn parse_exam_command(line: &str) -> Result<Option<ExamCommand>, AnswerInputError> {
    let line = line.trim().to_ascii_lowercase();
    if line.is_empty() {
        return Ok(None);
    }
    let command = match line.as_str() {
        "n" | "next" | "]" => ExamCommand::Next,
        "p" | "prev" | "[" => ExamCommand::Prev,
        "m" | "mark" => ExamCommand::Mark,
        "finish" | "done" => ExamCommand::Finish,
        "h" | "help" | "?" => ExamCommand::Help,
        "q" | "quit" | "exit" => ExamCommand::Quit,
        other => {
            let jump = other
                .strip_prefix("goto ")
                .or_else(|| other.strip_prefix("g "))
                .and_then(parse_position);
            match jump {
                Some(position) => ExamCommand::GoTo(position),
                None => ExamCommand::Answer(parse_letters(other)?),
            }
        }
    };
    Ok(Some(command))
}

#[must_use]
pub fn parse_summary_command(line: &str) -> Option<SummaryCommand> {
    let line = line.trim().to_ascii_lowercase();
    match line.as_str() {
        "m" | "mark" => Some(SummaryCommand::Mark),
        "b" | "back" => Some(SummaryCommand::Back),
        "h" | "help" | "?" => Some(SummaryCommand::Help),
        "q" | "quit" | "exit" => Some(SummaryCommand::Quit),
        other => other
            .strip_prefix("r ")
            .unwrap_or(other)
            .trim()
            .parse()
            .ok()
            .map(SummaryCommand::Review),
    }
}

#[must_use]
pub fn parse_resume_choice(line: &str) -> Option<ResumeChoice> {
    match line.trim().to_ascii_lowercase().as_str() {
        "c" | "continue" | "resume" | "y" | "yes" => Some(ResumeChoice::Continue),
        "r" | "restart" | "new" | "n" | "no" => Some(ResumeChoice::Restart),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use OptionLetter::{A, B, C, F};

    #[test]
    fn navigation_words_and_brackets() {
        assert_eq!(parse_exam_command("n"), Ok(Some(ExamCommand::Next)));
        assert_eq!(parse_exam_command("]"), Ok(Some(ExamCommand::Next)));
        assert_eq!(parse_exam_command(" PREV "), Ok(Some(ExamCommand::Prev)));
        assert_eq!(parse_exam_command("["), Ok(Some(ExamCommand::Prev)));
        assert_eq!(parse_exam_command("g 3"), Ok(Some(ExamCommand::GoTo(3))));
        assert_eq!(parse_exam_command("goto -1"), Ok(Some(ExamCommand::GoTo(-1))));
    }

    #[test]
    fn letters_are_answers() {
        assert_eq!(parse_exam_command("b"), Ok(Some(ExamCommand::Answer(vec![B]))));
        assert_eq!(
            parse_exam_command("a, c"),
            Ok(Some(ExamCommand::Answer(vec![A, C])))
        );
        assert_eq!(parse_exam_command("f"), Ok(Some(ExamCommand::Answer(vec![F]))));
        assert_eq!(parse_exam_command("finish"), Ok(Some(ExamCommand::Finish)));
    }

    #[test]
    fn blank_and_garbage_input() {
        assert_eq!(parse_exam_command("   "), Ok(None));
        assert!(matches!(
            parse_exam_command("xyz"),
            Err(AnswerInputError::InvalidLetter(_))
        ));
    }

    #[test]
    fn summary_commands() {
        assert_eq!(parse_summary_command("4"), Some(SummaryCommand::Review(4)));
        assert_eq!(parse_summary_command("r 2"), Some(SummaryCommand::Review(2)));
        assert_eq!(parse_summary_command("m"), Some(SummaryCommand::Mark));
        assert_eq!(parse_summary_command("back"), Some(SummaryCommand::Back));
        assert_eq!(parse_summary_command("what"), None);
    }

    #[test]
    fn resume_choices() {
        assert_eq!(parse_resume_choice("C"), Some(ResumeChoice::Continue));
        assert_eq!(parse_resume_choice("restart"), Some(ResumeChoice::Restart));
        assert_eq!(parse_resume_choice(""), None);
    }
}
