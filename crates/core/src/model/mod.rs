mod ids;
mod letter;
mod question;
mod session;
mod summary;

pub use ids::QuestionNumber;
pub use letter::{ALPHABET, MAX_OPTIONS, OptionLetter, ParseLetterError};
pub use question::{
    AnswerOption, AnswerOptionDraft, Question, QuestionDraft, QuestionError, UNCATEGORIZED,
};
pub use session::{ExamProgress, ExamSession, RestoreError, SessionParts};
pub use summary::{ExamSummary, PASS_THRESHOLD, percentage_of};
