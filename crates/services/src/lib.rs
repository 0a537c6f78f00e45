#![forbid(unsafe_code)]

pub mod answer_input;
pub mod error;
pub mod exam;
pub mod question_bank;

pub use exam_core::Clock;

pub use answer_input::{parse_letters, validate_selection};
pub use error::{AnswerInputError, ExamConfigError, ExamError, QuestionFileError, SnapshotError};
pub use exam::{
    ActiveExam, AnswerOutcome, ExamConfig, ExamLoopService, ExamPlan, ExamPlanBuilder,
    ExamSnapshot, ProgressService, ResumeOffer, SavedProgress,
};
pub use question_bank::{CategoryCount, QuestionBank};
