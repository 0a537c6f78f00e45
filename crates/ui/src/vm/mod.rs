mod config_vm;
mod exam_vm;
mod resume_vm;
mod summary_vm;
mod time_fmt;

pub use config_vm::{CategoryOptionVm, ConfigVm, map_config};
pub use exam_vm::{
    DotStatus, ExamQuestionVm, ExamScreenVm, FeedbackVm, OptionState, OptionVm, ProgressVm,
    QuestionDotVm, join_letters, map_exam_screen, map_feedback, map_options, map_progress,
    map_question_grid, mark_label,
};
pub use resume_vm::ResumePromptVm;
pub use summary_vm::{ReviewDetailVm, SummaryVm, map_review_detail, map_summary};
pub use time_fmt::format_datetime;
