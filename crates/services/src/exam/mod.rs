mod active;
mod plan;
mod progress;
mod snapshot;
mod workflow;

// Public API of the exam subsystem.
pub use active::ActiveExam;
pub use plan::{ExamConfig, ExamPlan, ExamPlanBuilder};
pub use progress::{ProgressService, SavedProgress};
pub use snapshot::{ExamSnapshot, PROGRESS_SLOT_KEY, SNAPSHOT_VERSION, SnapshotConfig};
pub use workflow::{AnswerOutcome, ExamLoopService, ResumeOffer};
