use exam_core::model::ExamSession;

/// An exam in progress together with the host metadata saved alongside it.
///
/// Views borrow this read-only; all mutation goes through `ExamLoopService`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveExam {
    session: ExamSession,
    filename: String,
    selected_categories: Vec<String>,
    shuffle_options: bool,
}

impl ActiveExam {
    #[must_use]
    pub fn new(
        session: ExamSession,
        filename: impl Into<String>,
        selected_categories: Vec<String>,
        shuffle_options: bool,
    ) -> Self {
        Self {
            session,
            filename: filename.into(),
            selected_categories,
            shuffle_options,
        }
    }

    #[must_use]
    pub fn session(&self) -> &ExamSession {
        &self.session
    }

    /// Name of the question file this exam was built from.
    #[must_use]
    pub fn filename(&self) -> &str {
        &self.filename
    }

    #[must_use]
    pub fn selected_categories(&self) -> &[String] {
        &self.selected_categories
    }

    #[must_use]
    pub fn shuffle_options(&self) -> bool {
        self.shuffle_options
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.session.is_finished()
    }

    pub(crate) fn session_mut(&mut self) -> &mut ExamSession {
        &mut self.session
    }
}
