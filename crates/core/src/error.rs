use thiserror::Error;

use crate::model::{ParseLetterError, QuestionError, RestoreError};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Letter(#[from] ParseLetterError),
    #[error(transparent)]
    Restore(#[from] RestoreError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::OptionLetter;

    #[test]
    fn wraps_layer_errors_transparently() {
        let err: Error = "z".parse::<OptionLetter>().unwrap_err().into();
        assert!(matches!(err, Error::Letter(_)));
        assert!(err.to_string().contains("invalid option letter"));

        let err: Error = QuestionError::NoCorrectAnswers.into();
        assert_eq!(err.to_string(), QuestionError::NoCorrectAnswers.to_string());
    }
}
