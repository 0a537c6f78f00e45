use exam_core::model::{OptionLetter, ParseLetterError, Question};

use crate::error::AnswerInputError;

/// Parse a typed selection such as `"b"`, `"a,c"` or `"A C"` into letters.
///
/// Commas and whitespace separate letters and may be omitted (`"ac"`).
/// Repeated letters collapse, keeping the first occurrence, the same way a
/// checkbox can only be ticked once.
///
/// # Errors
///
/// Returns `AnswerInputError::InvalidLetter` for any character outside `a`..`f`.
pub fn parse_letters(input: &str) -> Result<Vec<OptionLetter>, AnswerInputError> {
    let mut letters = Vec::new();
    for ch in input.chars().filter(|ch| !ch.is_whitespace() && *ch != ',') {
        let letter = OptionLetter::from_char(ch).ok_or_else(|| ParseLetterError {
            raw: ch.to_string(),
        })?;
        if !letters.contains(&letter) {
            letters.push(letter);
        }
    }
    Ok(letters)
}

/// Check that a selection is acceptable for `question` before it is scored.
///
/// A select-many question needs exactly as many letters as it has correct
/// answers; a single-answer question needs exactly one.
///
/// # Errors
///
/// Returns the matching `AnswerInputError`; the session is left untouched.
pub fn validate_selection(
    question: &Question,
    letters: &[OptionLetter],
) -> Result<(), AnswerInputError> {
    if letters.is_empty() {
        return Err(AnswerInputError::Empty);
    }
    if let Some(unknown) = letters.iter().find(|l| !question.has_option(**l)) {
        return Err(AnswerInputError::UnknownOption(*unknown));
    }

    let expected = question.correct_answers().len();
    if expected > 1 && letters.len() != expected {
        return Err(AnswerInputError::WrongCount {
            expected,
            selected: letters.len(),
        });
    }
    if expected == 1 && letters.len() > 1 {
        return Err(AnswerInputError::SingleAnswerOnly);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use exam_core::model::QuestionDraft;

    use OptionLetter::{A, B, C};

    fn question(correct: &[&str]) -> Question {
        let mut draft = QuestionDraft::new(1, "Q")
            .with_option("a", "x")
            .with_option("b", "y")
            .with_option("c", "z");
        for letter in correct {
            draft = draft.with_correct(letter);
        }
        draft.validate().unwrap()
    }

    #[test]
    fn parses_common_spellings() {
        assert_eq!(parse_letters("b").unwrap(), vec![B]);
        assert_eq!(parse_letters("a,c").unwrap(), vec![A, C]);
        assert_eq!(parse_letters(" C  a ").unwrap(), vec![C, A]);
        assert_eq!(parse_letters("ac").unwrap(), vec![A, C]);
        assert_eq!(parse_letters("aa").unwrap(), vec![A]);
        assert!(parse_letters("").unwrap().is_empty());
    }

    #[test]
    fn rejects_unknown_characters() {
        assert!(matches!(
            parse_letters("a,z"),
            Err(AnswerInputError::InvalidLetter(_))
        ));
    }

    #[test]
    fn empty_selection_is_rejected() {
        assert_eq!(
            validate_selection(&question(&["a"]), &[]),
            Err(AnswerInputError::Empty)
        );
    }

    #[test]
    fn multi_select_requires_exact_count() {
        let q = question(&["a", "b"]);
        assert_eq!(
            validate_selection(&q, &[A]),
            Err(AnswerInputError::WrongCount {
                expected: 2,
                selected: 1
            })
        );
        assert!(validate_selection(&q, &[A, C]).is_ok());
    }

    #[test]
    fn single_answer_accepts_one_letter() {
        let q = question(&["b"]);
        assert_eq!(
            validate_selection(&q, &[A, B]),
            Err(AnswerInputError::SingleAnswerOnly)
        );
        assert!(validate_selection(&q, &[C]).is_ok());
    }

    #[test]
    fn letters_must_exist_on_question() {
        let q = question(&["a"]);
        assert_eq!(
            validate_selection(&q, &[OptionLetter::E]),
            Err(AnswerInputError::UnknownOption(OptionLetter::E))
        );
    }
}
