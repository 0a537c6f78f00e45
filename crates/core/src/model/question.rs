use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;
use url::Url;

use crate::model::ids::QuestionNumber;
use crate::model::letter::{MAX_OPTIONS, OptionLetter};
use crate::shuffle::fisher_yates;

/// Category used for questions that do not declare one.
pub const UNCATEGORIZED: &str = "Uncategorized";

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error("question text cannot be empty")]
    EmptyText,

    #[error("question has {count} options, at most {MAX_OPTIONS} are supported")]
    TooManyOptions { count: usize },

    #[error("invalid option letter {0:?}")]
    InvalidLetter(String),

    #[error("option letter `{0}` is used more than once")]
    DuplicateOption(OptionLetter),

    #[error("at least one correct answer is required")]
    NoCorrectAnswers,

    #[error("correct answer `{0}` does not match any option")]
    UnknownCorrectAnswer(OptionLetter),

    #[error("invalid reference URL {0:?}")]
    InvalidReference(String),
}

//
// ─── DRAFTS ────────────────────────────────────────────────────────────────────
//

/// Unvalidated option as it appears in a question file.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AnswerOptionDraft {
    #[serde(default)]
    pub letter: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_letter: Option<String>,
}

/// Unvalidated question as it appears in a question file or snapshot.
///
/// Required fields are optional here so validation can name the one that is
/// missing instead of failing on the first serde mismatch.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QuestionDraft {
    #[serde(default)]
    pub question_number: Option<QuestionNumber>,
    #[serde(default)]
    pub question_text: Option<String>,
    #[serde(default)]
    pub options: Option<Vec<AnswerOptionDraft>>,
    #[serde(default)]
    pub correct_answers: Option<Vec<String>>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub explanation: Option<String>,
    #[serde(default)]
    pub references: Vec<String>,
}

impl QuestionDraft {
    #[must_use]
    pub fn new(number: impl Into<QuestionNumber>, text: impl Into<String>) -> Self {
        Self {
            question_number: Some(number.into()),
            question_text: Some(text.into()),
            options: Some(Vec::new()),
            correct_answers: Some(Vec::new()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_option(mut self, letter: &str, text: impl Into<String>) -> Self {
        self.options.get_or_insert_with(Vec::new).push(AnswerOptionDraft {
            letter: Some(letter.to_owned()),
            text: Some(text.into()),
            original_letter: None,
        });
        self
    }

    #[must_use]
    pub fn with_correct(mut self, letter: &str) -> Self {
        self.correct_answers
            .get_or_insert_with(Vec::new)
            .push(letter.to_owned());
        self
    }

    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    #[must_use]
    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = Some(explanation.into());
        self
    }

    #[must_use]
    pub fn with_reference(mut self, url: impl Into<String>) -> Self {
        self.references.push(url.into());
        self
    }

    /// Validate the draft into an immutable `Question`.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` naming the first structural problem found.
    pub fn validate(self) -> Result<Question, QuestionError> {
        let number = self
            .question_number
            .filter(|n| !n.is_empty())
            .ok_or(QuestionError::MissingField("question_number"))?;
        let text = self
            .question_text
            .ok_or(QuestionError::MissingField("question_text"))?;
        if text.trim().is_empty() {
            return Err(QuestionError::EmptyText);
        }
        let raw_options = self
            .options
            .ok_or(QuestionError::MissingField("options"))?;
        let raw_correct = self
            .correct_answers
            .ok_or(QuestionError::MissingField("correct_answers"))?;

        if raw_options.len() > MAX_OPTIONS {
            return Err(QuestionError::TooManyOptions {
                count: raw_options.len(),
            });
        }

        let mut options = Vec::with_capacity(raw_options.len());
        let mut seen = BTreeSet::new();
        for raw in raw_options {
            let letter = raw
                .letter
                .as_deref()
                .ok_or(QuestionError::MissingField("options[].letter"))
                .and_then(parse_letter)?;
            if !seen.insert(letter) {
                return Err(QuestionError::DuplicateOption(letter));
            }
            let text = raw
                .text
                .ok_or(QuestionError::MissingField("options[].text"))?;
            let original_letter = raw
                .original_letter
                .as_deref()
                .map(parse_letter)
                .transpose()?;
            options.push(AnswerOption {
                letter,
                text,
                original_letter,
            });
        }

        let mut correct = BTreeSet::new();
        for raw in &raw_correct {
            let letter = parse_letter(raw)?;
            if !seen.contains(&letter) {
                return Err(QuestionError::UnknownCorrectAnswer(letter));
            }
            correct.insert(letter);
        }
        if correct.is_empty() {
            return Err(QuestionError::NoCorrectAnswers);
        }

        for reference in &self.references {
            Url::parse(reference).map_err(|_| QuestionError::InvalidReference(reference.clone()))?;
        }

        Ok(Question {
            number,
            text,
            category: self.category.filter(|c| !c.trim().is_empty()),
            options,
            correct_answers: correct.into_iter().collect(),
            explanation: self.explanation.filter(|e| !e.trim().is_empty()),
            references: self.references,
        })
    }
}

fn parse_letter(raw: &str) -> Result<OptionLetter, QuestionError> {
    raw.parse()
        .map_err(|_| QuestionError::InvalidLetter(raw.to_owned()))
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// One answer option of a question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOption {
    letter: OptionLetter,
    text: String,
    original_letter: Option<OptionLetter>,
}

impl AnswerOption {
    #[must_use]
    pub fn letter(&self) -> OptionLetter {
        self.letter
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Letter the option carried in the source file, set once options were shuffled.
    #[must_use]
    pub fn original_letter(&self) -> Option<OptionLetter> {
        self.original_letter
    }
}

/// A validated multiple-choice question.
///
/// `correct_answers` is always non-empty, sorted and a subset of the option
/// letters.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "QuestionDraft")]
pub struct Question {
    number: QuestionNumber,
    text: String,
    category: Option<String>,
    options: Vec<AnswerOption>,
    correct_answers: Vec<OptionLetter>,
    explanation: Option<String>,
    references: Vec<String>,
}

impl TryFrom<QuestionDraft> for Question {
    type Error = QuestionError;

    fn try_from(draft: QuestionDraft) -> Result<Self, Self::Error> {
        draft.validate()
    }
}

impl Question {
    #[must_use]
    pub fn number(&self) -> &QuestionNumber {
        &self.number
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Declared category, if any.
    #[must_use]
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// Declared category, or `UNCATEGORIZED` when absent.
    #[must_use]
    pub fn category_or_default(&self) -> &str {
        self.category.as_deref().unwrap_or(UNCATEGORIZED)
    }

    #[must_use]
    pub fn options(&self) -> &[AnswerOption] {
        &self.options
    }

    #[must_use]
    pub fn option(&self, letter: OptionLetter) -> Option<&AnswerOption> {
        self.options.iter().find(|opt| opt.letter == letter)
    }

    #[must_use]
    pub fn has_option(&self, letter: OptionLetter) -> bool {
        self.option(letter).is_some()
    }

    #[must_use]
    pub fn correct_answers(&self) -> &[OptionLetter] {
        &self.correct_answers
    }

    #[must_use]
    pub fn is_correct_letter(&self, letter: OptionLetter) -> bool {
        self.correct_answers.contains(&letter)
    }

    /// A select-many question expects more than one letter.
    #[must_use]
    pub fn is_multi_select(&self) -> bool {
        self.correct_answers.len() > 1
    }

    #[must_use]
    pub fn explanation(&self) -> Option<&str> {
        self.explanation.as_deref()
    }

    #[must_use]
    pub fn references(&self) -> &[String] {
        &self.references
    }

    /// Set-equality check of a submission against the correct answers.
    ///
    /// Order and duplicates in `submitted` are irrelevant.
    #[must_use]
    pub fn is_correct_submission(&self, submitted: &[OptionLetter]) -> bool {
        let submitted: BTreeSet<OptionLetter> = submitted.iter().copied().collect();
        let expected: BTreeSet<OptionLetter> = self.correct_answers.iter().copied().collect();
        submitted == expected
    }

    /// Randomize option order and relabel options positionally.
    ///
    /// The correct-answer set is rewritten through the old→new letter mapping
    /// and re-sorted, so it keeps pointing at the same option texts.
    /// Questions with fewer than two options are left as they are.
    pub fn shuffle_options<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        if self.options.len() < 2 {
            return;
        }

        for opt in &mut self.options {
            opt.original_letter.get_or_insert(opt.letter);
        }
        fisher_yates(&mut self.options, rng);

        let mut remap = BTreeMap::new();
        for (idx, opt) in self.options.iter_mut().enumerate() {
            // Validation caps options at the alphabet length, so every index has a letter.
            if let Some(new_letter) = OptionLetter::from_index(idx) {
                remap.insert(opt.letter, new_letter);
                opt.letter = new_letter;
            }
        }

        let mut correct: Vec<OptionLetter> = self
            .correct_answers
            .iter()
            .map(|old| remap.get(old).copied().unwrap_or(*old))
            .collect();
        correct.sort_unstable();
        correct.dedup();
        self.correct_answers = correct;
    }
}

//
// ─── SERIALIZATION ─────────────────────────────────────────────────────────────
//

impl From<&Question> for QuestionDraft {
    fn from(question: &Question) -> Self {
        Self {
            question_number: Some(question.number.clone()),
            question_text: Some(question.text.clone()),
            options: Some(
                question
                    .options
                    .iter()
                    .map(|opt| AnswerOptionDraft {
                        letter: Some(opt.letter.to_string()),
                        text: Some(opt.text.clone()),
                        original_letter: opt.original_letter.map(|l| l.to_string()),
                    })
                    .collect(),
            ),
            correct_answers: Some(
                question
                    .correct_answers
                    .iter()
                    .map(ToString::to_string)
                    .collect(),
            ),
            category: question.category.clone(),
            explanation: question.explanation.clone(),
            references: question.references.clone(),
        }
    }
}

impl Serialize for Question {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        QuestionDraft::from(self).serialize(serializer)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn four_option_question() -> QuestionDraft {
        QuestionDraft::new(1, "Which are prime?")
            .with_option("a", "2")
            .with_option("b", "4")
            .with_option("c", "5")
            .with_option("d", "9")
            .with_correct("c")
            .with_correct("a")
    }

    fn correct_texts(question: &Question) -> BTreeSet<String> {
        question
            .correct_answers()
            .iter()
            .filter_map(|l| question.option(*l))
            .map(|opt| opt.text().to_owned())
            .collect()
    }

    #[test]
    fn validate_sorts_correct_answers() {
        let question = four_option_question().validate().unwrap();
        assert_eq!(
            question.correct_answers(),
            &[OptionLetter::A, OptionLetter::C]
        );
        assert!(question.is_multi_select());
        assert_eq!(question.category_or_default(), UNCATEGORIZED);
    }

    #[test]
    fn validate_reports_missing_fields() {
        let mut draft = four_option_question();
        draft.question_text = None;
        assert_eq!(
            draft.validate().unwrap_err(),
            QuestionError::MissingField("question_text")
        );

        let mut draft = four_option_question();
        draft.correct_answers = None;
        assert_eq!(
            draft.validate().unwrap_err(),
            QuestionError::MissingField("correct_answers")
        );
    }

    #[test]
    fn validate_rejects_unknown_correct_letter() {
        let draft = QuestionDraft::new(1, "Q")
            .with_option("a", "x")
            .with_correct("b");
        assert_eq!(
            draft.validate().unwrap_err(),
            QuestionError::UnknownCorrectAnswer(OptionLetter::B)
        );
    }

    #[test]
    fn validate_rejects_empty_correct_set() {
        let draft = QuestionDraft::new(1, "Q").with_option("a", "x");
        assert_eq!(draft.validate().unwrap_err(), QuestionError::NoCorrectAnswers);
    }

    #[test]
    fn validate_rejects_seventh_option() {
        let mut draft = QuestionDraft::new(1, "Q");
        for letter in ["a", "b", "c", "d", "e", "f", "a"] {
            draft = draft.with_option(letter, "x");
        }
        assert_eq!(
            draft.with_correct("a").validate().unwrap_err(),
            QuestionError::TooManyOptions { count: 7 }
        );
    }

    #[test]
    fn validate_rejects_bad_reference() {
        let draft = four_option_question().with_reference("not a url");
        assert!(matches!(
            draft.validate().unwrap_err(),
            QuestionError::InvalidReference(_)
        ));
    }

    #[test]
    fn submission_uses_set_semantics() {
        let question = QuestionDraft::new(1, "Q")
            .with_option("a", "x")
            .with_option("b", "y")
            .with_option("c", "z")
            .with_correct("a")
            .with_correct("b")
            .validate()
            .unwrap();

        assert!(question.is_correct_submission(&[OptionLetter::B, OptionLetter::A]));
        assert!(question.is_correct_submission(&[
            OptionLetter::A,
            OptionLetter::B,
            OptionLetter::A
        ]));
        assert!(!question.is_correct_submission(&[OptionLetter::A, OptionLetter::A]));
        assert!(!question.is_correct_submission(&[]));
    }

    #[test]
    fn option_shuffle_preserves_correct_texts() {
        for seed in 0..32 {
            let mut question = four_option_question().validate().unwrap();
            let before = correct_texts(&question);
            question.shuffle_options(&mut StdRng::seed_from_u64(seed));

            assert_eq!(correct_texts(&question), before, "seed {seed}");
            let letters: Vec<_> = question.options().iter().map(AnswerOption::letter).collect();
            assert_eq!(letters, crate::model::ALPHABET[..4].to_vec());
            let mut sorted = question.correct_answers().to_vec();
            sorted.sort_unstable();
            assert_eq!(question.correct_answers(), sorted.as_slice());
            assert!(question.options().iter().all(|o| o.original_letter().is_some()));
        }
    }

    #[test]
    fn single_option_question_is_not_shuffled() {
        let mut question = QuestionDraft::new(1, "Q")
            .with_option("a", "only")
            .with_correct("a")
            .validate()
            .unwrap();
        question.shuffle_options(&mut StdRng::seed_from_u64(1));
        assert_eq!(question.options()[0].original_letter(), None);
    }

    #[test]
    fn serde_round_trip_keeps_original_letters() {
        let mut question = four_option_question()
            .with_category("Math")
            .with_explanation("2 and 5 are prime.")
            .with_reference("https://example.com/primes")
            .validate()
            .unwrap();
        question.shuffle_options(&mut StdRng::seed_from_u64(3));

        let json = serde_json::to_string(&question).unwrap();
        let back: Question = serde_json::from_str(&json).unwrap();
        assert_eq!(back, question);
    }

    #[test]
    fn deserialize_runs_validation() {
        let err = serde_json::from_str::<Question>(
            r#"{"question_number": 1, "question_text": "Q", "options": [], "correct_answers": ["a"]}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("does not match any option"));
    }
}
