use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Stable identifier of a question within a question set.
///
/// Question files carry `question_number` either as a JSON number or as a
/// string. Both forms collapse into the same canonical text (`7` and `"7"`
/// are the same question), which is what answers, results and marks are
/// keyed by.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QuestionNumber(String);

impl QuestionNumber {
    /// Creates a `QuestionNumber` from its canonical text.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into().trim().to_owned())
    }

    /// Returns the canonical text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the identifier carries no text at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<u64> for QuestionNumber {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl From<&str> for QuestionNumber {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl fmt::Debug for QuestionNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "QuestionNumber({})", self.0)
    }
}

impl fmt::Display for QuestionNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for QuestionNumber {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

// ─── Serde ─────────────────────────────────────────────────────────────────────

impl Serialize for QuestionNumber {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawQuestionNumber {
    Text(String),
    Unsigned(u64),
    Signed(i64),
    Float(f64),
}

impl<'de> Deserialize<'de> for QuestionNumber {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawQuestionNumber::deserialize(deserializer)?;
        Ok(match raw {
            RawQuestionNumber::Text(text) => Self::new(text),
            RawQuestionNumber::Unsigned(value) => Self::from(value),
            RawQuestionNumber::Signed(value) => Self(value.to_string()),
            RawQuestionNumber::Float(value) => Self(value.to_string()),
        })
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────────
