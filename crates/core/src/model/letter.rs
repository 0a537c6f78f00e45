use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Maximum number of options a question can carry.
pub const MAX_OPTIONS: usize = 6;

/// Letter labelling one answer option.
///
/// Letters are drawn from the fixed alphabet `a`..`f` and order
/// alphabetically, which is the canonical order for correct-answer sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionLetter {
    A,
    B,
    C,
    D,
    E,
    F,
}

/// The option alphabet in positional order.
pub const ALPHABET: [OptionLetter; MAX_OPTIONS] = [
    OptionLetter::A,
    OptionLetter::B,
    OptionLetter::C,
    OptionLetter::D,
    OptionLetter::E,
    OptionLetter::F,
];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid option letter: {raw:?} (expected one of a-f)")]
pub struct ParseLetterError {
    pub raw: String,
}

impl OptionLetter {
    /// Letter assigned to the option at `index`, if the alphabet reaches that far.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        ALPHABET.get(index).copied()
    }

    /// Zero-based position of this letter in the alphabet.
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub fn as_char(self) -> char {
        match self {
            OptionLetter::A => 'a',
            OptionLetter::B => 'b',
            OptionLetter::C => 'c',
            OptionLetter::D => 'd',
            OptionLetter::E => 'e',
            OptionLetter::F => 'f',
        }
    }

    /// Case-insensitive conversion from a single character.
    #[must_use]
    pub fn from_char(ch: char) -> Option<Self> {
        match ch.to_ascii_lowercase() {
            'a' => Some(OptionLetter::A),
            'b' => Some(OptionLetter::B),
            'c' => Some(OptionLetter::C),
            'd' => Some(OptionLetter::D),
            'e' => Some(OptionLetter::E),
            'f' => Some(OptionLetter::F),
            _ => None,
        }
    }
}

impl fmt::Display for OptionLetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl FromStr for OptionLetter {
    type Err = ParseLetterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let mut chars = trimmed.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) => Self::from_char(ch),
            _ => None,
        }
        .ok_or_else(|| ParseLetterError { raw: s.to_owned() })
    }
}
