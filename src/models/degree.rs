//! Scale degrees, Roman numerals and note names
//!
//! A written degree is a run of accidentals (`#` or `b`, never mixed)
//! followed by a base symbol. Degrees put the accidentals in front
//! (`bVI`, `#4`), note names after the letter (`Ab`, `f#`). The case of
//! a Roman numeral or note name carries the mode: lowercase = minor.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::models::errors::LabelError;

/// Roman numerals for the seven steps, uppercase
pub const ROMAN_UPPER: [&str; 7] = ["I", "II", "III", "IV", "V", "VI", "VII"];

/// Roman numerals for the seven steps, lowercase
pub const ROMAN_LOWER: [&str; 7] = ["i", "ii", "iii", "iv", "v", "vi", "vii"];

const ARABIC: [&str; 7] = ["1", "2", "3", "4", "5", "6", "7"];

/// Count a run of accidentals: each `#` is +1, each `b` is -1
pub fn count_accidentals(accidentals: &str) -> i32 {
    accidentals
        .chars()
        .map(|c| match c {
            '#' => 1,
            'b' => -1,
            _ => 0,
        })
        .sum()
}

/// Render an accidental count as a run of `#` or `b`
pub fn accidentals_to_string(count: i32) -> String {
    if count >= 0 {
        "#".repeat(count as usize)
    } else {
        "b".repeat(count.unsigned_abs() as usize)
    }
}

/// Split off a leading run of identical accidentals
fn leading_accidentals(text: &str) -> (&str, &str) {
    match text.chars().next() {
        Some(c @ ('#' | 'b')) => {
            let end = text.find(|ch| ch != c).unwrap_or(text.len());
            text.split_at(end)
        }
        _ => ("", text),
    }
}

fn is_roman(base: &str) -> bool {
    ROMAN_UPPER.contains(&base) || ROMAN_LOWER.contains(&base)
}

/// Split a written degree such as `bbVI`, `#iv` or `b7` into
/// (accidental count, base symbol)
///
/// The base is a Roman numeral I-VII / i-vii or an Arabic digit 1-7.
pub fn split_degree(text: &str) -> Result<(i32, &str), LabelError> {
    let (accidentals, base) = leading_accidentals(text);
    if is_roman(base) || ARABIC.contains(&base) {
        Ok((count_accidentals(accidentals), base))
    } else {
        Err(LabelError::InvalidDegree(text.to_string()))
    }
}

/// Inverse of `split_degree`
pub fn join_degree(accidentals: i32, base: &str) -> String {
    format!("{}{}", accidentals_to_string(accidentals), base)
}

/// Split a note name such as `Ab` or `f##` into (accidental count, letter)
/// Note letters in diatonic order
const LETTERS: &str = "CDEFGAB";

pub fn split_note_name(text: &str) -> Result<(i32, char), LabelError> {
    let mut chars = text.chars();
    let letter = match chars.next() {
        Some(c) if matches!(c.to_ascii_uppercase(), 'A'..='G') => c,
        _ => return Err(LabelError::InvalidNoteName(text.to_string())),
    };
    let rest = chars.as_str();
    let (accidentals, tail) = leading_accidentals(rest);
    if !tail.is_empty() {
        return Err(LabelError::InvalidNoteName(text.to_string()));
    }
    Ok((count_accidentals(accidentals), letter))
}

/// A scale degree written as a Roman numeral, e.g. `bVI` or `#iv`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RomanNumeral {
    /// Signed number of sharps (positive) or flats (negative)
    pub accidentals: i32,
    /// Diatonic step, 0 = I ... 6 = VII
    pub step: u8,
    /// Lowercase numerals denote minor chords and keys
    pub lowercase: bool,
}

impl RomanNumeral {
    pub fn new(accidentals: i32, step: u8, lowercase: bool) -> Self {
        Self {
            accidentals,
            step: step % 7,
            lowercase,
        }
    }

    /// `I` or `i`
    pub fn tonic(minor: bool) -> Self {
        Self::new(0, 0, minor)
    }

    pub fn parse(text: &str) -> Result<Self, LabelError> {
        let (accidentals, base) = split_degree(text)?;
        if let Some(step) = ROMAN_UPPER.iter().position(|&r| r == base) {
            Ok(Self::new(accidentals, step as u8, false))
        } else if let Some(step) = ROMAN_LOWER.iter().position(|&r| r == base) {
            Ok(Self::new(accidentals, step as u8, true))
        } else {
            Err(LabelError::InvalidDegree(text.to_string()))
        }
    }

    pub fn is_minor(&self) -> bool {
        self.lowercase
    }

    /// The numeral without accidentals, in its written case
    pub fn base(&self) -> &'static str {
        if self.lowercase {
            ROMAN_LOWER[self.step as usize]
        } else {
            ROMAN_UPPER[self.step as usize]
        }
    }

    pub fn with_accidentals(self, accidentals: i32) -> Self {
        Self { accidentals, ..self }
    }
}

impl fmt::Display for RomanNumeral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", accidentals_to_string(self.accidentals), self.base())
    }
}

impl FromStr for RomanNumeral {
    type Err = LabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for RomanNumeral {
    type Error = LabelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<RomanNumeral> for String {
    fn from(value: RomanNumeral) -> Self {
        value.to_string()
    }
}

/// A note name used as key, e.g. `Ab` (A-flat major) or `f#` (F-sharp minor)
///
/// Only constructible from a valid letter, so `step` is always in `0..7`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NoteName {
    /// Diatonic step from C, 0 = C ... 6 = B
    step: u8,
    accidentals: i32,
    /// Written in lowercase
    minor: bool,
}

impl NoteName {
    /// Build from a letter `A`..`G` (lowercase for minor) and signed accidentals
    pub fn new(letter: char, accidentals: i32) -> Result<Self, LabelError> {
        let step = LETTERS
            .find(letter.to_ascii_uppercase())
            .ok_or_else(|| LabelError::InvalidNoteName(letter.to_string()))?;
        Ok(Self {
            step: step as u8,
            accidentals,
            minor: letter.is_ascii_lowercase(),
        })
    }

    pub fn parse(text: &str) -> Result<Self, LabelError> {
        let (accidentals, letter) = split_note_name(text)?;
        Self::new(letter, accidentals)
    }

    /// `C` or `c`
    pub fn c(minor: bool) -> Self {
        Self {
            step: 0,
            accidentals: 0,
            minor,
        }
    }

    /// The letter as written; lowercase means minor
    pub fn letter(&self) -> char {
        let letter = LETTERS.as_bytes()[self.step as usize] as char;
        if self.minor {
            letter.to_ascii_lowercase()
        } else {
            letter
        }
    }

    pub fn step(&self) -> u8 {
        self.step
    }

    pub fn accidentals(&self) -> i32 {
        self.accidentals
    }

    pub fn is_minor(&self) -> bool {
        self.minor
    }
}

impl fmt::Display for NoteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.letter(), accidentals_to_string(self.accidentals))
    }
}

impl FromStr for NoteName {
    type Err = LabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for NoteName {
    type Error = LabelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<NoteName> for String {
    fn from(value: NoteName) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_degree_roman_and_arabic() {
        assert_eq!(split_degree("bbVI").unwrap(), (-2, "VI"));
        assert_eq!(split_degree("#iv").unwrap(), (1, "iv"));
        assert_eq!(split_degree("b7").unwrap(), (-1, "7"));
        assert_eq!(split_degree("V").unwrap(), (0, "V"));
    }

    #[test]
    fn test_split_degree_rejects_mixed_accidentals() {
        assert_eq!(
            split_degree("#bVI"),
            Err(LabelError::InvalidDegree("#bVI".to_string()))
        );
        assert!(split_degree("VIII").is_err());
        assert!(split_degree("8").is_err());
        assert!(split_degree("").is_err());
        assert!(split_degree("Vi").is_err());
    }

    #[test]
    fn test_split_then_join_is_identity() {
        let bases = ROMAN_UPPER.iter().chain(ROMAN_LOWER.iter()).chain(ARABIC.iter());
        for base in bases {
            for acc in ["", "#", "##", "b", "bbb"] {
                let text = format!("{}{}", acc, base);
                let (count, split_base) = split_degree(&text).unwrap();
                assert_eq!(join_degree(count, split_base), text);
            }
        }
    }

    #[test]
    fn test_split_note_name() {
        assert_eq!(split_note_name("Ab").unwrap(), (-1, 'A'));
        assert_eq!(split_note_name("f##").unwrap(), (2, 'f'));
        assert_eq!(split_note_name("bb").unwrap(), (-1, 'b'));
        assert_eq!(
            split_note_name("H"),
            Err(LabelError::InvalidNoteName("H".to_string()))
        );
        assert!(split_note_name("C#b").is_err());
    }

    #[test]
    fn test_roman_numeral_display_round_trip() {
        for text in ["I", "bVII", "#iv", "vii", "bbIII"] {
            let rn: RomanNumeral = text.parse().unwrap();
            assert_eq!(rn.to_string(), text);
        }
        let rn = RomanNumeral::parse("bVI").unwrap();
        assert_eq!(rn.step, 5);
        assert_eq!(rn.accidentals, -1);
        assert!(!rn.is_minor());
        assert!(RomanNumeral::parse("5").is_err());
    }

    #[test]
    fn test_note_name_serde_as_text() {
        let key = NoteName::parse("Eb").unwrap();
        assert_eq!(serde_json::to_string(&key).unwrap(), "\"Eb\"");
        let back: NoteName = serde_json::from_str("\"c#\"").unwrap();
        assert!(back.is_minor());
        assert_eq!(back.accidentals, 1);
    }

    #[test]
    fn test_note_name_rejects_invalid_letters() {
        assert_eq!(
            NoteName::new('H', 0),
            Err(LabelError::InvalidNoteName("H".to_string()))
        );
        assert!(NoteName::new('x', -1).is_err());
        assert!(serde_json::from_str::<NoteName>("\"H\"").is_err());

        let key = NoteName::new('f', 1).unwrap();
        assert_eq!(key.letter(), 'f');
        assert_eq!(key.step(), 3);
        assert!(key.is_minor());
        assert_eq!(key.to_string(), "f#");
    }
}
