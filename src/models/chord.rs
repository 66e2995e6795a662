//! Chord features of a parsed DCML label
//!
//! `Chord` holds the numeral, form, figbass, changes and relative-root
//! chain of one label. `ParsedLabel` adds the key prefixes, the pedal
//! brackets and the phrase marker around it.

use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};
use std::fmt;
use std::str::FromStr;

use crate::models::degree::{accidentals_to_string, count_accidentals, NoteName, RomanNumeral};
use crate::models::errors::LabelError;

/// Chord form symbol written after the numeral
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Form {
    #[serde(rename = "o")]
    Diminished,
    #[serde(rename = "%")]
    HalfDiminished,
    #[serde(rename = "+")]
    Augmented,
    #[serde(rename = "M")]
    MajorSeventh,
    #[serde(rename = "+M")]
    AugmentedMajorSeventh,
}

impl Form {
    pub fn as_str(&self) -> &'static str {
        match self {
            Form::Diminished => "o",
            Form::HalfDiminished => "%",
            Form::Augmented => "+",
            Form::MajorSeventh => "M",
            Form::AugmentedMajorSeventh => "+M",
        }
    }

    /// `%`, `M` and `+M` denote seventh chords only
    pub fn requires_seventh(&self) -> bool {
        matches!(
            self,
            Form::HalfDiminished | Form::MajorSeventh | Form::AugmentedMajorSeventh
        )
    }
}

impl fmt::Display for Form {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Form {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "o" => Ok(Form::Diminished),
            "%" => Ok(Form::HalfDiminished),
            "+" => Ok(Form::Augmented),
            "M" => Ok(Form::MajorSeventh),
            "+M" => Ok(Form::AugmentedMajorSeventh),
            _ => Err(format!("Unknown chord form: {}", s)),
        }
    }
}

/// Inversion figure; root-position triads carry none
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize_repr, Deserialize_repr)]
#[repr(u8)]
pub enum Figbass {
    Six = 6,
    SixFour = 64,
    Seven = 7,
    SixFive = 65,
    FourThree = 43,
    Two = 2,
}

impl Figbass {
    pub fn as_str(&self) -> &'static str {
        match self {
            Figbass::Six => "6",
            Figbass::SixFour => "64",
            Figbass::Seven => "7",
            Figbass::SixFive => "65",
            Figbass::FourThree => "43",
            Figbass::Two => "2",
        }
    }

    pub fn is_seventh(&self) -> bool {
        matches!(
            self,
            Figbass::Seven | Figbass::SixFive | Figbass::FourThree | Figbass::Two
        )
    }

    /// Position of the bass among the chord's stacked thirds
    pub fn bass_index(&self) -> usize {
        match self {
            Figbass::Seven => 0,
            Figbass::Six | Figbass::SixFive => 1,
            Figbass::SixFour | Figbass::FourThree => 2,
            Figbass::Two => 3,
        }
    }
}

impl fmt::Display for Figbass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Figbass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "6" => Ok(Figbass::Six),
            "64" => Ok(Figbass::SixFour),
            "7" => Ok(Figbass::Seven),
            "65" => Ok(Figbass::SixFive),
            "43" => Ok(Figbass::FourThree),
            // 42 is an older spelling of 2
            "2" | "42" => Ok(Figbass::Two),
            _ => Err(format!("Unknown figbass: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ChangePrefix {
    #[default]
    Plain,
    /// `+`: the tone is added rather than replacing a chord tone
    Add,
    /// `^`: kept as written, handled like an unprefixed change
    Caret,
}

impl ChangePrefix {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangePrefix::Plain => "",
            ChangePrefix::Add => "+",
            ChangePrefix::Caret => "^",
        }
    }
}

/// One alteration token inside parentheses, e.g. `+#7` or `b13`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Change {
    pub prefix: ChangePrefix,
    pub accidentals: i32,
    /// Scale step above the root, 1..=14 in well-formed labels
    pub step: u8,
}

impl Change {
    pub fn new(prefix: ChangePrefix, accidentals: i32, step: u8) -> Self {
        Self {
            prefix,
            accidentals,
            step,
        }
    }

    pub fn is_added(&self) -> bool {
        self.prefix == ChangePrefix::Add
    }

    pub fn is_sharp(&self) -> bool {
        self.accidentals > 0
    }

    /// Parse a single change token
    pub fn parse(text: &str) -> Result<Self, LabelError> {
        let (prefix, rest) = match text.chars().next() {
            Some('+') => (ChangePrefix::Add, &text[1..]),
            Some('^') => (ChangePrefix::Caret, &text[1..]),
            _ => (ChangePrefix::Plain, text),
        };
        let digits_at = rest
            .find(|c: char| c.is_ascii_digit())
            .ok_or_else(|| LabelError::InvalidDegree(text.to_string()))?;
        let (accidentals, digits) = rest.split_at(digits_at);
        let mixed = accidentals.contains('#') && accidentals.contains('b');
        if mixed || accidentals.chars().any(|c| c != '#' && c != 'b') {
            return Err(LabelError::InvalidDegree(text.to_string()));
        }
        let step = digits
            .parse::<u8>()
            .map_err(|_| LabelError::InvalidDegree(text.to_string()))?;
        Ok(Self::new(prefix, count_accidentals(accidentals), step))
    }
}

impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}",
            self.prefix.as_str(),
            accidentals_to_string(self.accidentals),
            self.step
        )
    }
}

impl TryFrom<String> for Change {
    type Error = LabelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Change> for String {
    fn from(value: Change) -> Self {
        value.to_string()
    }
}

/// Render a change list the way it is written inside the parentheses
pub fn changes_to_string(changes: &[Change]) -> String {
    changes.iter().map(Change::to_string).collect()
}

/// Shorthand augmented-sixth chords
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpecialChord {
    #[serde(rename = "It")]
    Italian,
    #[serde(rename = "Ger")]
    German,
    #[serde(rename = "Fr")]
    French,
}

impl SpecialChord {
    pub const ALL: [SpecialChord; 3] = [SpecialChord::German, SpecialChord::Italian, SpecialChord::French];

    pub fn as_str(&self) -> &'static str {
        match self {
            SpecialChord::Italian => "It",
            SpecialChord::German => "Ger",
            SpecialChord::French => "Fr",
        }
    }
}

impl fmt::Display for SpecialChord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The marker for a position without harmony
pub const NO_CHORD: &str = "@none";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Numeral {
    Degree(RomanNumeral),
    Special(SpecialChord),
    NoChord,
}

impl Numeral {
    pub fn parse(text: &str) -> Result<Self, LabelError> {
        if text == NO_CHORD {
            return Ok(Numeral::NoChord);
        }
        if let Some(special) = SpecialChord::ALL.iter().find(|s| s.as_str() == text) {
            return Ok(Numeral::Special(*special));
        }
        RomanNumeral::parse(text).map(Numeral::Degree)
    }

    pub fn degree(&self) -> Option<&RomanNumeral> {
        match self {
            Numeral::Degree(rn) => Some(rn),
            _ => None,
        }
    }

    /// Lowercase numerals are minor; specials and the no-chord marker are not
    pub fn is_lowercase(&self) -> bool {
        matches!(self, Numeral::Degree(rn) if rn.lowercase)
    }
}

impl fmt::Display for Numeral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Numeral::Degree(rn) => write!(f, "{}", rn),
            Numeral::Special(special) => write!(f, "{}", special),
            Numeral::NoChord => write!(f, "{}", NO_CHORD),
        }
    }
}

impl TryFrom<String> for Numeral {
    type Error = LabelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Numeral> for String {
    fn from(value: Numeral) -> Self {
        value.to_string()
    }
}

/// The chord part of a label: `numeral[form][figbass][(changes)][/relativeroot]`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Chord {
    pub numeral: Numeral,
    pub form: Option<Form>,
    pub figbass: Option<Figbass>,
    pub changes: Vec<Change>,
    /// Applied-chord targets as written, outermost first (`V/V/ii` -> `[V, ii]`)
    pub relativeroot: Vec<RomanNumeral>,
    /// Set when the chord was rewritten from a shorthand symbol
    pub special: Option<SpecialChord>,
}

impl Chord {
    pub fn new(numeral: Numeral) -> Self {
        Self {
            numeral,
            form: None,
            figbass: None,
            changes: Vec::new(),
            relativeroot: Vec::new(),
            special: None,
        }
    }

    pub fn is_seventh(&self) -> bool {
        self.figbass.is_some_and(|f| f.is_seventh())
    }

    pub fn bass_index(&self) -> usize {
        self.figbass.map_or(0, |f| f.bass_index())
    }

    pub fn is_no_chord(&self) -> bool {
        self.numeral == Numeral::NoChord
    }

    /// Changes sorted by descending step, the order in which they are applied
    pub fn changes_by_descending_step(&self) -> Vec<Change> {
        let mut sorted = self.changes.clone();
        sorted.sort_by(|a, b| b.step.cmp(&a.step));
        sorted
    }

    pub fn relativeroot_text(&self) -> Option<String> {
        if self.relativeroot.is_empty() {
            return None;
        }
        let links: Vec<String> = self.relativeroot.iter().map(|rn| rn.to_string()).collect();
        Some(links.join("/"))
    }
}

impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.numeral)?;
        if let Some(form) = self.form {
            write!(f, "{}", form)?;
        }
        if let Some(figbass) = self.figbass {
            write!(f, "{}", figbass)?;
        }
        if !self.changes.is_empty() {
            write!(f, "({})", changes_to_string(&self.changes))?;
        }
        if let Some(rr) = self.relativeroot_text() {
            write!(f, "/{}", rr)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PhraseEnd {
    #[serde(rename = "\\\\")]
    Break,
    #[serde(rename = "{")]
    Start,
    #[serde(rename = "}")]
    End,
    #[serde(rename = "}{")]
    EndAndStart,
}

impl PhraseEnd {
    pub fn as_str(&self) -> &'static str {
        match self {
            PhraseEnd::Break => "\\\\",
            PhraseEnd::Start => "{",
            PhraseEnd::End => "}",
            PhraseEnd::EndAndStart => "}{",
        }
    }
}

impl fmt::Display for PhraseEnd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Every feature of one label as written
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ParsedLabel {
    pub globalkey: Option<NoteName>,
    pub localkey: Option<RomanNumeral>,
    /// Degree written before `[`, opening a pedal span
    pub pedal: Option<RomanNumeral>,
    pub chord: Option<Chord>,
    /// `]` closes the pedal span on this label
    pub pedal_end: bool,
    pub phrase_end: Option<PhraseEnd>,
}

impl ParsedLabel {
    /// A label carrying only a phrase marker is not a chord
    pub fn is_chord(&self) -> bool {
        self.chord.as_ref().is_some_and(|c| !c.is_no_chord())
    }
}

impl fmt::Display for ParsedLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(key) = self.globalkey {
            write!(f, ".{}.", key)?;
        }
        if let Some(key) = self.localkey {
            write!(f, "{}.", key)?;
        }
        if let Some(pedal) = self.pedal {
            write!(f, "{}[", pedal)?;
        }
        if let Some(chord) = &self.chord {
            write!(f, "{}", chord)?;
        }
        if self.pedal_end {
            write!(f, "]")?;
        }
        if let Some(marker) = self.phrase_end {
            write!(f, "{}", marker)?;
        }
        Ok(())
    }
}

/// The twelve chord qualities derived from numeral case, form and figbass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChordType {
    #[serde(rename = "M")]
    MajorTriad,
    #[serde(rename = "m")]
    MinorTriad,
    #[serde(rename = "o")]
    DiminishedTriad,
    #[serde(rename = "+")]
    AugmentedTriad,
    #[serde(rename = "mm7")]
    MinorSeventh,
    #[serde(rename = "Mm7")]
    DominantSeventh,
    #[serde(rename = "MM7")]
    MajorSeventh,
    #[serde(rename = "mM7")]
    MinorMajorSeventh,
    #[serde(rename = "o7")]
    DiminishedSeventh,
    #[serde(rename = "%7")]
    HalfDiminishedSeventh,
    #[serde(rename = "+7")]
    AugmentedSeventh,
    #[serde(rename = "+M7")]
    AugmentedMajorSeventh,
}

impl ChordType {
    /// Classify a chord; `None` for the no-chord marker and for seventh-only
    /// forms written with a triad inversion
    pub fn from_chord(chord: &Chord) -> Option<ChordType> {
        if chord.is_no_chord() {
            return None;
        }
        let minor = chord.numeral.is_lowercase();
        let triad_figure = !chord.is_seventh();
        if triad_figure {
            match chord.form {
                Some(Form::Diminished) => return Some(ChordType::DiminishedTriad),
                Some(Form::Augmented) => return Some(ChordType::AugmentedTriad),
                Some(form) if chord.figbass.is_some() => {
                    log::error!(
                        "{} is a seventh chord and cannot have figbass '{}'",
                        form,
                        chord.figbass.map_or("", |f| f.as_str())
                    );
                    return None;
                }
                // %, M and +M without figure read as seventh chords
                Some(_) => {}
                None => {
                    return Some(if minor {
                        ChordType::MinorTriad
                    } else {
                        ChordType::MajorTriad
                    })
                }
            }
        }
        Some(match (chord.form, minor) {
            (Some(Form::Diminished), _) => ChordType::DiminishedSeventh,
            (Some(Form::HalfDiminished), _) => ChordType::HalfDiminishedSeventh,
            (Some(Form::Augmented), _) => ChordType::AugmentedSeventh,
            (Some(Form::AugmentedMajorSeventh), _) => ChordType::AugmentedMajorSeventh,
            (Some(Form::MajorSeventh), true) => ChordType::MinorMajorSeventh,
            (Some(Form::MajorSeventh), false) => ChordType::MajorSeventh,
            (None, true) => ChordType::MinorSeventh,
            (None, false) => ChordType::DominantSeventh,
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ChordType::MajorTriad => "M",
            ChordType::MinorTriad => "m",
            ChordType::DiminishedTriad => "o",
            ChordType::AugmentedTriad => "+",
            ChordType::MinorSeventh => "mm7",
            ChordType::DominantSeventh => "Mm7",
            ChordType::MajorSeventh => "MM7",
            ChordType::MinorMajorSeventh => "mM7",
            ChordType::DiminishedSeventh => "o7",
            ChordType::HalfDiminishedSeventh => "%7",
            ChordType::AugmentedSeventh => "+7",
            ChordType::AugmentedMajorSeventh => "+M7",
        }
    }
}

impl fmt::Display for ChordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
