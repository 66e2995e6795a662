//! Chord tones as tonal pitch classes, and how to present them

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::tpc::{
    sort_by_keyboard_position, tpc_to_chromatic_class, tpc_to_interval, tpc_to_note_name,
    tpc_to_roman_numeral, tpc_to_scale_degree, Tpc,
};

/// Chord tones from the bass upward in stacked thirds, added tones, root and bass
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ToneSet {
    pub chord_tones: Vec<Tpc>,
    pub added_tones: Vec<Tpc>,
    pub root: Tpc,
    pub bass: Tpc,
}

impl ToneSet {
    /// The same tones counted from a tonic `offset` fifths away
    pub fn transposed(&self, offset: Tpc) -> ToneSet {
        ToneSet {
            chord_tones: self.chord_tones.iter().map(|t| t + offset).collect(),
            added_tones: self.added_tones.iter().map(|t| t + offset).collect(),
            root: self.root + offset,
            bass: self.bass + offset,
        }
    }
}

impl ToneSet {
    pub fn arrange(&self, layout: ToneLayout) -> ChordTones {
        match layout {
            ToneLayout::Separate => ChordTones::Separate(self.clone()),
            ToneLayout::Merged => {
                let all: Vec<Tpc> = self.chord_tones.iter().chain(&self.added_tones).copied().collect();
                ChordTones::Merged(sort_by_keyboard_position(&all, Some(self.bass)))
            }
            ToneLayout::BassOnly => ChordTones::Bass(self.bass),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToneLayout {
    /// Chord tones, added tones, root and bass
    #[default]
    Separate,
    /// One keyboard-sorted tuple starting from the bass
    Merged,
    BassOnly,
}

/// Tone output in the requested layout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "layout", content = "tones", rename_all = "snake_case")]
pub enum ChordTones {
    Separate(ToneSet),
    /// Chord and added tones in close position from the bass
    Merged(Vec<Tpc>),
    Bass(Tpc),
}

impl ChordTones {
    pub fn transposed(&self, offset: Tpc) -> ChordTones {
        match self {
            ChordTones::Separate(set) => ChordTones::Separate(set.transposed(offset)),
            ChordTones::Merged(tones) => ChordTones::Merged(tones.iter().map(|t| t + offset).collect()),
            ChordTones::Bass(bass) => ChordTones::Bass(bass + offset),
        }
    }

    pub fn bass(&self) -> Option<Tpc> {
        match self {
            ChordTones::Separate(set) => Some(set.bass),
            ChordTones::Merged(tones) => tones.first().copied(),
            ChordTones::Bass(bass) => Some(*bass),
        }
    }
}

/// Alternative spellings of a tpc
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ToneNotation {
    /// The integer itself
    #[default]
    Fifths,
    NoteName,
    Interval,
    ChromaticClass,
    ScaleDegree { minor: bool },
    RomanNumeral { minor: bool, auto_case: bool },
}

impl ToneNotation {
    pub fn render(&self, tpc: Tpc) -> String {
        match *self {
            ToneNotation::Fifths => tpc.to_string(),
            ToneNotation::NoteName => tpc_to_note_name(tpc),
            ToneNotation::Interval => tpc_to_interval(tpc),
            ToneNotation::ChromaticClass => tpc_to_chromatic_class(tpc).to_string(),
            ToneNotation::ScaleDegree { minor } => tpc_to_scale_degree(tpc, minor),
            ToneNotation::RomanNumeral { minor, auto_case } => {
                tpc_to_roman_numeral(tpc, minor, auto_case)
            }
        }
    }

    pub fn render_all(&self, tpcs: &[Tpc]) -> Vec<String> {
        tpcs.iter().map(|&t| self.render(t)).collect()
    }
}

/// Non-fatal findings while building chord tones
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ToneWarning {
    /// Change targets a step outside 2..=14
    MeaninglessStep { chord: String, change: String },
    /// A 7th change on a triad with a seventh figure position it cannot take
    AmbiguousSeventh { chord: String, change: String },
    /// The change produces a tone the chord already has
    NoEffect { chord: String, change: String },
    /// `#vii` in a major context, usually meant as `vii`
    SharpSeventhInMajor { chord: String },
}

impl fmt::Display for ToneWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToneWarning::MeaninglessStep { chord, change } => {
                write!(f, "{}: change ({}) does not denote a meaningful scale step", chord, change)
            }
            ToneWarning::AmbiguousSeventh { chord, change } => write!(
                f,
                "{}: it is unclear whether change ({}) replaces the root or is added",
                chord, change
            ),
            ToneWarning::NoEffect { chord, change } => {
                write!(f, "{}: change ({}) has no effect", chord, change)
            }
            ToneWarning::SharpSeventhInMajor { chord } => write!(
                f,
                "{}: #vii in a major context is most probably an annotation error",
                chord
            ),
        }
    }
}
