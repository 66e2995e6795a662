//! Models module for DCML harmony labels
//!
//! This module contains the data model of a label (degrees, chord
//! features, propagated context, tone sets) and the tonal pitch class
//! algebra everything else is computed with.

pub mod chord;
pub mod context;
pub mod degree;
pub mod errors;
pub mod tone_set;
pub mod tpc;

// Re-export commonly used types
pub use chord::{
    Change, ChangePrefix, Chord, ChordType, Figbass, Form, Numeral, ParsedLabel, PhraseEnd,
    SpecialChord,
};
pub use context::{Context, Position};
pub use degree::{NoteName, RomanNumeral};
pub use errors::{GrammarError, LabelError, PieceError};
pub use tone_set::{ChordTones, ToneLayout, ToneNotation, ToneSet, ToneWarning};
pub use tpc::Tpc;
