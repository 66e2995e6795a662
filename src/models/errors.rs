//! Error types for label expansion
//!
//! Three levels, matching how far a failure reaches:
//! - `GrammarError`: the label text does not match the label grammar
//! - `LabelError`: one label cannot be expanded (the run continues)
//! - `PieceError`: a piece-level invariant is broken (the piece is abandoned)

use serde::Serialize;
use thiserror::Error;

/// The label text does not match the DCML label grammar
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
pub enum GrammarError {
    /// Input stops matching the grammar at `offset`
    #[error("cannot parse label '{label}': unexpected '{found}' at offset {offset}")]
    Unexpected {
        label: String,
        offset: usize,
        found: String,
    },

    /// Input matches the grammar but carries no numeral and no phrase marker
    #[error("label '{label}' has no numeral")]
    MissingNumeral { label: String },
}

/// Per-label failures; the label is kept in the output with empty derived fields
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
pub enum LabelError {
    #[error("unparsable label: {0}")]
    Unparsable(#[from] GrammarError),

    #[error("'{0}' is not a valid scale degree")]
    InvalidDegree(String),

    #[error("'{0}' is not a valid note name")]
    InvalidNoteName(String),

    /// `%`, `M` and `+M` only exist as seventh chords
    #[error("form '{form}' specifies a seventh and needs a seventh figure, got '{figbass}'")]
    FormRequiresSeventh { form: String, figbass: String },

    /// A change would need a non-chromatic adjustment when moved to another numeral
    #[error("change '{change}' cannot be moved from {from} to {to} by chromatic alteration")]
    NonChromaticShift {
        change: String,
        from: String,
        to: String,
    },
}

/// Piece-level failures; tone computation never starts for the piece
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
pub enum PieceError {
    #[error("piece '{piece}' declares several global keys: {first} and {second}")]
    MultipleGlobalKeys {
        piece: String,
        first: String,
        second: String,
    },

    #[error("piece '{piece}' declares no global key")]
    MissingGlobalKey { piece: String },

    #[error("piece '{piece}' has unbalanced pedal brackets: {opened} opened, {closed} closed")]
    UnbalancedPedal {
        piece: String,
        opened: usize,
        closed: usize,
    },
}

impl PieceError {
    /// Name of the piece that failed
    pub fn piece(&self) -> &str {
        match self {
            PieceError::MultipleGlobalKeys { piece, .. }
            | PieceError::MissingGlobalKey { piece }
            | PieceError::UnbalancedPedal { piece, .. } => piece,
        }
    }
}
