//! Parsing module for DCML harmony labels
//!
//! This module turns label text into `ParsedLabel`s: alternatives are
//! split off, the primary reading goes through the grammar, and the
//! shorthand symbols are rewritten into explicit chords.

pub mod alternatives;
pub mod grammar;
#[cfg(feature = "regex")]
pub mod reference;
pub mod special;

// Re-export commonly used functions
pub use alternatives::split_alternatives;
pub use grammar::parse_label_grammar;
pub use special::{merge_changes, substitute_special};

use crate::models::{LabelError, ParsedLabel};

/// Parse one label reading and substitute special symbols
pub fn parse_label(label: &str) -> Result<ParsedLabel, LabelError> {
    let mut parsed = parse_label_grammar(label)?;
    parsed.chord = parsed.chord.map(substitute_special);
    Ok(parsed)
}
