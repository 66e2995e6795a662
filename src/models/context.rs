//! Propagated tonal context and score positions

use num_rational::Ratio;
use serde::{Deserialize, Serialize};

use crate::models::degree::{NoteName, RomanNumeral};

/// Resolved keys and pedal of one label after propagation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Context {
    pub globalkey: NoteName,
    /// Relative to the global key
    pub localkey: RomanNumeral,
    /// Relative to the local key, unless propagation ran in literal mode
    pub pedal: Option<RomanNumeral>,
    pub globalkey_is_minor: bool,
    pub localkey_is_minor: bool,
}

impl Context {
    pub fn new(globalkey: NoteName, localkey: RomanNumeral, pedal: Option<RomanNumeral>) -> Self {
        Self {
            globalkey,
            localkey,
            pedal,
            globalkey_is_minor: globalkey.is_minor(),
            localkey_is_minor: localkey.is_minor(),
        }
    }
}

/// Where a label sits in the score: measure count and onset within it
///
/// Ordered by measure first, then onset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub mc: u32,
    pub onset: Ratio<i64>,
}

impl Position {
    pub fn new(mc: u32, onset: Ratio<i64>) -> Self {
        Self { mc, onset }
    }

    /// Start of measure `mc`
    pub fn measure(mc: u32) -> Self {
        Self::new(mc, Ratio::from_integer(0))
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::measure(1)
    }
}
