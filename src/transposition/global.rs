//! Re-expressing chords relative to the global tonic
//!
//! `to_global_frame` folds the local key and the relative root into the
//! numeral, so `V7/V` in local key `vi` of C major becomes `VII7`. Changes
//! are re-derived for the new numeral because the same token can denote a
//! different interval at another scale position.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::chord::{changes_to_string, Change, Chord, Figbass, Form, Numeral};
use crate::models::context::Context;
use crate::models::degree::{NoteName, RomanNumeral};
use crate::models::errors::LabelError;
use crate::models::tpc::{note_name_to_tpc, Tpc, MAJOR_SCALE, MINOR_SCALE};
use crate::transposition::keys::{relative_to_absolute_key, resolve_relative_keys};

/// A chord spelled as a degree of the global key
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GlobalChord {
    pub numeral: RomanNumeral,
    pub form: Option<Form>,
    pub figbass: Option<Figbass>,
    pub changes: Vec<Change>,
    /// Pedal as a degree of the global key
    pub pedal: Option<RomanNumeral>,
    pub globalkey: NoteName,
    pub globalkey_is_minor: bool,
}

impl fmt::Display for GlobalChord {
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
        Ok(())
    }
}

/// Interval above the root denoted by each change of `numeral`
///
/// The scale is built on C in the given mode; 3rds and 5ths (and steps
/// outside 1..=14) denote no interval of their own and yield `None`.
pub fn change_intervals(
    changes: &[Change],
    numeral: &RomanNumeral,
    minor: bool,
    root_alterations: bool,
) -> Vec<Option<Tpc>> {
    let scale = if minor { &MINOR_SCALE } else { &MAJOR_SCALE };
    let start = numeral.step as usize;
    let mut tpcs: Vec<Tpc> = (0..14).map(|i| scale[(start + i) % 7]).collect();
    if root_alterations {
        tpcs[0] += 7 * numeral.accidentals;
    }
    let root = tpcs[0];
    changes
        .iter()
        .map(|change| match change.step {
            3 | 5 => None,
            step @ 1..=14 => Some(tpcs[step as usize - 1] + 7 * change.accidentals - root),
            _ => None,
        })
        .collect()
}

/// Re-spell changes written for `old` so they denote the same intervals above `new`
pub fn transpose_changes(
    changes: &[Change],
    old: &RomanNumeral,
    new: &RomanNumeral,
    old_minor: bool,
    new_minor: bool,
) -> Result<Vec<Change>, LabelError> {
    let before = change_intervals(changes, old, old_minor, true);
    let after = change_intervals(changes, new, new_minor, true);
    changes
        .iter()
        .zip(before.into_iter().zip(after))
        .map(|(change, intervals)| match intervals {
            (Some(iv1), Some(iv2)) if iv1 != iv2 => {
                let difference = iv2 - iv1;
                if difference % 7 != 0 {
                    return Err(LabelError::NonChromaticShift {
                        change: change.to_string(),
                        from: old.to_string(),
                        to: new.to_string(),
                    });
                }
                Ok(Change {
                    accidentals: change.accidentals - difference / 7,
                    ..*change
                })
            }
            _ => Ok(*change),
        })
        .collect()
}

/// Spell a chord as a degree of the global key
///
/// `Ok(None)` for labels without a degree numeral.
pub fn to_global_frame(chord: &Chord, context: &Context) -> Result<Option<GlobalChord>, LabelError> {
    let numeral = match chord.numeral {
        Numeral::Degree(rn) => rn,
        _ => return Ok(None),
    };
    let global_minor = context.globalkey_is_minor;
    let pedal = context
        .pedal
        .map(|p| relative_to_absolute_key(&p, &context.localkey, global_minor));

    let mut localkey = context.localkey;
    let mut local_minor = context.localkey_is_minor;
    if let Some(target) = resolve_relative_keys(&chord.relativeroot, local_minor) {
        localkey = relative_to_absolute_key(&target, &localkey, global_minor);
        local_minor = localkey.lowercase;
    }

    let absolute = relative_to_absolute_key(&numeral, &localkey, global_minor);
    let changes = transpose_changes(&chord.changes, &numeral, &absolute, local_minor, global_minor)?;
    log::debug!("{} in {} -> {}", chord, context.localkey, absolute);

    Ok(Some(GlobalChord {
        numeral: absolute,
        form: chord.form,
        figbass: chord.figbass,
        changes,
        pedal,
        globalkey: context.globalkey,
        globalkey_is_minor: global_minor,
    }))
}

/// Offset of the global tonic on the line of fifths, for absolute pitches
pub fn to_absolute_pitch(globalkey: &NoteName) -> Tpc {
    note_name_to_tpc(globalkey)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_label;

    fn rn(text: &str) -> RomanNumeral {
        RomanNumeral::parse(text).unwrap()
    }

    fn global(label: &str, key: &str, localkey: &str) -> GlobalChord {
        let chord = parse_label(label).unwrap().chord.unwrap();
        let context = Context::new(NoteName::parse(key).unwrap(), rn(localkey), None);
        to_global_frame(&chord, &context).unwrap().unwrap()
    }

    #[test]
    fn test_change_intervals() {
        let changes = vec![
            Change::parse("b9").unwrap(),
            Change::parse("3").unwrap(),
            Change::parse("#7").unwrap(),
        ];
        // On V in major: b9 = Ab over G (-5 fifths), #7 = F# (major seventh)
        assert_eq!(change_intervals(&changes, &rn("V"), false, false), vec![Some(-5), None, Some(5)]);
    }

    #[test]
    fn test_applied_dominant_in_local_key() {
        let chord = global("V7/V", "C", "vi");
        assert_eq!(chord.to_string(), "VII7");
        assert_eq!(chord.globalkey.to_string(), "C");
    }

    #[test]
    fn test_plain_numeral_in_minor_local_key() {
        assert_eq!(global("V", "C", "vi").to_string(), "III");
        assert_eq!(global("iv6", "c", "i").to_string(), "iv6");
    }

    #[test]
    fn test_changes_are_respelled() {
        // the fourth above A is D in both A minor and C major
        assert_eq!(global("I(4)", "C", "vi").to_string(), "VI(4)");
        // (7) in C minor is Bb, which reads as b7 on i of C major
        assert_eq!(global("i(7)", "C", "i").to_string(), "i(b7)");
        // the ninth above Eb in Ab minor is Fb
        assert_eq!(global("V(+9)", "c", "vi").to_string(), "III(+b9)");
    }

    #[test]
    fn test_no_chord_has_no_global_form() {
        let chord = parse_label("@none").unwrap().chord.unwrap();
        let context = Context::new(NoteName::parse("C").unwrap(), rn("I"), None);
        assert_eq!(to_global_frame(&chord, &context), Ok(None));
    }
}
