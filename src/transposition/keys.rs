//! Converting Roman-numeral degrees between keys
//!
//! A degree written relative to a local key (`vi` of `VI`) is re-expressed
//! relative to the global tonic (`#iv` in major, `iv` in minor) and back.
//! Diatonic arithmetic picks the step; the shift table adds the accidental
//! that appears because the two keys' diatonic collections differ.
//!
//! Example (global C major / C minor):
//!   relative_to_absolute_key(vi, VI, major) → #iv   (vi of A major = F# minor)
//!   relative_to_absolute_key(vi, vi, major) → iv    (vi of A minor = F minor)
//!   relative_to_absolute_key(vi, VI, minor) → iv    (vi of Ab major = F minor)
//!   relative_to_absolute_key(vi, vi, minor) → biv   (vi of Ab minor = Fb minor)

use crate::models::degree::RomanNumeral;

/// Extra sharps picked up between two degrees of a major scale, indexed by
/// the two steps (symmetric)
const SHIFTS: [[i32; 7]; 7] = [
    [0, 0, 0, 0, 0, 0, 0],
    [0, 0, 1, 0, 0, 0, 1],
    [0, 1, 1, 0, 0, 1, 1],
    [0, 0, 0, -1, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 1],
    [0, 0, 1, 0, 0, 1, 1],
    [0, 1, 1, 0, 1, 1, 1],
];

/// Steps III, VI and VII of a minor key are a semitone lower than in major
fn lowered_in_minor(step: usize) -> bool {
    matches!(step, 2 | 5 | 6)
}

/// A minor global key reads the table from its relative major
fn table_row(key_step: usize, global_minor: bool) -> usize {
    if global_minor {
        (key_step + 5) % 7
    } else {
        key_step
    }
}

/// Express `relative` (a degree of `key`) as a degree of the global tonic
pub fn relative_to_absolute_key(relative: &RomanNumeral, key: &RomanNumeral, global_minor: bool) -> RomanNumeral {
    let rel_step = relative.step as usize;
    let key_step = key.step as usize;
    let mut shift = relative.accidentals + key.accidentals;
    if key.lowercase && lowered_in_minor(rel_step) {
        shift -= 1;
    }
    shift += SHIFTS[rel_step][table_row(key_step, global_minor)];
    RomanNumeral::new(shift, ((rel_step + key_step) % 7) as u8, relative.lowercase)
}

/// Express `absolute` (a degree of the global tonic) as a degree of `key`
pub fn absolute_to_relative_key(absolute: &RomanNumeral, key: &RomanNumeral, global_minor: bool) -> RomanNumeral {
    let key_step = key.step as usize;
    let rel_step = (absolute.step as usize + 7 - key_step) % 7;
    let mut shift = absolute.accidentals - key.accidentals;
    if key.lowercase && lowered_in_minor(rel_step) {
        shift += 1;
    }
    shift -= SHIFTS[table_row(key_step, global_minor)][rel_step];
    RomanNumeral::new(shift, rel_step as u8, absolute.lowercase)
}

/// Resolve an applied-chord chain (`V/V/V` as `[V, V, V]`) to one degree
///
/// The chain is resolved right to left; each target is read in the mode of
/// the one to its right, the last in `minor`.
pub fn resolve_relative_keys(chain: &[RomanNumeral], minor: bool) -> Option<RomanNumeral> {
    match chain {
        [] => None,
        [single] => Some(*single),
        [previous @ .., last] => {
            let inner = resolve_relative_keys(previous, last.lowercase)?;
            Some(relative_to_absolute_key(&inner, last, minor))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rn(text: &str) -> RomanNumeral {
        RomanNumeral::parse(text).unwrap()
    }

    #[test]
    fn test_relative_to_absolute_examples() {
        assert_eq!(relative_to_absolute_key(&rn("vi"), &rn("VI"), false), rn("#iv"));
        assert_eq!(relative_to_absolute_key(&rn("vi"), &rn("vi"), false), rn("iv"));
        assert_eq!(relative_to_absolute_key(&rn("vi"), &rn("VI"), true), rn("iv"));
        assert_eq!(relative_to_absolute_key(&rn("vi"), &rn("vi"), true), rn("biv"));
        assert_eq!(relative_to_absolute_key(&rn("V"), &rn("V"), false), rn("II"));
        assert_eq!(relative_to_absolute_key(&rn("V"), &rn("i"), true), rn("V"));
    }

    #[test]
    fn test_absolute_to_relative_examples() {
        assert_eq!(absolute_to_relative_key(&rn("iv"), &rn("VI"), false), rn("bvi"));
        assert_eq!(absolute_to_relative_key(&rn("iv"), &rn("vi"), false), rn("vi"));
        assert_eq!(absolute_to_relative_key(&rn("iv"), &rn("VI"), true), rn("vi"));
        assert_eq!(absolute_to_relative_key(&rn("iv"), &rn("vi"), true), rn("#vi"));
        assert_eq!(absolute_to_relative_key(&rn("VI"), &rn("IV"), false), rn("III"));
        assert_eq!(absolute_to_relative_key(&rn("VI"), &rn("iv"), false), rn("#III"));
        assert_eq!(absolute_to_relative_key(&rn("VI"), &rn("IV"), true), rn("bIII"));
    }

    #[test]
    fn test_resolve_chains() {
        assert_eq!(resolve_relative_keys(&[rn("V"), rn("V"), rn("V")], false), Some(rn("VI")));
        assert_eq!(resolve_relative_keys(&[rn("V"), rn("V")], false), Some(rn("II")));
        assert_eq!(resolve_relative_keys(&[rn("ii")], false), Some(rn("ii")));
        assert_eq!(resolve_relative_keys(&[], false), None);
    }
}
