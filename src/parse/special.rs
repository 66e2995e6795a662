//! Substitution of the augmented-sixth shorthands `It`, `Ger` and `Fr`
//!
//! Each symbol stands for an applied chord to the dominant:
//!
//! | symbol | explicit chord  |
//! |--------|-----------------|
//! | `It`   | `viio6(b3)/V`   |
//! | `Ger`  | `viio65(b3)/V`  |
//! | `Fr`   | `V7(b5)/V`      |
//!
//! Existing changes and relative roots are merged into the explicit chord.
//! An explicit figbass is kept, except that `Ger6` and `Fr6` are read as
//! the symbol's own inversion.

use once_cell::sync::Lazy;
use std::collections::HashMap;

use crate::models::chord::{Change, ChangePrefix, Chord, Figbass, Form, Numeral, SpecialChord};
use crate::models::degree::RomanNumeral;

static EXPANSIONS: Lazy<HashMap<SpecialChord, Chord>> = Lazy::new(|| {
    let dominant = RomanNumeral::new(0, 4, false);
    let leading_tone = RomanNumeral::new(0, 6, true);
    let applied = |numeral: RomanNumeral, form, figbass, change: Change| Chord {
        numeral: Numeral::Degree(numeral),
        form,
        figbass: Some(figbass),
        changes: vec![change],
        relativeroot: vec![dominant],
        special: None,
    };
    let flat_third = Change::new(ChangePrefix::Plain, -1, 3);
    let flat_fifth = Change::new(ChangePrefix::Plain, -1, 5);
    HashMap::from([
        (
            SpecialChord::Italian,
            applied(leading_tone, Some(Form::Diminished), Figbass::Six, flat_third),
        ),
        (
            SpecialChord::German,
            applied(leading_tone, Some(Form::Diminished), Figbass::SixFive, flat_third),
        ),
        (
            SpecialChord::French,
            applied(dominant, None, Figbass::Seven, flat_fifth),
        ),
    ])
});

/// The explicit chord a shorthand symbol stands for
pub fn expansion(special: SpecialChord) -> Option<&'static Chord> {
    EXPANSIONS.get(&special)
}

/// Concatenate change lists and order them by descending step
///
/// The sort is stable, so changes on the same step keep their order.
pub fn merge_changes(left: &[Change], right: &[Change]) -> Vec<Change> {
    let mut merged: Vec<Change> = left.iter().chain(right.iter()).copied().collect();
    merged.sort_by(|a, b| b.step.cmp(&a.step));
    merged
}

/// Rewrite a shorthand chord into its explicit form; other chords pass through
pub fn substitute_special(chord: Chord) -> Chord {
    let special = match chord.numeral {
        Numeral::Special(special) => special,
        _ => return chord,
    };
    let explicit = match expansion(special) {
        Some(explicit) => explicit,
        None => return chord,
    };

    let figbass_replaceable = match (special, chord.figbass) {
        (_, None) => true,
        (SpecialChord::German | SpecialChord::French, Some(Figbass::Six)) => true,
        _ => false,
    };
    let changes = if chord.changes.is_empty() {
        explicit.changes.clone()
    } else {
        log::debug!("Merging changes of {} into {}", chord, explicit);
        merge_changes(&chord.changes, &explicit.changes)
    };
    let relativeroot = explicit
        .relativeroot
        .iter()
        .chain(chord.relativeroot.iter())
        .copied()
        .collect();

    Chord {
        numeral: explicit.numeral,
        form: explicit.form.or(chord.form),
        figbass: if figbass_replaceable {
            explicit.figbass
        } else {
            chord.figbass
        },
        changes,
        relativeroot,
        special: Some(special),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::grammar::parse_label_grammar;

    fn substituted(label: &str) -> Chord {
        let chord = parse_label_grammar(label).unwrap().chord.unwrap();
        substitute_special(chord)
    }

    #[test]
    fn test_german_sixth() {
        let chord = substituted("Ger65");
        assert_eq!(chord.to_string(), "viio65(b3)/V");
        assert_eq!(chord.special, Some(SpecialChord::German));
    }

    #[test]
    fn test_stray_six_is_replaced_for_german_and_french() {
        assert_eq!(substituted("Ger6").to_string(), "viio65(b3)/V");
        assert_eq!(substituted("Fr6").to_string(), "V7(b5)/V");
        assert_eq!(substituted("Fr43").to_string(), "V43(b5)/V");
    }

    #[test]
    fn test_italian_keeps_explicit_figbass() {
        assert_eq!(substituted("It").to_string(), "viio6(b3)/V");
        assert_eq!(substituted("It64").to_string(), "viio64(b3)/V");
    }

    #[test]
    fn test_merges_changes_and_relative_root() {
        let chord = substituted("Ger(+#7)/ii");
        assert_eq!(chord.to_string(), "viio65(+#7b3)/V/ii");
    }

    #[test]
    fn test_plain_chords_pass_through() {
        let chord = substituted("V7/V");
        assert_eq!(chord.to_string(), "V7/V");
        assert!(chord.special.is_none());
    }

    #[test]
    fn test_merge_changes_sorts_descending() {
        let left = vec![Change::parse("b3").unwrap()];
        let right = vec![Change::parse("+#7").unwrap(), Change::parse("9").unwrap()];
        let merged: Vec<String> = merge_changes(&left, &right).iter().map(|c| c.to_string()).collect();
        assert_eq!(merged, vec!["9", "+#7", "b3"]);
    }
}
