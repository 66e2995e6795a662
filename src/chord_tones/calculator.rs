//! Chord tones from chord features
//!
//! The calculator lays a two-octave diatonic scale over the chord root,
//! fixes 3rd, 5th and 7th from the form template, then applies the changes
//! from the highest step down. Tones are tpcs relative to the local tonic.

use crate::models::chord::{Change, Chord, Figbass, Form, Numeral};
use crate::models::degree::RomanNumeral;
use crate::models::errors::LabelError;
use crate::models::tone_set::{ToneSet, ToneWarning};
use crate::models::tpc::{roman_numeral_to_tpc_offset, Tpc, MAJOR_SCALE, MINOR_SCALE};
use crate::parse::special::substitute_special;
use crate::transposition::keys::resolve_relative_keys;

/// Chord tones plus whatever was noticed while building them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToneResult {
    pub tones: ToneSet,
    pub warnings: Vec<ToneWarning>,
}

/// Steps 2, 4 and 6 (and their compounds), as indices from the root
const NEIGHBOR_STEPS: [usize; 6] = [1, 3, 5, 8, 10, 12];

/// Two octaves of a diatonic scale from the chord root, root altered
struct ScaleFrame {
    tpcs: [Tpc; 14],
    root: Tpc,
}

impl ScaleFrame {
    fn new(numeral: &RomanNumeral, key: Tpc, minor: bool) -> Self {
        let scale = if minor { &MINOR_SCALE } else { &MAJOR_SCALE };
        let start = numeral.step as usize;
        let mut tpcs = [0; 14];
        for (i, tpc) in tpcs.iter_mut().enumerate() {
            *tpc = scale[(start + i) % 7] + key;
        }
        let root = tpcs[0] + 7 * numeral.accidentals;
        tpcs[0] = root;
        Self { tpcs, root }
    }

    /// Fix chord step `step` (1-based) at `size` fifths above the root, in both octaves
    fn set_interval(&mut self, step: usize, size: Tpc) {
        let tone = self.root + size;
        self.tpcs[step - 1] = tone;
        self.tpcs[step + 6] = tone;
    }

    fn apply_form(&mut self, chord: &Chord, numeral: &RomanNumeral) {
        let seventh = chord.is_seventh();
        match chord.form {
            Some(Form::Diminished) => {
                self.set_interval(3, -3);
                self.set_interval(5, -6);
                if seventh {
                    self.set_interval(7, -9);
                }
            }
            // m3, d5, m7 above the root (-3, -6, -2). Some DCML tooling
            // spells `%` with other offsets; those do not give a half-diminished chord.
            Some(Form::HalfDiminished) => {
                self.set_interval(3, -3);
                self.set_interval(5, -6);
                self.set_interval(7, -2);
            }
            Some(Form::Augmented) => {
                self.set_interval(3, 4);
                self.set_interval(5, 8);
                if seventh {
                    self.set_interval(7, -2);
                }
            }
            // M3, A5, M7 above the root (4, 8, 5), matching the `+M7` chord type
            Some(Form::AugmentedMajorSeventh) => {
                self.set_interval(3, 4);
                self.set_interval(5, 8);
                self.set_interval(7, 5);
            }
            Some(Form::MajorSeventh) | None => {
                self.set_interval(5, 1);
                self.set_interval(3, if numeral.lowercase { -3 } else { 4 });
                if chord.form == Some(Form::MajorSeventh) {
                    self.set_interval(7, 5);
                } else if seventh {
                    self.set_interval(7, -2);
                }
            }
        }
    }
}

/// Compute the tones of `chord` in a key whose tonic is tpc 0
///
/// `minor` is the mode of the local key. `Ok(None)` for the no-chord marker.
pub fn chord_tones(chord: &Chord, minor: bool) -> Result<Option<ToneResult>, LabelError> {
    let chord = match chord.numeral {
        Numeral::Special(_) => substitute_special(chord.clone()),
        _ => chord.clone(),
    };
    let numeral = match chord.numeral {
        Numeral::Degree(rn) => rn,
        _ => return Ok(None),
    };

    if let Some(form) = chord.form {
        if form.requires_seventh() && !chord.is_seventh() {
            return Err(LabelError::FormRequiresSeventh {
                form: form.to_string(),
                figbass: chord.figbass.map(|f| f.to_string()).unwrap_or_default(),
            });
        }
    }

    let (key, minor) = match resolve_relative_keys(&chord.relativeroot, minor) {
        Some(target) => {
            log::debug!("{} applied to {}", chord, target);
            (roman_numeral_to_tpc_offset(&target, minor), target.lowercase)
        }
        None => (0, minor),
    };

    Ok(Some(tones_in_key(&chord, &numeral, key, minor)))
}

fn tones_in_key(chord: &Chord, numeral: &RomanNumeral, key: Tpc, minor: bool) -> ToneResult {
    let label = chord.to_string();
    let mut warnings = Vec::new();

    if !minor && numeral.accidentals == 1 && numeral.step == 6 {
        let warning = ToneWarning::SharpSeventhInMajor { chord: label.clone() };
        log::warn!("{}", warning);
        warnings.push(warning);
    }

    let mut frame = ScaleFrame::new(numeral, key, minor);
    frame.apply_form(chord, numeral);

    let mut added = Vec::new();
    for change in chord.changes_by_descending_step() {
        if let Some(warning) = apply_change(&mut frame, &mut added, chord, &change, &label) {
            log::warn!("{}", warning);
            warnings.push(warning);
        }
    }

    let positions: &[usize] = if chord.is_seventh() { &[0, 2, 4, 6] } else { &[0, 2, 4] };
    let mut tones: Vec<Tpc> = positions.iter().map(|&i| frame.tpcs[i]).collect();
    tones.rotate_left(chord.bass_index());
    let bass = tones[0];

    ToneResult {
        tones: ToneSet {
            chord_tones: tones,
            added_tones: added,
            root: frame.root,
            bass,
        },
        warnings,
    }
}

/// Apply one change to the scale frame; returns a warning when the change
/// is skipped or has no effect
fn apply_change(
    frame: &mut ScaleFrame,
    added: &mut Vec<Tpc>,
    chord: &Chord,
    change: &Change,
    label: &str,
) -> Option<ToneWarning> {
    if !(2..=14).contains(&change.step) {
        return Some(ToneWarning::MeaninglessStep {
            chord: label.to_string(),
            change: change.to_string(),
        });
    }
    let index = change.step as usize - 1;
    let next_octave = index > 7;
    let tone = frame.tpcs[index] + 7 * change.accidentals;
    let mut warning = None;

    if change.is_added() {
        added.push(tone);
    } else if NEIGHBOR_STEPS.contains(&index) {
        // 2, 4, 6 replace the neighbor below, or the one above when sharpened
        if change.is_sharp() {
            frame.tpcs[index + 1] = tone;
            if index == 5 && !chord.is_seventh() {
                added.push(tone);
            }
        } else {
            frame.tpcs[index - 1] = tone;
        }
    } else if index == 6 && chord.figbass != Some(Figbass::Seven) {
        match chord.figbass {
            None => added.push(tone),
            Some(f) if !f.is_seventh() => frame.tpcs[0] = tone,
            _ if change.is_sharp() => {
                frame.tpcs[7] = tone;
                added.push(tone);
            }
            _ => {
                warning = Some(ToneWarning::AmbiguousSeventh {
                    chord: label.to_string(),
                    change: change.to_string(),
                })
            }
        }
    } else if frame.tpcs[index] == tone && !next_octave {
        warning = Some(ToneWarning::NoEffect {
            chord: label.to_string(),
            change: change.to_string(),
        });
    } else {
        frame.tpcs[index] = tone;
    }

    if next_octave && !change.is_added() {
        added.push(tone);
    }
    warning
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_label;

    fn tones(label: &str, minor: bool) -> ToneResult {
        let chord = parse_label(label).unwrap().chord.unwrap();
        chord_tones(&chord, minor).unwrap().unwrap()
    }

    #[test]
    fn test_major_triad() {
        let result = tones("I", false);
        assert_eq!(result.tones.chord_tones, vec![0, 4, 1]);
        assert_eq!(result.tones.root, 0);
        assert_eq!(result.tones.bass, 0);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_dominant_seventh_in_minor() {
        let result = tones("V7", true);
        assert_eq!(result.tones.chord_tones, vec![1, 5, 2, -1]);
    }

    #[test]
    fn test_inversions_rotate_to_bass() {
        assert_eq!(tones("V65", false).tones.chord_tones, vec![5, 2, -1, 1]);
        assert_eq!(tones("V43", false).tones.chord_tones, vec![2, -1, 1, 5]);
        assert_eq!(tones("V2", false).tones.chord_tones, vec![-1, 1, 5, 2]);
        assert_eq!(tones("I64", false).tones.bass, 1);
    }

    #[test]
    fn test_forms() {
        assert_eq!(tones("#viio7", true).tones.chord_tones, vec![5, 2, -1, -4]);
        assert_eq!(tones("vii%7", false).tones.chord_tones, vec![5, 2, -1, 3]);
        assert_eq!(tones("IM7", false).tones.chord_tones, vec![0, 4, 1, 5]);
        assert_eq!(tones("III+", true).tones.chord_tones, vec![-3, 1, 5]);
        // Eb G B D; ii%7 in major is D F Ab C
        assert_eq!(tones("III+M7", true).tones.chord_tones, vec![-3, 1, 5, 2]);
        assert_eq!(tones("ii%7", false).tones.chord_tones, vec![2, -1, -4, 0]);
        assert_eq!(tones("bVI", false).tones.chord_tones, vec![-4, 0, -3]);
    }

    #[test]
    fn test_applied_chord() {
        let result = tones("viio6/V", false);
        assert_eq!(result.tones.chord_tones, vec![3, 0, 6]);
        assert_eq!(result.tones.root, 6);
    }

    #[test]
    fn test_german_sixth() {
        let result = tones("Ger65", false);
        assert_eq!(result.tones.chord_tones, vec![-4, 0, -3, 6]);
        assert_eq!(result.tones.root, 6);
    }

    #[test]
    fn test_suspension_replaces_third() {
        let result = tones("V(4)", false);
        assert_eq!(result.tones.chord_tones, vec![1, 0, 2]);
        assert!(result.tones.added_tones.is_empty());
    }

    #[test]
    fn test_sharp_six_in_triad_is_also_added() {
        let result = tones("V(#6)", false);
        assert_eq!(result.tones.chord_tones, vec![1, 5, 2]);
        // E# takes the place of the seventh and sounds as an added tone
        assert_eq!(result.tones.added_tones, vec![11]);
    }

    #[test]
    fn test_seventh_change_cases() {
        // root position triad: added
        assert_eq!(tones("I(7)", false).tones.added_tones, vec![5]);
        // inverted triad: replaces the root
        assert_eq!(tones("I6(7)", false).tones.chord_tones, vec![4, 1, 5]);
        // seventh chord with figure 65 and a sharp seventh: retains and adds
        let result = tones("V65(#7)", false);
        assert_eq!(result.tones.added_tones, vec![6]);
        // seventh chord with a plain seventh: ambiguous
        let result = tones("V65(b7)", false);
        assert!(matches!(result.warnings[0], ToneWarning::AmbiguousSeventh { .. }));
    }

    #[test]
    fn test_ninth_is_added_in_next_octave() {
        let result = tones("V7(b9)", false);
        assert_eq!(result.tones.chord_tones, vec![1, 5, 2, -1]);
        assert_eq!(result.tones.added_tones, vec![-4]);
    }

    #[test]
    fn test_warnings() {
        let result = tones("V(1)", false);
        assert!(matches!(result.warnings[0], ToneWarning::MeaninglessStep { .. }));
        let result = tones("V(5)", false);
        assert!(matches!(result.warnings[0], ToneWarning::NoEffect { .. }));
        let result = tones("#viio7", false);
        assert!(matches!(result.warnings[0], ToneWarning::SharpSeventhInMajor { .. }));
    }

    #[test]
    fn test_form_requires_seventh() {
        let chord = parse_label("vii%6").unwrap().chord.unwrap();
        assert_eq!(
            chord_tones(&chord, false),
            Err(LabelError::FormRequiresSeventh {
                form: "%".to_string(),
                figbass: "6".to_string()
            })
        );
    }

    #[test]
    fn test_no_chord() {
        let chord = parse_label("@none").unwrap().chord.unwrap();
        assert_eq!(chord_tones(&chord, false), Ok(None));
    }
}
