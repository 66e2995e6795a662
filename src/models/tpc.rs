//! Tonal pitch classes on the line of fifths
//!
//! A tonal pitch class (tpc) counts perfect fifths from C (or from the
//! tonic, for intervals): 0 = C, 1 = G, -1 = F, 7 = C#, -7 = Cb.
//! Adding 7 raises by a chromatic semitone, so enharmonic spellings
//! stay distinct. Every conversion here is total.

use crate::models::degree::{accidentals_to_string, NoteName, RomanNumeral};

pub type Tpc = i32;

/// Steps in line-of-fifths order starting on the fourth: F C G D A E B
const NOTE_LETTERS: [&str; 7] = ["F", "C", "G", "D", "A", "E", "B"];
const MAJOR_NUMERALS: [&str; 7] = ["IV", "I", "V", "II", "VI", "III", "VII"];
const MINOR_NUMERALS: [&str; 7] = ["VI", "III", "VII", "IV", "I", "V", "II"];
const MAJOR_DEGREES: [&str; 7] = ["4", "1", "5", "2", "6", "3", "7"];
const MINOR_DEGREES: [&str; 7] = ["6", "3", "7", "4", "1", "5", "2"];

/// Interval size per position, same order as `NOTE_LETTERS`
const INTERVAL_NUMBERS: [u8; 7] = [4, 1, 5, 2, 6, 3, 7];

/// Tpc of each step (0 = I ... 6 = VII) relative to the tonic
pub const MAJOR_SCALE: [Tpc; 7] = [0, 2, 4, -1, 1, 3, 5];
pub const MINOR_SCALE: [Tpc; 7] = [0, 2, -3, -1, 1, -4, -2];

/// Tpc of the letters C D E F G A B
const LETTER_TPCS: [Tpc; 7] = [0, 2, 4, -1, 1, 3, 5];

/// Split a tpc into (accidental count, index into a 7-step table)
fn spell(fifths: Tpc) -> (i32, usize) {
    let shifted = fifths + 1;
    (shifted.div_euclid(7), shifted.rem_euclid(7) as usize)
}

pub fn note_name_to_tpc(name: &NoteName) -> Tpc {
    LETTER_TPCS[name.step() as usize] + 7 * name.accidentals()
}

/// `0 -> "C"`, `-2 -> "Bb"`, `6 -> "F#"`
pub fn tpc_to_note_name(tpc: Tpc) -> String {
    let (accidentals, index) = spell(tpc);
    format!("{}{}", NOTE_LETTERS[index], accidentals_to_string(accidentals))
}

/// `0 -> "P1"`, `-1 -> "P4"`, `-2 -> "m7"`, `4 -> "M3"`, `6 -> "A4"`
pub fn tpc_to_interval(tpc: Tpc) -> String {
    let shifted = tpc + 1;
    let position = shifted.rem_euclid(7) as usize;
    let number = INTERVAL_NUMBERS[position];
    let region = shifted.div_euclid(7);
    let quality = match region {
        0 => ["P", "P", "P", "M", "M", "M", "M"][position].to_string(),
        -1 => ["D", "D", "D", "m", "m", "m", "m"][position].to_string(),
        r if r < -1 => "D".repeat((r.unsigned_abs() - 1) as usize),
        r => "A".repeat(r as usize),
    };
    format!("{}{}", quality, number)
}

/// Chromatic pitch class 0..=11
pub fn tpc_to_chromatic_class(tpc: Tpc) -> i32 {
    (7 * tpc).rem_euclid(12)
}

/// Arabic scale degree relative to a major or minor tonic: `-2 -> "b7"` in
/// major, `"7"` in minor
pub fn tpc_to_scale_degree(tpc: Tpc, minor: bool) -> String {
    let (steps, selection) = if minor {
        (&MINOR_DEGREES, tpc + 3)
    } else {
        (&MAJOR_DEGREES, tpc)
    };
    let (accidentals, index) = spell(selection);
    format!("{}{}", accidentals_to_string(accidentals), steps[index])
}

/// Roman numeral of a tpc interval above the tonic
///
/// Uppercase unless `auto_case` is set and the degree carries a minor
/// third in the scale, in which case the numeral is lowercased.
pub fn tpc_to_roman_numeral(tpc: Tpc, minor: bool, auto_case: bool) -> String {
    let (steps, selection) = if minor {
        (&MINOR_NUMERALS, tpc + 3)
    } else {
        (&MAJOR_NUMERALS, tpc)
    };
    let (accidentals, index) = spell(selection);
    let numeral = format!("{}{}", accidentals_to_string(accidentals), steps[index]);
    if auto_case && is_minor_third(tpc, minor) {
        numeral.to_lowercase()
    } else {
        numeral
    }
}

/// Whether the scale built on the tonic has a minor third above `tpc`
///
/// Only the diatonic position of `tpc` is consulted.
pub fn is_minor_third(tpc: Tpc, minor: bool) -> bool {
    let thirds: [Tpc; 7] = if minor {
        [-4, -3, -2, -1, 0, 1, 2]
    } else {
        [3, 4, 5, -1, 0, 1, 2]
    };
    thirds[(tpc + 1).rem_euclid(7) as usize] - tpc == -3
}

/// Transposition interval of a Roman numeral within a major or minor scale;
/// the numeral's own case is ignored
pub fn roman_numeral_to_tpc_offset(numeral: &RomanNumeral, minor: bool) -> Tpc {
    let scale = if minor { &MINOR_SCALE } else { &MAJOR_SCALE };
    scale[numeral.step as usize] + 7 * numeral.accidentals
}

/// Sort tpcs by chromatic pitch class, then by descending tpc
///
/// With `start`, the result is rotated to begin on the first element whose
/// pitch class is at or above that of `start` (or on the last element
/// when none is).
pub fn sort_by_keyboard_position(tpcs: &[Tpc], start: Option<Tpc>) -> Vec<Tpc> {
    let mut sorted = tpcs.to_vec();
    sorted.sort_by_key(|&t| (tpc_to_chromatic_class(t), -t));
    if let Some(start) = start {
        let start_class = tpc_to_chromatic_class(start);
        let mut i = 0;
        while i + 1 < sorted.len() && tpc_to_chromatic_class(sorted[i]) < start_class {
            i += 1;
        }
        sorted.rotate_left(i);
    }
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_names_round_trip() {
        for tpc in -21..=21 {
            let name = NoteName::parse(&tpc_to_note_name(tpc)).unwrap();
            assert_eq!(note_name_to_tpc(&name), tpc);
        }
        assert_eq!(tpc_to_note_name(-2), "Bb");
        assert_eq!(tpc_to_note_name(6), "F#");
        assert_eq!(tpc_to_note_name(-8), "Fb");
    }

    #[test]
    fn test_minor_key_name_has_same_tpc() {
        let a = NoteName::parse("a").unwrap();
        let big_a = NoteName::parse("A").unwrap();
        assert_eq!(note_name_to_tpc(&a), note_name_to_tpc(&big_a));
        assert_eq!(note_name_to_tpc(&NoteName::parse("Ab").unwrap()), -4);
        assert_eq!(note_name_to_tpc(&NoteName::new('b', -1).unwrap()), -2);
    }

    #[test]
    fn test_intervals() {
        assert_eq!(tpc_to_interval(0), "P1");
        assert_eq!(tpc_to_interval(-1), "P4");
        assert_eq!(tpc_to_interval(-2), "m7");
        assert_eq!(tpc_to_interval(4), "M3");
        assert_eq!(tpc_to_interval(6), "A4");
        assert_eq!(tpc_to_interval(-6), "D5");
        assert_eq!(tpc_to_interval(13), "AA4");
    }

    #[test]
    fn test_chromatic_class_is_periodic() {
        for tpc in -30..30 {
            assert_eq!(tpc_to_chromatic_class(tpc), tpc_to_chromatic_class(tpc + 12));
            assert!((0..12).contains(&tpc_to_chromatic_class(tpc)));
        }
        assert_eq!(tpc_to_chromatic_class(1), 7);
        assert_eq!(tpc_to_chromatic_class(-1), 5);
    }

    #[test]
    fn test_scale_degrees_and_numerals() {
        assert_eq!(tpc_to_scale_degree(-2, false), "b7");
        assert_eq!(tpc_to_scale_degree(-2, true), "7");
        assert_eq!(tpc_to_scale_degree(-3, true), "3");
        assert_eq!(tpc_to_roman_numeral(-2, false, false), "bVII");
        assert_eq!(tpc_to_roman_numeral(-2, true, false), "VII");
        assert_eq!(tpc_to_roman_numeral(2, false, true), "ii");
        assert_eq!(tpc_to_roman_numeral(1, false, true), "V");
        assert_eq!(tpc_to_roman_numeral(6, false, false), "#IV");
    }

    #[test]
    fn test_numeral_offset_round_trip() {
        for minor in [false, true] {
            for tpc in -14..=14 {
                let numeral = RomanNumeral::parse(&tpc_to_roman_numeral(tpc, minor, false)).unwrap();
                assert_eq!(roman_numeral_to_tpc_offset(&numeral, minor), tpc);
            }
        }
    }

    #[test]
    fn test_sort_by_keyboard_position() {
        // C E G Bb from Bb
        assert_eq!(sort_by_keyboard_position(&[0, 4, 1, -2], None), vec![0, 4, 1, -2]);
        assert_eq!(sort_by_keyboard_position(&[0, 4, 1, -2], Some(-2)), vec![-2, 0, 4, 1]);
        // Enharmonic ties: higher tpc first
        assert_eq!(sort_by_keyboard_position(&[-4, 8], None), vec![8, -4]);
        assert!(sort_by_keyboard_position(&[], Some(0)).is_empty());
    }

    #[test]
    fn test_sort_rotation_stays_in_range() {
        // start above every element: begins on the last one
        assert_eq!(sort_by_keyboard_position(&[0, 2, 4], Some(5)), vec![4, 0, 2]);
        assert_eq!(sort_by_keyboard_position(&[1], Some(5)), vec![1]);
        assert_eq!(sort_by_keyboard_position(&[0, 4, 1], Some(0)), vec![0, 4, 1]);
    }
}
