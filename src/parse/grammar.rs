//! Recursive descent parser with production rules
//!
//! One production per label component, applied in the fixed order
//!
//! ```text
//! label    := ["."] [globalkey "."] [localkey "."] [chordgrp] [phrase]
//! chordgrp := [pedal "["] chord ["]"]
//! chord    := numeral [form] [figbass] ["(" change+ ")"] ["/" degree ("/" degree)*]
//! ```
//!
//! Optional productions save the cursor and restore it when they do not
//! match, so `b.I` reads as a B-minor global key while `bVII` reads as a
//! numeral. Alternatives inside a production are tried longest first.

use crate::models::chord::{Change, ChangePrefix, Chord, Figbass, Form, Numeral, ParsedLabel, PhraseEnd, SpecialChord, NO_CHORD};
use crate::models::degree::{NoteName, RomanNumeral, ROMAN_LOWER, ROMAN_UPPER};
use crate::models::errors::GrammarError;

/// Roman numeral steps, longest spelling first
const ROMAN_BY_LENGTH: [usize; 7] = [6, 2, 5, 3, 1, 4, 0];

const FORMS: [(&str, Form); 5] = [
    ("+M", Form::AugmentedMajorSeventh),
    ("%", Form::HalfDiminished),
    ("o", Form::Diminished),
    ("+", Form::Augmented),
    ("M", Form::MajorSeventh),
];

const FIGURES: [(&str, Figbass); 7] = [
    ("65", Figbass::SixFive),
    ("64", Figbass::SixFour),
    ("43", Figbass::FourThree),
    ("42", Figbass::Two),
    ("7", Figbass::Seven),
    ("6", Figbass::Six),
    ("2", Figbass::Two),
];

const PHRASE_ENDS: [(&str, PhraseEnd); 4] = [
    ("\\\\", PhraseEnd::Break),
    ("}{", PhraseEnd::EndAndStart),
    ("{", PhraseEnd::Start),
    ("}", PhraseEnd::End),
];

/// Input position over one label
struct Cursor<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.text[self.pos..]
    }

    fn at_end(&self) -> bool {
        self.pos >= self.text.len()
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn eat(&mut self, literal: &str) -> bool {
        if self.rest().starts_with(literal) {
            self.pos += literal.len();
            true
        } else {
            false
        }
    }

    /// Consume the first matching literal of a table
    fn eat_one_of<T: Copy>(&mut self, table: &[(&str, T)]) -> Option<T> {
        table
            .iter()
            .find(|(literal, _)| self.rest().starts_with(literal))
            .map(|&(literal, value)| {
                self.pos += literal.len();
                value
            })
    }

    /// A run of `#` or a run of `b`, as a signed count
    fn accidentals(&mut self) -> i32 {
        match self.peek() {
            Some(c @ ('#' | 'b')) => {
                let run = self.rest().chars().take_while(|&ch| ch == c).count();
                self.pos += run;
                if c == '#' {
                    run as i32
                } else {
                    -(run as i32)
                }
            }
            _ => 0,
        }
    }

    fn unexpected(&self, label: &str) -> GrammarError {
        GrammarError::Unexpected {
            label: label.to_string(),
            offset: self.pos,
            found: self.peek().map(String::from).unwrap_or_default(),
        }
    }
}

// ============================================================================
// Production Rules
// ============================================================================

/// Bare Roman numeral I-VII / i-vii
fn roman(cursor: &mut Cursor) -> Option<(u8, bool)> {
    for step in ROMAN_BY_LENGTH {
        if cursor.eat(ROMAN_UPPER[step]) {
            return Some((step as u8, false));
        }
        if cursor.eat(ROMAN_LOWER[step]) {
            return Some((step as u8, true));
        }
    }
    None
}

/// Accidentals followed by a Roman numeral
fn degree(cursor: &mut Cursor) -> Option<RomanNumeral> {
    let start = cursor.pos;
    let accidentals = cursor.accidentals();
    match roman(cursor) {
        Some((step, lowercase)) => Some(RomanNumeral::new(accidentals, step, lowercase)),
        None => {
            cursor.pos = start;
            None
        }
    }
}

/// `degree` followed by a terminator, or nothing consumed
fn degree_before(cursor: &mut Cursor, terminator: &str) -> Option<RomanNumeral> {
    let start = cursor.pos;
    if let Some(rn) = degree(cursor) {
        if cursor.eat(terminator) {
            return Some(rn);
        }
    }
    cursor.pos = start;
    None
}

/// Note name followed by `.`
fn global_key(cursor: &mut Cursor) -> Option<NoteName> {
    let start = cursor.pos;
    let letter = cursor.peek().filter(|c| matches!(c.to_ascii_uppercase(), 'A'..='G'))?;
    cursor.pos += letter.len_utf8();
    let accidentals = cursor.accidentals();
    if cursor.eat(".") {
        NoteName::new(letter, accidentals).ok()
    } else {
        cursor.pos = start;
        None
    }
}

fn numeral(cursor: &mut Cursor) -> Option<Numeral> {
    if cursor.eat(NO_CHORD) {
        return Some(Numeral::NoChord);
    }
    for special in SpecialChord::ALL {
        if cursor.eat(special.as_str()) {
            return Some(Numeral::Special(special));
        }
    }
    degree(cursor).map(Numeral::Degree)
}

/// One change token: `[+|^] accidentals step`, where `1` followed by a
/// digit forms a two-digit step
fn change(cursor: &mut Cursor) -> Option<Change> {
    let start = cursor.pos;
    let prefix = if cursor.eat("+") {
        ChangePrefix::Add
    } else if cursor.eat("^") {
        ChangePrefix::Caret
    } else {
        ChangePrefix::Plain
    };
    let accidentals = cursor.accidentals();
    let rest = cursor.rest().as_bytes();
    let width = match rest {
        [b'1', second, ..] if second.is_ascii_digit() => 2,
        [first, ..] if first.is_ascii_digit() => 1,
        _ => {
            cursor.pos = start;
            return None;
        }
    };
    let digits = &cursor.rest()[..width];
    cursor.pos += width;
    let step = digits.parse::<u8>().ok()?;
    Some(Change::new(prefix, accidentals, step))
}

/// `(` change+ `)`
fn changes(cursor: &mut Cursor, label: &str) -> Result<Vec<Change>, GrammarError> {
    if !cursor.eat("(") {
        return Ok(Vec::new());
    }
    let mut parsed = Vec::new();
    while let Some(token) = change(cursor) {
        parsed.push(token);
    }
    if parsed.is_empty() || !cursor.eat(")") {
        return Err(cursor.unexpected(label));
    }
    Ok(parsed)
}

/// `/` degree (`/` degree)*
fn relative_root(cursor: &mut Cursor, label: &str) -> Result<Vec<RomanNumeral>, GrammarError> {
    let mut chain = Vec::new();
    while cursor.eat("/") {
        match degree(cursor) {
            Some(rn) => chain.push(rn),
            None => return Err(cursor.unexpected(label)),
        }
    }
    Ok(chain)
}

fn chord(cursor: &mut Cursor, label: &str) -> Result<Option<Chord>, GrammarError> {
    let numeral = match numeral(cursor) {
        Some(numeral) => numeral,
        None => return Ok(None),
    };
    let form = cursor.eat_one_of(&FORMS);
    let figbass = cursor.eat_one_of(&FIGURES);
    let changes = changes(cursor, label)?;
    let relativeroot = relative_root(cursor, label)?;
    Ok(Some(Chord {
        numeral,
        form,
        figbass,
        changes,
        relativeroot,
        special: None,
    }))
}

/// Parse one label (no alternatives) into its features
pub fn parse_label_grammar(label: &str) -> Result<ParsedLabel, GrammarError> {
    log::debug!("parse_label_grammar('{}')", label);
    let mut cursor = Cursor::new(label);
    let mut parsed = ParsedLabel::default();

    cursor.eat(".");
    parsed.globalkey = global_key(&mut cursor);
    parsed.localkey = degree_before(&mut cursor, ".");

    let group_start = cursor.pos;
    parsed.pedal = degree_before(&mut cursor, "[");
    parsed.chord = chord(&mut cursor, label)?;
    if parsed.chord.is_some() {
        parsed.pedal_end = cursor.eat("]");
    } else if parsed.pedal.is_some() {
        // a pedal bracket only exists around a chord
        cursor.pos = group_start;
        return Err(cursor.unexpected(label));
    }

    parsed.phrase_end = cursor.eat_one_of(&PHRASE_ENDS);

    if !cursor.at_end() {
        return Err(cursor.unexpected(label));
    }
    if parsed.chord.is_none() && parsed.phrase_end.is_none() {
        return Err(GrammarError::MissingNumeral {
            label: label.to_string(),
        });
    }
    Ok(parsed)
}
