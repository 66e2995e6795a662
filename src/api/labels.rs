//! WASM API for single labels and tone rendering

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::api::core::TONE_CACHE;
use crate::api::helpers::{deserialize_or_default, js_error, serialize};
use crate::models::{ChordTones, ChordType, ParsedLabel, ToneLayout, ToneNotation, ToneWarning, Tpc};
use crate::parse::{parse_label, split_alternatives};

/// Parsed features of one label (the primary reading when alternatives are given)
#[wasm_bindgen(js_name = parseLabel)]
pub fn parse_label_js(label: &str) -> Result<JsValue, JsValue> {
    let (primary, _) = split_alternatives(label);
    let parsed: ParsedLabel = parse_label(primary).map_err(|e| js_error("Invalid label", e))?;
    serialize(&parsed, "Failed to serialize label")
}

/// Chord type string (`"Mm7"`, `"%7"`, ...) or undefined when the label has none
#[wasm_bindgen(js_name = chordType)]
pub fn chord_type(label: &str) -> Result<Option<String>, JsValue> {
    let parsed = parse_label(split_alternatives(label).0).map_err(|e| js_error("Invalid label", e))?;
    Ok(parsed
        .chord
        .as_ref()
        .and_then(ChordType::from_chord)
        .map(|t| t.to_string()))
}

#[derive(Serialize)]
struct LabelTones {
    tones: ChordTones,
    warnings: Vec<ToneWarning>,
}

/// Chord tones of a label relative to its local tonic
///
/// # Parameters
/// * `label` - A chord label; key prefixes are ignored
/// * `minor` - Mode of the local key
/// * `layout` - `"separate"`, `"merged"` or `"bass_only"`, default separate
#[wasm_bindgen(js_name = chordTones)]
pub fn chord_tones_js(label: &str, minor: bool, layout: JsValue) -> Result<JsValue, JsValue> {
    let layout: ToneLayout = deserialize_or_default(layout, "Invalid tone layout")?;
    let parsed = parse_label(split_alternatives(label).0).map_err(|e| js_error("Invalid label", e))?;
    let chord = match parsed.chord {
        Some(chord) => chord,
        None => return Ok(JsValue::UNDEFINED),
    };

    match TONE_CACHE.get_or_compute(&chord, minor) {
        Ok(Some(result)) => serialize(
            &LabelTones {
                tones: result.tones.arrange(layout),
                warnings: result.warnings.clone(),
            },
            "Failed to serialize chord tones",
        ),
        Ok(None) => Ok(JsValue::UNDEFINED),
        Err(e) => Err(js_error("Cannot compute chord tones", e)),
    }
}

/// Render tpcs in another notation
///
/// `notation` is e.g. `{ kind: "note_name" }` or
/// `{ kind: "roman_numeral", minor: false, auto_case: true }`.
#[wasm_bindgen(js_name = renderTones)]
pub fn render_tones(tpcs: Vec<Tpc>, notation: JsValue) -> Result<js_sys::Array, JsValue> {
    let notation: ToneNotation = deserialize_or_default(notation, "Invalid tone notation")?;
    Ok(notation.render_all(&tpcs).into_iter().map(JsValue::from).collect())
}
