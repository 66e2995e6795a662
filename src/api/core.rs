//! WASM API for piece expansion
//!
//! One tone cache lives for the lifetime of the module and is shared by
//! every call, so repeated chords across pieces are computed once.

use lazy_static::lazy_static;
use wasm_bindgen::prelude::*;

use crate::api::helpers::{deserialize, deserialize_or_default, js_error, serialize};
use crate::chord_tones::ToneCache;
use crate::expand::{expand_corpus, expand_piece, ExpandOptions, Piece};

// WASM-owned chord tone cache
lazy_static! {
    pub(crate) static ref TONE_CACHE: ToneCache = ToneCache::new();
}

/// Expand a piece given as a plain list of label strings in score order
///
/// # Parameters
/// * `piece_id` - Name reported in errors
/// * `labels` - Array of label strings
/// * `options` - `ExpandOptions` object, or undefined for defaults
#[wasm_bindgen(js_name = expandLabels)]
pub fn expand_labels(piece_id: &str, labels: JsValue, options: JsValue) -> Result<JsValue, JsValue> {
    let labels: Vec<String> = deserialize(labels, "Invalid label list")?;
    let options: ExpandOptions = deserialize_or_default(options, "Invalid expand options")?;
    log::info!("expandLabels called: {} ({} labels)", piece_id, labels.len());

    let piece = Piece::from_texts(piece_id, &labels);
    let expansion = expand_piece(&piece, &options, &TONE_CACHE).map_err(|e| js_error("Expansion failed", e))?;
    serialize(&expansion, "Failed to serialize expansion")
}

/// Expand a piece whose labels carry score positions
///
/// The piece object is `{ id, labels: [{ position: { mc, onset: [num, den] }, label }] }`.
#[wasm_bindgen(js_name = expandPiece)]
pub fn expand_piece_js(piece: JsValue, options: JsValue) -> Result<JsValue, JsValue> {
    let piece: Piece = deserialize(piece, "Invalid piece")?;
    let options: ExpandOptions = deserialize_or_default(options, "Invalid expand options")?;

    let expansion = expand_piece(&piece, &options, &TONE_CACHE).map_err(|e| js_error("Expansion failed", e))?;
    serialize(&expansion, "Failed to serialize expansion")
}

/// JSON in, JSON out variant of `expandPiece`
#[wasm_bindgen(js_name = expandPieceJson)]
pub fn expand_piece_json(piece_json: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let piece: Piece = serde_json::from_str(piece_json).map_err(|e| js_error("Invalid piece JSON", e))?;
    let options: ExpandOptions = match options_json {
        Some(json) => serde_json::from_str(&json).map_err(|e| js_error("Invalid options JSON", e))?,
        None => ExpandOptions::default(),
    };

    let expansion = expand_piece(&piece, &options, &TONE_CACHE).map_err(|e| js_error("Expansion failed", e))?;
    expansion.to_json().map_err(|e| js_error("Failed to serialize expansion", e))
}

/// Expand several pieces; failed pieces come back as `{ error }` entries
#[wasm_bindgen(js_name = expandCorpus)]
pub fn expand_corpus_js(pieces: JsValue, options: JsValue) -> Result<JsValue, JsValue> {
    let pieces: Vec<Piece> = deserialize(pieces, "Invalid piece list")?;
    let options: ExpandOptions = deserialize_or_default(options, "Invalid expand options")?;

    let results: Vec<serde_json::Value> = expand_corpus(&pieces, &options, &TONE_CACHE)
        .into_iter()
        .map(|result| match result {
            Ok(expansion) => serde_json::to_value(expansion),
            Err(e) => Ok(serde_json::json!({ "piece": e.piece(), "error": e.to_string() })),
        })
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| js_error("Failed to serialize corpus", e))?;
    serialize(&results, "Failed to serialize corpus")
}

/// Number of distinct chords in the shared tone cache
#[wasm_bindgen(js_name = toneCacheSize)]
pub fn tone_cache_size() -> usize {
    TONE_CACHE.len()
}

#[wasm_bindgen(js_name = clearToneCache)]
pub fn clear_tone_cache() {
    log::info!("clearToneCache called ({} entries)", TONE_CACHE.len());
    TONE_CACHE.clear();
}
