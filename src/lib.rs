//! DCML Harmony WASM Module
//!
//! Expands DCML harmony labels (`.C.I`, `V7/V`, `ii%65(4)`, `I[V]`) into
//! resolved chords: parsed features, propagated global key, local key and
//! pedal, chord types, and chord tones as tonal pitch classes on the line of
//! fifths.

pub mod api;
pub mod chord_tones;
pub mod expand;
pub mod models;
pub mod parse;
pub mod propagation;
pub mod transposition;

// Re-export commonly used types
pub use chord_tones::{ToneCache, ToneResult};
pub use expand::{
    expand_corpus, expand_piece, ChordLabel, ExpandOptions, LabelRecord, Piece, PieceExpansion,
    ToneFrame,
};
pub use models::*;
pub use parse::parse_label;

use wasm_bindgen::prelude::*;

// This is like the `main` function, but for WASM modules.
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    #[cfg(feature = "console_log")]
    {
        if console_log::init_with_level(log::Level::Info).is_err() {
            log::warn!("Logger was already initialized");
        }
    }

    log::info!("DCML harmony WASM module initialized");
}
