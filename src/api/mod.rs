//! DCML harmony WASM API
//!
//! This module provides the JavaScript-facing API for label expansion.
//!
//! # Module Structure
//!
//! - `helpers`: Shared utilities for serialization and error handling
//! - `core`: Piece and corpus expansion plus the shared tone cache
//! - `labels`: Single-label parsing, chord types, chord tones and tone rendering

pub mod core;
pub mod helpers;
pub mod labels;

// Re-export all public functions to keep one flat API
pub use self::core::*;
pub use labels::{chord_tones_js, chord_type, parse_label_js, render_tones};
