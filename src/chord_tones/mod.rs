//! Chord-tone computation
//!
//! `calculator` derives the tones of one chord; `cache` memoizes them by
//! feature tuple so a corpus computes each distinct chord once.

pub mod cache;
pub mod calculator;

pub use cache::{ToneCache, ToneKey};
pub use calculator::{chord_tones, ToneResult};
