pub mod global;
pub mod keys;

pub use global::{change_intervals, to_absolute_pitch, to_global_frame, transpose_changes, GlobalChord};
pub use keys::{absolute_to_relative_key, relative_to_absolute_key, resolve_relative_keys};
