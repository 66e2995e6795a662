//! Memo cache for chord tones
//!
//! Keyed by the features the calculator reads. Lookups take the read lock;
//! a miss computes outside any lock and inserts under the write lock, so two
//! workers missing on the same key both compute and the later insert wins.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::chord_tones::calculator::{chord_tones, ToneResult};
use crate::models::chord::{Change, Chord, Figbass, Form, Numeral};
use crate::models::degree::RomanNumeral;
use crate::models::errors::LabelError;

/// Everything chord-tone computation depends on
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ToneKey {
    pub numeral: Numeral,
    pub form: Option<Form>,
    pub figbass: Option<Figbass>,
    pub changes: Vec<Change>,
    pub relativeroot: Vec<RomanNumeral>,
    pub minor: bool,
}

impl ToneKey {
    pub fn new(chord: &Chord, minor: bool) -> Self {
        Self {
            numeral: chord.numeral,
            form: chord.form,
            figbass: chord.figbass,
            changes: chord.changes.clone(),
            relativeroot: chord.relativeroot.clone(),
            minor,
        }
    }
}

#[derive(Debug, Default)]
pub struct ToneCache {
    entries: RwLock<HashMap<ToneKey, Arc<ToneResult>>>,
}

impl ToneCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached tones of `chord` in a local key of the given mode
    ///
    /// Errors and the no-chord marker are not cached.
    pub fn get_or_compute(&self, chord: &Chord, minor: bool) -> Result<Option<Arc<ToneResult>>, LabelError> {
        let key = ToneKey::new(chord, minor);
        if let Some(hit) = self.read().get(&key) {
            return Ok(Some(Arc::clone(hit)));
        }
        let computed = match chord_tones(chord, minor)? {
            Some(result) => Arc::new(result),
            None => return Ok(None),
        };
        self.write().insert(key, Arc::clone(&computed));
        Ok(Some(computed))
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    pub fn clear(&self) {
        self.write().clear();
    }

    // Values are complete before insertion, so a poisoned map is still valid
    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<ToneKey, Arc<ToneResult>>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<ToneKey, Arc<ToneResult>>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }
}
