//! Global and local key propagation
//!
//! A piece declares its global key once (conventionally on the first label)
//! and changes local key by prefixing a label with `degree.`. Every label
//! receives the global key and the most recent local key; before the first
//! explicit local key, the tonic of the global key applies.

use crate::models::chord::ParsedLabel;
use crate::models::degree::{NoteName, RomanNumeral};
use crate::models::errors::PieceError;

/// Find the single global key of a piece
///
/// Restating the same key is accepted; two different keys are an error.
pub fn find_global_key(piece: &str, labels: &[Option<&ParsedLabel>]) -> Result<NoteName, PieceError> {
    let mut declared = labels
        .iter()
        .enumerate()
        .filter_map(|(i, label)| label.and_then(|l| l.globalkey).map(|key| (i, key)));

    let (first_index, key) = declared.next().ok_or_else(|| PieceError::MissingGlobalKey {
        piece: piece.to_string(),
    })?;

    for (index, other) in declared {
        if other != key {
            return Err(PieceError::MultipleGlobalKeys {
                piece: piece.to_string(),
                first: key.to_string(),
                second: other.to_string(),
            });
        }
        log::info!("{}: global key {} restated at label {}", piece, other, index);
    }
    if first_index > 0 {
        log::warn!(
            "{}: global key is not specified in the first label. Using '{}' from label {}",
            piece,
            key,
            first_index
        );
    }
    Ok(key)
}

/// Forward-fill local keys, starting from the tonic of the global key
pub fn propagate_local_keys(globalkey: &NoteName, labels: &[Option<&ParsedLabel>]) -> Vec<RomanNumeral> {
    labels
        .iter()
        .scan(RomanNumeral::tonic(globalkey.is_minor()), |current, label| {
            if let Some(key) = label.and_then(|l| l.localkey) {
                *current = key;
            }
            Some(*current)
        })
        .collect()
}
