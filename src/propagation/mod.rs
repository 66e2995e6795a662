//! Key and pedal propagation across the labels of one piece
//!
//! Labels must be given in score order. Unparsable labels are passed as
//! `None`: they declare nothing but still receive the context of their
//! position.

pub mod keys;
pub mod pedal;

pub use keys::{find_global_key, propagate_local_keys};
pub use pedal::{pedal_spans, propagate_pedal, PedalSpan};

use crate::models::chord::ParsedLabel;
use crate::models::context::Context;
use crate::models::errors::PieceError;

/// Resolve global key, local key and pedal for every label of a piece
pub fn propagate(
    piece: &str,
    labels: &[Option<&ParsedLabel>],
    relative_pedal: bool,
) -> Result<Vec<Context>, PieceError> {
    let globalkey = find_global_key(piece, labels)?;
    let localkeys = propagate_local_keys(&globalkey, labels);
    let pedals = propagate_pedal(piece, labels, &localkeys, globalkey.is_minor(), relative_pedal)?;

    log::debug!("{}: propagated context over {} labels in {}", piece, labels.len(), globalkey);

    Ok(localkeys
        .into_iter()
        .zip(pedals)
        .map(|(localkey, pedal)| Context::new(globalkey, localkey, pedal))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_label;

    #[test]
    fn test_every_label_gets_context() {
        let parsed: Vec<Option<ParsedLabel>> = [".a.i", "V7", "not a label", "III.V", "I"]
            .iter()
            .map(|l| parse_label(l).ok())
            .collect();
        let refs: Vec<Option<&ParsedLabel>> = parsed.iter().map(Option::as_ref).collect();
        let contexts = propagate("p", &refs, true).unwrap();

        assert_eq!(contexts.len(), 5);
        assert!(contexts.iter().all(|c| c.globalkey.to_string() == "a"));
        assert!(contexts[2].localkey_is_minor);
        assert_eq!(contexts[3].localkey.to_string(), "III");
        assert!(!contexts[4].localkey_is_minor);
        assert!(contexts[4].globalkey_is_minor);
    }
}
