//! Pedal point propagation
//!
//! `I[V7` opens a pedal on I and `V]` closes it. Every label inside the
//! bracket gets the pedal degree. When the local key changes inside a span
//! the degree is re-expressed for each label's local key, so the pedal keeps
//! sounding the same pitch.

use crate::models::chord::ParsedLabel;
use crate::models::degree::RomanNumeral;
use crate::models::errors::PieceError;
use crate::transposition::keys::{absolute_to_relative_key, relative_to_absolute_key};

/// Inclusive label index range of one pedal bracket
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PedalSpan {
    pub start: usize,
    pub end: usize,
    pub pedal: RomanNumeral,
}

/// Pair the k-th opening with the k-th closing
///
/// A bracket closes before or on the label that opens the next one.
pub fn pedal_spans(piece: &str, labels: &[Option<&ParsedLabel>]) -> Result<Vec<PedalSpan>, PieceError> {
    let openings: Vec<(usize, RomanNumeral)> = labels
        .iter()
        .enumerate()
        .filter_map(|(i, label)| label.and_then(|l| l.pedal).map(|pedal| (i, pedal)))
        .collect();
    let closings: Vec<usize> = labels
        .iter()
        .enumerate()
        .filter(|(_, label)| label.map_or(false, |l| l.pedal_end))
        .map(|(i, _)| i)
        .collect();

    let unbalanced = || PieceError::UnbalancedPedal {
        piece: piece.to_string(),
        opened: openings.len(),
        closed: closings.len(),
    };

    if openings.len() != closings.len() {
        return Err(unbalanced());
    }

    let mut spans = Vec::with_capacity(openings.len());
    for (k, (&(start, pedal), &end)) in openings.iter().zip(&closings).enumerate() {
        let next_opening = openings.get(k + 1).map(|&(i, _)| i);
        if end < start || next_opening.map_or(false, |next| end > next) {
            log::error!("{}: pedal opened at label {} is closed at label {}", piece, start, end);
            return Err(unbalanced());
        }
        spans.push(PedalSpan { start, end, pedal });
    }
    Ok(spans)
}

/// Pedal degree of every label, relative to that label's local key
///
/// With `relative == false` the written degree is copied unchanged even when
/// the local key changes inside the span.
pub fn propagate_pedal(
    piece: &str,
    labels: &[Option<&ParsedLabel>],
    localkeys: &[RomanNumeral],
    global_minor: bool,
    relative: bool,
) -> Result<Vec<Option<RomanNumeral>>, PieceError> {
    let mut pedals = vec![None; labels.len()];
    for span in pedal_spans(piece, labels)? {
        let first_key = localkeys[span.start];
        let keys = &localkeys[span.start..=span.end];
        let modulates = keys.iter().any(|k| *k != first_key);

        let absolute = relative_to_absolute_key(&span.pedal, &first_key, global_minor);
        for (slot, key) in pedals[span.start..=span.end].iter_mut().zip(keys) {
            *slot = Some(if !relative || !modulates || *key == first_key {
                span.pedal
            } else {
                absolute_to_relative_key(&absolute, key, global_minor)
            });
        }
        if modulates && relative {
            log::debug!(
                "{}: pedal {} re-expressed across labels {}..={}",
                piece,
                span.pedal,
                span.start,
                span.end
            );
        }
    }
    Ok(pedals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_label;
    use crate::propagation::keys::propagate_local_keys;
    use crate::models::degree::NoteName;

    fn run(labels: &[&str], relative: bool) -> Result<Vec<Option<String>>, PieceError> {
        let parsed: Vec<Option<ParsedLabel>> = labels.iter().map(|l| parse_label(l).ok()).collect();
        let refs: Vec<Option<&ParsedLabel>> = parsed.iter().map(Option::as_ref).collect();
        let keys = propagate_local_keys(&NoteName::c(false), &refs);
        let pedals = propagate_pedal("p", &refs, &keys, false, relative)?;
        Ok(pedals.iter().map(|p| p.map(|d| d.to_string())).collect())
    }

    #[test]
    fn test_pedal_fills_span() {
        let pedals = run(&[".C.I", "I[I", "IV64", "V7]", "I"], true).unwrap();
        assert_eq!(
            pedals,
            vec![None, Some("I".into()), Some("I".into()), Some("I".into()), None]
        );
    }

    #[test]
    fn test_single_label_span() {
        let pedals = run(&[".C.I", "V[I]", "I"], true).unwrap();
        assert_eq!(pedals, vec![None, Some("V".into()), None]);
    }

    #[test]
    fn test_pedal_reexpressed_after_modulation() {
        // C held under a move to F major: I of C is V of IV
        let labels = [".C.I", "I[I", "IV.V7", "I]"];
        assert_eq!(
            run(&labels, true).unwrap(),
            vec![None, Some("I".into()), Some("V".into()), Some("V".into())]
        );
        assert_eq!(
            run(&labels, false).unwrap(),
            vec![None, Some("I".into()), Some("I".into()), Some("I".into())]
        );
    }

    #[test]
    fn test_bracket_closes_where_next_opens() {
        let parsed: Vec<Option<ParsedLabel>> = [".C.I", "I[I", "V7", "V[I]", "IV", "I]"]
            .iter()
            .map(|l| parse_label(l).ok())
            .collect();
        let refs: Vec<Option<&ParsedLabel>> = parsed.iter().map(Option::as_ref).collect();
        let spans = pedal_spans("p", &refs).unwrap();
        assert_eq!(
            spans.iter().map(|s| (s.start, s.end)).collect::<Vec<_>>(),
            vec![(1, 3), (3, 5)]
        );
    }

    #[test]
    fn test_unbalanced_brackets() {
        assert_eq!(
            run(&[".C.I", "I[V", "I"], true),
            Err(PieceError::UnbalancedPedal {
                piece: "p".to_string(),
                opened: 1,
                closed: 0,
            })
        );
        // closed before it opens
        assert!(run(&[".C.I", "V]", "I[I"], true).is_err());
        // second bracket opens before the first closes
        assert!(run(&[".C.I", "I[I", "V[V", "I]", "V]"], true).is_err());
    }
}
