// Key and pedal propagation across a piece

use dcml_harmony::models::{ParsedLabel, PieceError};
use dcml_harmony::parse::parse_label;
use dcml_harmony::propagation::propagate;

fn parse_all(labels: &[&str]) -> Vec<Option<ParsedLabel>> {
    labels.iter().map(|l| parse_label(l).ok()).collect()
}

fn contexts(labels: &[&str], relative_pedal: bool) -> Result<Vec<dcml_harmony::Context>, PieceError> {
    let parsed = parse_all(labels);
    let refs: Vec<Option<&ParsedLabel>> = parsed.iter().map(Option::as_ref).collect();
    propagate("piece", &refs, relative_pedal)
}

#[test]
fn test_local_key_forward_fill() {
    // global key only on label 1, local keys only on labels 1 and 5
    let labels = [".D.I.I", "IV", "V7", "I", "V.I", "ii", "V7", "I"];
    let result = contexts(&labels, true).unwrap();
    let keys: Vec<String> = result.iter().map(|c| c.localkey.to_string()).collect();
    assert_eq!(keys, vec!["I", "I", "I", "I", "V", "V", "V", "V"]);
    assert!(result.iter().all(|c| c.globalkey.to_string() == "D"));
}

#[test]
fn test_first_local_key_defaults_to_tonic_of_global_mode() {
    let result = contexts(&[".e.V", "i"], true).unwrap();
    assert_eq!(result[0].localkey.to_string(), "i");
    assert!(result[0].localkey_is_minor);
    assert!(result[0].globalkey_is_minor);
}

#[test]
fn test_two_global_keys_fail() {
    let err = contexts(&[".C.I", "V", ".G.I"], true).unwrap_err();
    assert!(matches!(err, PieceError::MultipleGlobalKeys { .. }));
    assert_eq!(err.piece(), "piece");
}

#[test]
fn test_missing_global_key_fails() {
    assert!(matches!(
        contexts(&["I", "V"], true),
        Err(PieceError::MissingGlobalKey { .. })
    ));
}

#[test]
fn test_unclosed_pedal_fails() {
    assert_eq!(
        contexts(&[".C.I", "V[I", "IV64", "I"], true).unwrap_err(),
        PieceError::UnbalancedPedal {
            piece: "piece".to_string(),
            opened: 1,
            closed: 0,
        }
    );
}

#[test]
fn test_pedal_closes_on_label_opening_the_next() {
    // first bracket ends on "V[IV]", which also opens the second
    let labels = [".C.I", "I[I", "V7", "V[IV]", "IV", "I]"];
    let result = contexts(&labels, true).unwrap();
    let pedals: Vec<Option<String>> = result.iter().map(|c| c.pedal.map(|p| p.to_string())).collect();
    assert_eq!(
        pedals,
        vec![
            None,
            Some("I".into()),
            Some("I".into()),
            Some("IV".into()),
            Some("IV".into()),
            Some("IV".into()),
        ]
    );
}

#[test]
fn test_pedal_keeps_pitch_across_modulation() {
    // G pedal in C major (V), continuing after a move to G major, where it is I
    let labels = [".C.I", "V[I", "V.V7", "I]", "IV"];
    let result = contexts(&labels, true).unwrap();
    let pedals: Vec<Option<String>> = result.iter().map(|c| c.pedal.map(|p| p.to_string())).collect();
    assert_eq!(
        pedals,
        vec![None, Some("V".into()), Some("I".into()), Some("I".into()), None]
    );

    let literal = contexts(&labels, false).unwrap();
    assert_eq!(literal[2].pedal.unwrap().to_string(), "V");
}

#[test]
fn test_pedal_in_minor_global_key() {
    // c minor: pedal i held into III (Eb major), where C is vi
    let labels = [".c.i", "i[i", "III.V7", "I]"];
    let result = contexts(&labels, true).unwrap();
    assert_eq!(result[2].pedal.unwrap().to_string(), "vi");
}
