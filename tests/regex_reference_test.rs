// The hand-written parser agrees with the published DCML regular expression
#![cfg(feature = "regex")]

use dcml_harmony::parse::parse_label_grammar;
use dcml_harmony::parse::reference::reference_features;

const LABELS: &[&str] = &[
    ".C.I",
    ".f#.i.V7",
    "bb.I",
    "V65(+#7b9)/V/iv",
    "vi.bVII[V43]",
    "I]",
    "ii%65(4)",
    "#viio7/V",
    "III+M7",
    "It6",
    "Ger65",
    "Fr43/V",
    "@none",
    "IV(94)",
    "V(b13)",
    "I\\\\",
    "V}{",
    "{",
];

#[test]
fn test_grammar_matches_reference_regex() {
    for label in LABELS {
        let parsed = parse_label_grammar(label).unwrap_or_else(|e| panic!("{}: {}", label, e));
        let reference = reference_features(label).unwrap_or_else(|| panic!("regex rejects {}", label));

        assert_eq!(parsed.globalkey.map(|k| k.to_string()), reference.globalkey, "{}", label);
        assert_eq!(parsed.localkey.map(|k| k.to_string()), reference.localkey, "{}", label);
        assert_eq!(parsed.pedal.map(|k| k.to_string()), reference.pedal, "{}", label);
        assert_eq!(parsed.pedal_end, reference.pedal_end, "{}", label);
        assert_eq!(parsed.phrase_end.map(|p| p.to_string()), reference.phrase_end, "{}", label);

        let chord = parsed.chord.as_ref();
        assert_eq!(chord.map(|c| c.numeral.to_string()), reference.numeral, "{}", label);
        assert_eq!(chord.and_then(|c| c.form).map(|f| f.to_string()), reference.form, "{}", label);
        assert_eq!(
            chord.and_then(|c| c.figbass).map(|f| f.to_string()),
            reference.figbass,
            "{}",
            label
        );
        assert_eq!(
            chord.and_then(|c| c.relativeroot_text()),
            reference.relativeroot,
            "{}",
            label
        );
    }
}

#[test]
fn test_both_reject_malformed_labels() {
    for label in ["V7x", "H", "I((4)", "#bV", ".C"] {
        assert!(parse_label_grammar(label).is_err(), "{}", label);
        assert!(reference_features(label).is_none(), "{}", label);
    }
}
