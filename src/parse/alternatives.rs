//! Alternative readings written as `primary-alternative`

/// Split a label on `-` into the primary reading and an optional alternative
///
/// Only the first two readings are kept.
pub fn split_alternatives(label: &str) -> (&str, Option<&str>) {
    let mut parts = label.split('-');
    let primary = parts.next().unwrap_or_default();
    let alternative = parts.next();
    let ignored: Vec<&str> = parts.collect();
    if !ignored.is_empty() {
        log::warn!(
            "More than two alternatives are not taken into account: '{}' drops {:?}",
            label,
            ignored
        );
    }
    (primary, alternative)
}
