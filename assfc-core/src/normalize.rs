//! Family-name normalization for installed-font lookups.

/// Reduce a family name to its comparable form: surrounding whitespace
/// trimmed, interior whitespace runs collapsed to a single space, Unicode
/// lowercase. Used only for equality and lookups; display always keeps the
/// original spelling.
pub fn normalize_family(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for (i, word) in name.split_whitespace().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        for ch in word.chars() {
            out.extend(ch.to_lowercase());
        }
    }
    out
}
