//! ASS document scanning: which font families does one subtitle file use?

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;

// Braces do not nest in ASS override syntax, so a negated character class
// is exact.
static OVERRIDE_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([^}]*)\}").expect("override block pattern"));

// The font name after \fn runs to the next backslash or closing brace.
static FN_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"\\fn([^\\}]+)").expect("fn tag pattern"));

/// Collect every font family the document references.
///
/// Two channels feed the result. `Style:` lines inside the `[V4+ Styles]`
/// section contribute the field at the position a `Format:` line announced
/// for `Fontname`, falling back to the second field when no column has been
/// announced. `Dialogue:` lines anywhere in the document contribute every
/// `\fn` override found inside their `{...}` blocks. Malformed lines are
/// skipped; this function never fails.
pub fn extract_fonts(text: &str) -> BTreeSet<String> {
    let mut fonts = BTreeSet::new();
    let mut in_styles = false;
    // Deliberately not reset on section changes: a styles section without
    // its own Format: line reuses the last announced column, and the
    // second-field fallback applies per Style: line until one is seen.
    let mut font_col: Option<usize> = None;

    for raw in text.lines() {
        let line = raw.trim();

        if line.starts_with('[') {
            in_styles = line.eq_ignore_ascii_case("[v4+ styles]");
            continue;
        }

        if in_styles {
            if let Some(rest) = strip_keyword(line, "format:") {
                let cols: Vec<String> = rest.split(',').map(|c| c.trim().to_lowercase()).collect();
                if let Some(idx) = cols.iter().position(|c| c == "fontname") {
                    font_col = Some(idx);
                }
                continue;
            }
            if let Some(rest) = strip_keyword(line, "style:") {
                let vals: Vec<&str> = rest.split(',').map(str::trim).collect();
                let field = match font_col {
                    // Out of range records nothing from this line.
                    Some(idx) => vals.get(idx),
                    None => vals.get(1),
                };
                if let Some(name) = field {
                    insert_nonempty(&mut fonts, name);
                }
                continue;
            }
        }

        if strip_keyword(line, "dialogue:").is_some() {
            for block in OVERRIDE_BLOCK.captures_iter(line) {
                for tag in FN_TAG.captures_iter(&block[1]) {
                    insert_nonempty(&mut fonts, &tag[1]);
                }
            }
        }
    }

    fonts
}

/// Case-insensitive keyword match at the start of a line; returns the text
/// after the keyword.
fn strip_keyword<'a>(line: &'a str, keyword: &str) -> Option<&'a str> {
    if line.len() < keyword.len() || !line.is_char_boundary(keyword.len()) {
        return None;
    }
    let (head, tail) = line.split_at(keyword.len());
    head.eq_ignore_ascii_case(keyword).then_some(tail)
}

fn insert_nonempty(fonts: &mut BTreeSet<String>, name: &str) {
    let trimmed = name.trim();
    if !trimmed.is_empty() {
        fonts.insert(trimmed.to_string());
    }
}
