// src/extractors/normalize.rs
use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\s+").expect("Failed to compile WHITESPACE_RE")
});

// "(1)", "(12)", "(a)", "(B)"
static FOOTNOTE_MARKER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\(\s*(?:\d+|[A-Za-z])\s*\)").expect("Failed to compile FOOTNOTE_MARKER_RE")
});

/// Cleans the raw text of a name cell: strips footnote markers and
/// collapses whitespace. Idempotent.
pub fn normalize_name(raw: &str) -> String {
    let mut text = raw.to_string();
    // Loop to a fixpoint so nested markers like "(1(2))" cannot survive one pass.
    loop {
        let stripped = FOOTNOTE_MARKER_RE.replace_all(&text, " ");
        if stripped == text {
            break;
        }
        text = stripped.into_owned();
    }

    WHITESPACE_RE.replace_all(&text, " ").trim().to_string()
}
