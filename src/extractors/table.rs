// src/extractors/table.rs

// --- Imports ---
use crate::utils::error::ExtractError;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

// --- Constants ---
/// How many elements before a table are searched for its heading.
const HEADING_LOOKBACK: usize = 5;
/// Element names that can carry a section heading in S-1 markup.
const HEADING_TAGS: &[&str] = &["h1", "h2", "h3", "h4", "p", "div", "b", "strong"];

// --- CSS Selectors (Lazy Static) ---
static TABLE_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("table").expect("Failed to compile TABLE_SELECTOR")
});

static ROW_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("tr").expect("Failed to compile ROW_SELECTOR")
});

static CELL_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("td, th").expect("Failed to compile CELL_SELECTOR")
});

// --- Regex Patterns for Text Matching (Lazy Static) ---
static SECTION_HEADER_RE: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)principal\s+(?:and\s+selling\s+)?stockholders",
        r"(?i)security\s+ownership",
        r"(?i)beneficial\s+owner",
        r"(?i)selling\s+stockholders",
        r"(?i)principal\s+shareholders",
    ]
    .iter()
    .filter_map(|pat| Regex::new(pat).ok())
    .collect()
});

// --- Data Structures ---
/// Cell texts of one table row, in column order.
pub type RawRow = Vec<String>;

/// A table plus the evidence used to decide whether it lists stockholders.
#[derive(Debug, Clone)]
pub struct TableCandidate<'a> {
    pub table: ElementRef<'a>,
    pub preceding_text: String,
    pub looks_like_stockholder_table: bool,
}

/// Scores the tables of the document lazily, in document order. Text is only
/// collected for tables the caller actually pulls.
pub fn scan_tables(document: &Html) -> impl Iterator<Item = TableCandidate<'_>> {
    // Pre-order element list, so "previous elements" matches reading order.
    let elements: Vec<ElementRef> = document
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .collect();

    (0..elements.len()).filter_map(move |idx| {
        TABLE_SELECTOR
            .matches(&elements[idx])
            .then(|| score_table(&elements, idx))
    })
}

fn score_table<'a>(elements: &[ElementRef<'a>], idx: usize) -> TableCandidate<'a> {
    let table = elements[idx];
    let preceding_text = elements[idx.saturating_sub(HEADING_LOOKBACK)..idx]
        .iter()
        .rev()
        .find(|prev| HEADING_TAGS.contains(&prev.value().name()))
        .map(|prev| clean_text(*prev).to_lowercase())
        .unwrap_or_default();

    let table_text = clean_text(table).to_lowercase();

    let header_hit = SECTION_HEADER_RE
        .iter()
        .any(|re| re.is_match(&table_text) || re.is_match(&preceding_text));
    let column_hit = table_text.contains("beneficial")
        && (table_text.contains("shares") || table_text.contains("percent"));

    TableCandidate {
        table,
        preceding_text,
        looks_like_stockholder_table: header_hit || column_hit,
    }
}

/// Returns the data rows of the first stockholder table in the document.
///
/// Only the first qualifying table is considered. Its header row is the first
/// row naming "name" with "shares"/"percent", or "beneficial owner"; every row
/// after it is data.
pub fn locate_stockholder_rows(markup: &str) -> Result<Vec<RawRow>, ExtractError> {
    let document = Html::parse_document(markup);

    let candidate = scan_tables(&document)
        .find(|c| c.looks_like_stockholder_table)
        .ok_or(ExtractError::TableNotFound)?;

    tracing::debug!(
        "Selected stockholder table (preceding text: '{}')",
        truncate(&candidate.preceding_text, 80)
    );

    let rows: Vec<ElementRef> = candidate.table.select(&ROW_SELECTOR).collect();

    let header_idx = rows
        .iter()
        .position(|row| is_header_row(&clean_text(*row).to_lowercase()))
        .ok_or(ExtractError::HeaderRowNotFound(rows.len()))?;

    Ok(rows[header_idx + 1..]
        .iter()
        .map(|row| {
            row.select(&CELL_SELECTOR)
                .map(|cell| clean_text(cell))
                .collect::<RawRow>()
        })
        .collect())
}

fn is_header_row(row_text: &str) -> bool {
    (row_text.contains("name") && (row_text.contains("shares") || row_text.contains("percent")))
        || row_text.contains("beneficial owner")
}

/// Concatenated text of an element with whitespace (including &nbsp;) collapsed.
fn clean_text(element: ElementRef) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn truncate(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
