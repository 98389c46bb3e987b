// src/extractors/stockholders.rs
use crate::extractors::fields::extract_fields;
use crate::extractors::normalize::normalize_name;
use crate::extractors::table::{locate_stockholder_rows, RawRow};
use crate::extractors::validator;
use serde::Serialize;

/// One accepted row of an ownership table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Stockholder {
    pub name: String,
    pub shares_owned: Option<u64>,
    pub ownership_percent: Option<String>,
}

/// Extracts stockholders from a filing document. A missing table or header
/// row is a normal outcome and yields an empty list.
pub fn extract_stockholders(markup: &str) -> Vec<Stockholder> {
    match locate_stockholder_rows(markup) {
        Ok(rows) => stockholders_from_rows(&rows),
        Err(e) => {
            tracing::warn!("No stockholder rows extracted: {}", e);
            Vec::new()
        }
    }
}

/// Turns data rows into stockholders: name cell first, then the value cells.
pub fn stockholders_from_rows(rows: &[RawRow]) -> Vec<Stockholder> {
    let mut stockholders = Vec::new();

    for row in rows {
        if row.len() < 2 {
            continue;
        }

        let name = normalize_name(&row[0]);
        let verdict = validator::validate(&name);
        if !verdict.is_accepted() {
            tracing::trace!("Rejected name cell '{}' ({:?})", name, verdict);
            continue;
        }

        let fields = extract_fields(&row[1..]);
        stockholders.push(Stockholder {
            name,
            shares_owned: fields.shares_owned,
            ownership_percent: fields.ownership_percent,
        });
    }

    stockholders
}
