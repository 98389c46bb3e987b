// src/crm/models.rs
//! Roster entities plus the Affinity API payloads they are built from.
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Organization,
    Person,
}

/// A known organization or person from the CRM list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrmEntity {
    pub display_name: String,
    /// Trimmed, lower-cased name; the roster key.
    pub normalized_key: String,
    pub kind: EntityKind,
    pub opportunity_status: String,
    pub last_activity_date: String,
    pub notes: String,
    pub external_id: Option<u64>,
}

impl CrmEntity {
    pub fn new(display_name: &str, kind: EntityKind) -> Self {
        Self {
            display_name: display_name.trim().to_string(),
            normalized_key: display_name.trim().to_lowercase(),
            kind,
            opportunity_status: String::new(),
            last_activity_date: String::new(),
            notes: String::new(),
            external_id: None,
        }
    }
}

/// Best roster entry for an investor name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    pub entity: CrmEntity,
    /// 0–100.
    pub score: u8,
    pub kind: EntityKind,
}

// --- Affinity wire types ---
// Only the fields we read; everything else in the payload is ignored.

#[derive(Debug, Deserialize)]
pub struct AffinityList {
    pub id: u64,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct ListEntriesPage {
    #[serde(default)]
    pub list_entries: Vec<ListEntry>,
    pub next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListEntry {
    pub id: u64,
    /// 0 = organization, 1 = person.
    pub entity_type: Option<u8>,
    pub entity_id: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct FieldValuesPage {
    #[serde(default)]
    pub field_values: Vec<FieldValue>,
}

#[derive(Debug, Deserialize)]
pub struct FieldValue {
    #[serde(default)]
    pub field: Option<FieldRef>,
    #[serde(default)]
    pub value: serde_json::Value,
}

#[derive(Debug, Deserialize)]
pub struct FieldRef {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct InteractionsPage {
    #[serde(default)]
    pub interactions: Vec<Interaction>,
}

#[derive(Debug, Deserialize)]
pub struct Interaction {
    #[serde(default)]
    pub date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Organization {
    pub id: u64,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct Person {
    pub id: u64,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

impl Person {
    pub fn full_name(&self) -> String {
        format!(
            "{} {}",
            self.first_name.as_deref().unwrap_or_default(),
            self.last_name.as_deref().unwrap_or_default()
        )
        .trim()
        .to_string()
    }
}

/// Flattens an untyped field value into display text.
/// Dropdown values arrive as `{"text": ...}`, dates and numbers as scalars.
pub fn value_to_text(value: &serde_json::Value) -> String {
    use serde_json::Value;
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Object(map) => map
            .get("text")
            .or_else(|| map.get("name"))
            .map(value_to_text)
            .unwrap_or_default(),
        Value::Array(items) => items
            .iter()
            .map(value_to_text)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_value_to_text() {
        assert_eq!(value_to_text(&json!(null)), "");
        assert_eq!(value_to_text(&json!("Active")), "Active");
        assert_eq!(value_to_text(&json!({"id": 3, "text": "Diligence"})), "Diligence");
        assert_eq!(value_to_text(&json!([{"text": "A"}, "B", null])), "A, B");
        assert_eq!(value_to_text(&json!(42)), "42");
    }

    #[test]
    fn test_person_full_name() {
        let p: Person = serde_json::from_value(json!({"id": 1, "first_name": "Ada", "last_name": null})).unwrap();
        assert_eq!(p.full_name(), "Ada");
    }
}
