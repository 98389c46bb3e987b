// src/investors/classify.rs
use serde::Serialize;
use std::fmt;

/// Coarse investor taxonomy; every accepted name gets exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Foundation,
    FamilyOffice,
    Trust,
    Fund,
    Corporate,
    Unknown,
}

impl EntityType {
    pub fn as_str(self) -> &'static str {
        match self {
            EntityType::Foundation => "foundation",
            EntityType::FamilyOffice => "family_office",
            EntityType::Trust => "trust",
            EntityType::Fund => "fund",
            EntityType::Corporate => "corporate",
            EntityType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Checked top to bottom; a keyword counts anywhere in the lower-cased name.
const CLASSIFICATION_RULES: &[(EntityType, &[&str])] = &[
    (EntityType::Foundation, &["foundation", "endowment"]),
    (EntityType::FamilyOffice, &["family office", "family trust", "family lp"]),
    (EntityType::Trust, &["trust", "estate"]),
    (
        EntityType::Fund,
        &["capital", "partners", "ventures", "fund", "management", "advisors", "llc", "lp"],
    ),
    (EntityType::Corporate, &["inc", "corp", "corporation", "company"]),
];

/// Maps an accepted investor name to its entity type; first matching rule wins.
pub fn classify(name: &str) -> EntityType {
    let lower = name.to_lowercase();

    CLASSIFICATION_RULES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|kw| lower.contains(kw)))
        .map(|(entity_type, _)| *entity_type)
        .unwrap_or(EntityType::Unknown)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_person_is_unknown() {
        assert_eq!(classify("John A. Smith"), EntityType::Unknown);
    }

    #[test]
    fn test_fund() {
        assert_eq!(classify("ABC Capital Partners LLC"), EntityType::Fund);
        assert_eq!(classify("Benchmark Capital Partners VII, L.P."), EntityType::Fund);
    }

    #[test]
    fn test_priority_order() {
        assert_eq!(classify("XYZ Family Trust"), EntityType::FamilyOffice);
        assert_eq!(classify("Gates Foundation Trust"), EntityType::Foundation);
        assert_eq!(classify("Estate of Robert Roe"), EntityType::Trust);
        assert_eq!(classify("Roe Family LP"), EntityType::FamilyOffice);
        assert_eq!(classify("Acme Trust Company"), EntityType::Trust);
        assert_eq!(classify("Intel Corporation"), EntityType::Corporate);
        assert_eq!(classify("Alphabet Inc."), EntityType::Corporate);
    }

    #[test]
    fn test_keywords_match_inside_words() {
        assert_eq!(classify("Smith Limited Partnership"), EntityType::Fund);
        assert_eq!(classify("Trustees of Princeton University"), EntityType::Trust);
        assert_eq!(classify("Vincent Smith"), EntityType::Corporate);
        assert_eq!(classify("Rockefeller Brothers Foundations"), EntityType::Foundation);
    }

    #[test]
    fn test_dotted_suffix_is_not_lp() {
        // "l.p." never contains "lp".
        assert_eq!(classify("Roe Family L.P."), EntityType::Unknown);
    }

    #[test]
    fn test_serialized_tag() {
        assert_eq!(serde_json::to_string(&EntityType::FamilyOffice).unwrap(), "\"family_office\"");
        assert_eq!(EntityType::FamilyOffice.to_string(), "family_office");
    }
}
