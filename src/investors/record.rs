// src/investors/record.rs
use crate::crm::MatchResult;
use crate::edgar::FilingDescriptor;
use crate::extractors::Stockholder;
use crate::foundations::FoundationContact;
use crate::investors::classify::{classify, EntityType};
use chrono::NaiveDate;
use serde::Serialize;

const LINKEDIN_COMPANY_SEARCH_URL: &str = "https://www.linkedin.com/search/results/companies/?keywords=";

/// Which filing a record came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilingRef {
    pub company_name: String,
    pub cik: String,
    pub filing_date: NaiveDate,
    pub form_type: String,
}

impl From<&FilingDescriptor> for FilingRef {
    fn from(filing: &FilingDescriptor) -> Self {
        Self {
            company_name: filing.company_name.clone(),
            cik: filing.cik.clone(),
            filing_date: filing.filing_date,
            form_type: filing.form_type.clone(),
        }
    }
}

/// One investor found in one filing, with enrichment attached later.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvestorRecord {
    #[serde(flatten)]
    pub stockholder: Stockholder,
    #[serde(flatten)]
    pub filing: FilingRef,
    pub entity_type: EntityType,
    pub linkedin_search_url: String,
    pub crm_match: Option<MatchResult>,
    pub foundation_contacts: Vec<FoundationContact>,
}

impl InvestorRecord {
    pub fn new(stockholder: Stockholder, filing: FilingRef) -> Self {
        let entity_type = classify(&stockholder.name);
        let linkedin_search_url = linkedin_search_url(&stockholder.name);
        Self {
            stockholder,
            filing,
            entity_type,
            linkedin_search_url,
            crm_match: None,
            foundation_contacts: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.stockholder.name
    }

    pub fn in_crm(&self) -> bool {
        self.crm_match.is_some()
    }
}

pub fn linkedin_search_url(name: &str) -> String {
    format!("{}{}", LINKEDIN_COMPANY_SEARCH_URL, name.replace(' ', "%20"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filing() -> FilingRef {
        FilingRef {
            company_name: "Acme Robotics, Inc.".to_string(),
            cik: "1234567".to_string(),
            filing_date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            form_type: "S-1".to_string(),
        }
    }

    #[test]
    fn test_new_record_classifies_and_links() {
        let holder = Stockholder {
            name: "ABC Capital Partners LLC".to_string(),
            shares_owned: Some(3_000_000),
            ownership_percent: Some("11.0".to_string()),
        };
        let record = InvestorRecord::new(holder, filing());

        assert_eq!(record.entity_type, EntityType::Fund);
        assert_eq!(
            record.linkedin_search_url,
            "https://www.linkedin.com/search/results/companies/?keywords=ABC%20Capital%20Partners%20LLC"
        );
        assert!(!record.in_crm());
    }

    #[test]
    fn test_serialized_shape() {
        let holder = Stockholder {
            name: "Jane Doe".to_string(),
            shares_owned: None,
            ownership_percent: Some("4.5".to_string()),
        };
        let json = serde_json::to_value(InvestorRecord::new(holder, filing())).unwrap();

        assert_eq!(json["name"], "Jane Doe");
        assert_eq!(json["shares_owned"], serde_json::Value::Null);
        assert_eq!(json["ownership_percent"], "4.5");
        assert_eq!(json["company_name"], "Acme Robotics, Inc.");
        assert_eq!(json["filing_date"], "2024-03-15");
        assert_eq!(json["entity_type"], "unknown");
    }
}
