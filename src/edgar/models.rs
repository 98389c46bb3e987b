// src/edgar/models.rs
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One S-1 (or amendment) filing handed to us by the filing-discovery step.
/// Example index page: https://www.sec.gov/Archives/edgar/data/1234567/000123456724000001/0001234567-24-000001-index.htm
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilingDescriptor {
    pub cik: String,
    pub company_name: String,
    pub filing_date: NaiveDate,
    #[serde(default = "default_form_type")]
    pub form_type: String,
    pub filing_index_url: String,
}

fn default_form_type() -> String {
    "S-1".to_string()
}

/// The actual filing document behind an index page, fetched and ready to parse.
#[derive(Debug, Clone)]
pub struct ResolvedDocument {
    pub source: FilingDescriptor,
    pub document_url: String,
    pub raw_markup: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_from_json_defaults_form_type() {
        let json = r#"{
            "cik": "1234567",
            "company_name": "Acme Robotics, Inc.",
            "filing_date": "2024-03-15",
            "filing_index_url": "https://www.sec.gov/Archives/edgar/data/1234567/000123456724000001/0001234567-24-000001-index.htm"
        }"#;
        let filing: FilingDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(filing.form_type, "S-1");
        assert_eq!(filing.filing_date, NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
    }
}
