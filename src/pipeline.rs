// src/pipeline.rs
use crate::crm::RosterMatcher;
use crate::edgar::resolver::fetch_document;
use crate::edgar::{EdgarClient, FilingDescriptor};
use crate::extractors::extract_stockholders;
use crate::foundations::{FoundationRegistry, MAX_CONTACTS};
use crate::investors::{EntityType, FilingRef, InvestorRecord};
use crate::utils::error::EdgarError;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

pub const DEFAULT_CONCURRENCY: usize = 4;

/// Filing descriptors in, investor records out.
///
/// Filings are fetched and parsed on a bounded pool of tasks; any failure
/// inside one filing is logged and that filing contributes no records.
/// Enrichment (registry, then CRM matching) runs once all filings are in.
pub struct ExtractionPipeline {
    edgar: EdgarClient,
    concurrency: usize,
    matcher: Option<RosterMatcher>,
    registry: Option<FoundationRegistry>,
}

impl ExtractionPipeline {
    pub fn new(edgar: EdgarClient, concurrency: usize) -> Self {
        Self {
            edgar,
            concurrency: concurrency.max(1),
            matcher: None,
            registry: None,
        }
    }

    pub fn with_matcher(mut self, matcher: RosterMatcher) -> Self {
        self.matcher = Some(matcher);
        self
    }

    pub fn with_registry(mut self, registry: FoundationRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    pub async fn run(&self, filings: Vec<FilingDescriptor>) -> Vec<InvestorRecord> {
        let filing_count = filings.len();
        let mut records = self.extract_all(filings).await;
        tracing::info!("Extracted {} total investor records from {} filings", records.len(), filing_count);

        if let Some(registry) = &self.registry {
            tracing::info!("Looking up foundation registry entries");
            for record in records.iter_mut().filter(|r| r.entity_type == EntityType::Foundation) {
                let mut contacts = registry.lookup_contacts(record.name()).await;
                contacts.truncate(MAX_CONTACTS);
                if !contacts.is_empty() {
                    let summary: Vec<String> = contacts.iter().map(|c| c.summary()).collect();
                    tracing::debug!("Foundation contacts for {}: {}", record.name(), summary.join("; "));
                }
                record.foundation_contacts = contacts;
            }
        }

        if let Some(matcher) = &self.matcher {
            tracing::info!("Matching against CRM roster (threshold {})", matcher.threshold());
            for record in records.iter_mut() {
                record.crm_match = matcher.find_match(record.name());
            }
        }

        let in_crm = records.iter().filter(|r| r.in_crm()).count();
        let foundations = records.iter().filter(|r| r.entity_type == EntityType::Foundation).count();
        tracing::info!("Summary: {} already in CRM, {} foundations found", in_crm, foundations);

        records
    }

    async fn extract_all(&self, filings: Vec<FilingDescriptor>) -> Vec<InvestorRecord> {
        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut tasks = JoinSet::new();

        let filing_count = filings.len();
        for (position, filing) in filings.into_iter().enumerate() {
            let client = self.edgar.clone();
            let semaphore = Arc::clone(&semaphore);
            tasks.spawn(async move {
                let _permit = semaphore.acquire_owned().await;
                let result = extract_filing(&client, &filing).await;
                (position, filing, result)
            });
        }

        // Slots keep output in input filing order regardless of completion order.
        let mut slots: Vec<Vec<InvestorRecord>> = vec![Vec::new(); filing_count];
        let mut failures = 0usize;
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((position, filing, Ok(found))) => {
                    tracing::info!("Extracted {} stockholders from {}", found.len(), filing.company_name);
                    slots[position] = found;
                }
                Ok((_, filing, Err(e))) => {
                    tracing::error!("Skipping {} ({}): {}", filing.company_name, filing.cik, e);
                    failures += 1;
                }
                Err(e) => {
                    tracing::error!("Filing task failed: {}", e);
                    failures += 1;
                }
            }
        }

        if failures > 0 {
            tracing::warn!("{} filings could not be processed", failures);
        }
        slots.into_iter().flatten().collect()
    }
}

/// Resolves, downloads and parses one filing into investor records.
pub async fn extract_filing(
    client: &EdgarClient,
    filing: &FilingDescriptor,
) -> Result<Vec<InvestorRecord>, EdgarError> {
    tracing::info!("Parsing stockholders from {} ({})", filing.company_name, filing.cik);
    let document = fetch_document(client, filing).await?;

    let filing_ref = FilingRef::from(&document.source);
    Ok(extract_stockholders(&document.raw_markup)
        .into_iter()
        .map(|holder| InvestorRecord::new(holder, filing_ref.clone()))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crm::models::{CrmEntity, EntityKind};
    use crate::crm::roster::Roster;
    use std::time::Duration;

    const FILING_DOC: &str = r#"<html><body>
        <p>Table of Contents</p>
        <p><b>PRINCIPAL STOCKHOLDERS</b></p>
        <table>
          <tr><td>Name of Beneficial Owner</td><td>Shares</td><td>%</td></tr>
          <tr><td>ACME Capital, LLC(1)</td><td>5,000,000</td><td>12.5%</td></tr>
          <tr><td>Roe Family Foundation</td><td>800,000</td><td>2.0%</td></tr>
          <tr><td>Risk Factors</td><td></td><td></td></tr>
        </table></body></html>"#;

    fn filing(server_url: &str, index_path: &str, name: &str) -> FilingDescriptor {
        FilingDescriptor {
            cik: "1".to_string(),
            company_name: name.to_string(),
            filing_date: chrono::NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            form_type: "S-1".to_string(),
            filing_index_url: format!("{}{}", server_url, index_path),
        }
    }

    fn edgar() -> EdgarClient {
        EdgarClient::new("test").unwrap().with_request_delay(Duration::ZERO)
    }

    #[tokio::test]
    async fn test_run_skips_failed_filings_and_matches() {
        let mut server = mockito::Server::new_async().await;
        server.mock("GET", "/good/index.htm")
            .with_body(r#"<a href="/Archives/edgar/data/1/01/d1s-1.htm">d1s-1.htm</a>"#)
            .create_async().await;
        server.mock("GET", "/Archives/edgar/data/1/01/d1s-1.htm")
            .with_body(FILING_DOC)
            .create_async().await;
        server.mock("GET", "/bad/index.htm").with_status(500).create_async().await;
        server.mock("GET", "/empty/index.htm")
            .with_body(r#"<a href="/Archives/edgar/data/1/02/s-1.htm">S-1</a>"#)
            .create_async().await;
        server.mock("GET", "/Archives/edgar/data/1/02/s-1.htm")
            .with_body("<html><body><p>No tables at all</p></body></html>")
            .create_async().await;

        let roster: Roster = vec![CrmEntity::new("acme capital", EntityKind::Organization)]
            .into_iter()
            .collect();
        let pipeline = ExtractionPipeline::new(edgar(), 2)
            .with_matcher(RosterMatcher::new(Arc::new(roster), 80));

        let filings = vec![
            filing(&server.url(), "/good/index.htm", "Good Co"),
            filing(&server.url(), "/bad/index.htm", "Bad Co"),
            filing(&server.url(), "/empty/index.htm", "Empty Co"),
        ];
        let mut records = pipeline.run(filings).await;
        records.sort_by(|a, b| a.name().cmp(b.name()));

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name(), "ACME Capital, LLC");
        assert_eq!(records[0].entity_type, EntityType::Fund);
        assert_eq!(records[0].stockholder.shares_owned, Some(5_000_000));
        assert_eq!(records[0].filing.company_name, "Good Co");
        assert!(records[0].crm_match.as_ref().unwrap().score >= 80);

        assert_eq!(records[1].name(), "Roe Family Foundation");
        assert_eq!(records[1].entity_type, EntityType::Foundation);
        assert!(records[1].crm_match.is_none());
        // No registry configured.
        assert!(records[1].foundation_contacts.is_empty());
    }

    #[tokio::test]
    async fn test_no_filings_is_empty() {
        let pipeline = ExtractionPipeline::new(edgar(), DEFAULT_CONCURRENCY);
        assert!(pipeline.run(Vec::new()).await.is_empty());
    }

    #[tokio::test]
    async fn test_registry_enriches_foundations() {
        let mut server = mockito::Server::new_async().await;
        server.mock("GET", "/index.htm")
            .with_body(r#"<a href="/Archives/edgar/data/1/01/s-1.htm">S-1</a>"#)
            .create_async().await;
        server.mock("GET", "/Archives/edgar/data/1/01/s-1.htm")
            .with_body(FILING_DOC)
            .create_async().await;
        server.mock("GET", "/registry/search.json")
            .match_query(mockito::Matcher::Any)
            .with_body(r#"{"organizations": [{"ein": 12, "name": "ROE FAMILY FOUNDATION"}]}"#)
            .create_async().await;
        server.mock("GET", "/registry/organizations/12.json")
            .with_body(r#"{"organization": {"name": "Roe Family Foundation", "city": "Austin", "state": "TX"},
                "filings_with_data": [{"tax_prd": 202312}]}"#)
            .create_async().await;

        let registry = FoundationRegistry::with_base_url(&format!("{}/registry", server.url())).unwrap();
        let pipeline = ExtractionPipeline::new(edgar(), 1).with_registry(registry);

        let records = pipeline.run(vec![filing(&server.url(), "/index.htm", "Good Co")]).await;
        let foundation = records
            .iter()
            .find(|r| r.entity_type == EntityType::Foundation)
            .unwrap();
        assert_eq!(foundation.foundation_contacts.len(), 1);
        assert_eq!(foundation.foundation_contacts[0].state, "TX");

        let fund = records.iter().find(|r| r.entity_type == EntityType::Fund).unwrap();
        assert!(fund.foundation_contacts.is_empty());
    }
}
