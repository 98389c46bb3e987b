// src/foundations/mod.rs
//! Nonprofit registry lookups (ProPublica Nonprofit Explorer) for investors
//! classified as foundations.

use crate::utils::error::RegistryError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const PROPUBLICA_API_URL: &str = "https://projects.propublica.org/nonprofits/api/v2";
const REGISTRY_TIMEOUT: Duration = Duration::from_secs(30);
/// Contacts kept per investor record.
pub const MAX_CONTACTS: usize = 5;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    organizations: Vec<NonprofitSummary>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NonprofitSummary {
    pub ein: u64,
    #[serde(default)]
    pub name: String,
}

/// Organization endpoint payload: the profile plus its 990 filings, newest first.
#[derive(Debug, Deserialize)]
pub struct OrganizationResponse {
    pub organization: Option<NonprofitDetails>,
    #[serde(default)]
    pub filings_with_data: Vec<NonprofitFiling>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NonprofitFiling {
    #[serde(default)]
    pub tax_prd: Option<u64>,
    #[serde(default)]
    pub pdf_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NonprofitDetails {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub asset_amount: Option<f64>,
}

/// Someone (or something) to contact about a foundation investor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FoundationContact {
    pub name: String,
    pub title: String,
    pub ein: u64,
    pub city: String,
    pub state: String,
    pub total_assets: Option<f64>,
}

impl FoundationContact {
    pub fn summary(&self) -> String {
        format!("{} ({})", self.name, self.title)
    }
}

#[derive(Debug, Clone)]
pub struct FoundationRegistry {
    http: reqwest::Client,
    base_url: String,
}

impl FoundationRegistry {
    pub fn new() -> Result<Self, RegistryError> {
        Self::with_base_url(PROPUBLICA_API_URL)
    }

    pub fn with_base_url(base_url: &str) -> Result<Self, RegistryError> {
        let http = reqwest::Client::builder().timeout(REGISTRY_TIMEOUT).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// First (most relevant) search hit for the name, with the generic
    /// "Foundation"/"Endowment" words removed from the query.
    pub async fn search(&self, name: &str) -> Result<Option<NonprofitSummary>, RegistryError> {
        let query = name.replace("Foundation", "").replace("Endowment", "");
        let response = self.http
            .get(format!("{}/search.json", self.base_url))
            .query(&[("q", query.trim())])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(RegistryError::Http(response.status()));
        }

        let body: SearchResponse = response.json().await?;
        Ok(body.organizations.into_iter().next())
    }

    pub async fn organization(&self, ein: u64) -> Result<OrganizationResponse, RegistryError> {
        let response = self.http
            .get(format!("{}/organizations/{}.json", self.base_url, ein))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(RegistryError::Http(response.status()));
        }

        Ok(response.json().await?)
    }

    /// Contacts for a foundation. Lookup failures are logged and yield none.
    pub async fn lookup_contacts(&self, foundation_name: &str) -> Vec<FoundationContact> {
        match self.try_lookup_contacts(foundation_name).await {
            Ok(contacts) => contacts,
            Err(e) => {
                tracing::error!("Registry lookup failed for '{}': {}", foundation_name, e);
                Vec::new()
            }
        }
    }

    async fn try_lookup_contacts(&self, foundation_name: &str) -> Result<Vec<FoundationContact>, RegistryError> {
        let Some(org) = self.search(foundation_name).await? else {
            tracing::info!("No registry match found for '{}'", foundation_name);
            return Ok(Vec::new());
        };
        tracing::info!("Found foundation match: {} (EIN: {})", org.name, org.ein);

        let profile = self.organization(org.ein).await?;
        let Some(latest) = profile.filings_with_data.first() else {
            tracing::info!("No 990 filings on record for EIN {}", org.ein);
            return Ok(Vec::new());
        };
        tracing::debug!(
            "Latest 990 for EIN {}: tax period {:?}, pdf {:?}",
            org.ein,
            latest.tax_prd,
            latest.pdf_url
        );
        let Some(details) = profile.organization else {
            return Ok(Vec::new());
        };

        // Officer lists only exist inside the 990 PDFs; the organization itself
        // is the contact we can offer.
        let contact = FoundationContact {
            name: details.name.unwrap_or_else(|| foundation_name.to_string()),
            title: "Foundation".to_string(),
            ein: org.ein,
            city: details.city.unwrap_or_default(),
            state: details.state.unwrap_or_default(),
            total_assets: details.asset_amount,
        };

        Ok(vec![contact])
    }
}
