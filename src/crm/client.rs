// src/crm/client.rs
use crate::crm::models::{
    value_to_text, AffinityList, CrmEntity, EntityKind, FieldValuesPage, InteractionsPage,
    ListEntriesPage, ListEntry, Organization, Person,
};
use crate::crm::roster::Roster;
use crate::utils::error::CrmError;
use serde::de::DeserializeOwned;
use std::time::Duration;

pub const AFFINITY_API_URL: &str = "https://api.affinity.co";
const AFFINITY_TIMEOUT: Duration = Duration::from_secs(30);
const LIST_ENTRIES_PAGE_SIZE: u32 = 500;

const ENTITY_TYPE_ORGANIZATION: u8 = 0;
const ENTITY_TYPE_PERSON: u8 = 1;

/// Read-only Affinity CRM client used to build the matching roster.
#[derive(Debug, Clone)]
pub struct AffinityClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl AffinityClient {
    pub fn new(api_key: &str) -> Result<Self, CrmError> {
        Self::with_base_url(api_key, AFFINITY_API_URL)
    }

    pub fn with_base_url(api_key: &str, base_url: &str) -> Result<Self, CrmError> {
        let http = reqwest::Client::builder().timeout(AFFINITY_TIMEOUT).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: &str, query: &[(&str, String)]) -> Result<T, CrmError> {
        let url = format!("{}{}", self.base_url, endpoint);
        let response = self.http
            .get(&url)
            // Affinity uses an empty username with the API key as password
            .basic_auth("", Some(&self.api_key))
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!("Affinity API error: {} for {}", status, endpoint);
            return Err(CrmError::Http(status, endpoint.to_string()));
        }

        Ok(response.json::<T>().await?)
    }

    pub async fn get_lists(&self) -> Result<Vec<AffinityList>, CrmError> {
        self.get("/lists", &[]).await
    }

    /// Case-insensitive lookup of a list by name.
    pub async fn find_list(&self, name: &str) -> Result<Option<AffinityList>, CrmError> {
        let wanted = name.to_lowercase();
        Ok(self
            .get_lists()
            .await?
            .into_iter()
            .find(|l| l.name.to_lowercase() == wanted))
    }

    /// All entries of a list, following `next_page_token`. A failed later page
    /// ends pagination and keeps the entries already fetched.
    pub async fn get_list_entries(&self, list_id: u64) -> Result<Vec<ListEntry>, CrmError> {
        let mut entries = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut query = vec![("page_size", LIST_ENTRIES_PAGE_SIZE.to_string())];
            if let Some(token) = &page_token {
                query.push(("page_token", token.clone()));
            }

            let page: ListEntriesPage = match self
                .get(&format!("/lists/{}/list-entries", list_id), &query)
                .await
            {
                Ok(page) => page,
                Err(e) if !entries.is_empty() => {
                    tracing::warn!("Stopping list {} pagination after {} entries: {}", list_id, entries.len(), e);
                    break;
                }
                Err(e) => return Err(e),
            };
            entries.extend(page.list_entries);

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        Ok(entries)
    }

    pub async fn get_field_values(&self, list_id: u64, entry_id: u64) -> Result<FieldValuesPage, CrmError> {
        self.get(&format!("/lists/{}/list-entries/{}/field-values", list_id, entry_id), &[])
            .await
    }

    /// Date of the most recent interaction, if any.
    pub async fn last_interaction_date(&self, kind: EntityKind, entity_id: u64) -> Result<Option<String>, CrmError> {
        let id_param = match kind {
            EntityKind::Organization => "organization_id",
            EntityKind::Person => "person_id",
        };
        let page: InteractionsPage = self
            .get("/interactions", &[(id_param, entity_id.to_string()), ("page_size", "1".to_string())])
            .await?;
        Ok(page.interactions.into_iter().next().and_then(|i| i.date))
    }

    pub async fn get_organization(&self, org_id: u64) -> Result<Organization, CrmError> {
        self.get(&format!("/organizations/{}", org_id), &[]).await
    }

    pub async fn get_person(&self, person_id: u64) -> Result<Person, CrmError> {
        self.get(&format!("/persons/{}", person_id), &[]).await
    }

    /// Loads the named list into a roster. A missing list gives an empty
    /// roster; entries that fail to load are skipped.
    pub async fn load_roster(&self, list_name: &str) -> Result<Roster, CrmError> {
        tracing::info!("Loading Affinity list: {}", list_name);
        let mut roster = Roster::new();

        let Some(list) = self.find_list(list_name).await? else {
            tracing::warn!("Could not find Affinity list named '{}'", list_name);
            return Ok(roster);
        };
        tracing::info!("Found list '{}' with ID {}", list.name, list.id);

        let entries = self.get_list_entries(list.id).await?;
        tracing::info!("Loaded {} entries from list", entries.len());

        for entry in &entries {
            match self.load_entry(list.id, entry).await {
                Ok(Some(entity)) => roster.insert(entity),
                Ok(None) => tracing::debug!("List entry {} has no usable entity", entry.id),
                Err(e) => tracing::warn!("Skipping list entry {}: {}", entry.id, e),
            }
        }

        tracing::info!(
            "Cached {} organizations and {} persons",
            roster.organizations().len(),
            roster.persons().len()
        );
        Ok(roster)
    }

    async fn load_entry(&self, list_id: u64, entry: &ListEntry) -> Result<Option<CrmEntity>, CrmError> {
        let kind = match entry.entity_type {
            Some(ENTITY_TYPE_ORGANIZATION) => EntityKind::Organization,
            Some(ENTITY_TYPE_PERSON) => EntityKind::Person,
            _ => return Ok(None),
        };
        let Some(entity_id) = entry.entity_id else {
            return Ok(None);
        };

        let name = match kind {
            EntityKind::Organization => self.get_organization(entity_id).await?.name,
            EntityKind::Person => self.get_person(entity_id).await?.full_name(),
        };

        let mut entity = CrmEntity::new(&name, kind);
        entity.external_id = Some(entity_id);

        // Status, notes and activity are optional; only the name lookup is required.
        match self.get_field_values(list_id, entry.id).await {
            Ok(page) => {
                for fv in page.field_values {
                    let field_name = fv.field.map(|f| f.name.to_lowercase()).unwrap_or_default();
                    if field_name.contains("status") || field_name.contains("stage") {
                        entity.opportunity_status = value_to_text(&fv.value);
                    } else if field_name.contains("note") {
                        entity.notes = value_to_text(&fv.value);
                    }
                }
            }
            Err(e) => tracing::warn!("No field values for list entry {}: {}", entry.id, e),
        }

        match self.last_interaction_date(kind, entity_id).await {
            Ok(date) => entity.last_activity_date = date.unwrap_or_default(),
            Err(e) => tracing::warn!("No interaction history for '{}': {}", name, e),
        }

        Ok(Some(entity))
    }
}
