// src/crm/roster.rs
use crate::crm::models::{CrmEntity, EntityKind};
use std::collections::HashMap;

/// One pool of entities, keyed by normalized name, iterated in insertion order.
#[derive(Debug, Clone, Default)]
struct Pool {
    entries: Vec<CrmEntity>,
    index: HashMap<String, usize>,
}

impl Pool {
    fn insert(&mut self, entity: CrmEntity) {
        match self.index.get(&entity.normalized_key) {
            // Same key seen again: newest data wins, position is kept.
            Some(&pos) => self.entries[pos] = entity,
            None => {
                self.index.insert(entity.normalized_key.clone(), self.entries.len());
                self.entries.push(entity);
            }
        }
    }
}

/// Known organizations and persons. Built once per run, then read-only.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    organizations: Pool,
    persons: Pool,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, entity: CrmEntity) {
        if entity.normalized_key.is_empty() {
            tracing::debug!("Skipping roster entity with empty name");
            return;
        }
        match entity.kind {
            EntityKind::Organization => self.organizations.insert(entity),
            EntityKind::Person => self.persons.insert(entity),
        }
    }

    #[cfg(test)]
    pub fn get(&self, key: &str) -> Option<&CrmEntity> {
        let key = key.trim().to_lowercase();
        [&self.organizations, &self.persons]
            .into_iter()
            .find_map(|pool| pool.index.get(&key).map(|&pos| &pool.entries[pos]))
    }

    pub fn organizations(&self) -> &[CrmEntity] {
        &self.organizations.entries
    }

    pub fn persons(&self) -> &[CrmEntity] {
        &self.persons.entries
    }

    /// Organizations first, then persons, each in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &CrmEntity> {
        self.organizations().iter().chain(self.persons().iter())
    }

    pub fn len(&self) -> usize {
        self.organizations.entries.len() + self.persons.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FromIterator<CrmEntity> for Roster {
    fn from_iter<I: IntoIterator<Item = CrmEntity>>(iter: I) -> Self {
        let mut roster = Roster::new();
        for entity in iter {
            roster.insert(entity);
        }
        roster
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iteration_order_and_replacement() {
        let mut first = CrmEntity::new("Acme Capital", EntityKind::Organization);
        first.notes = "old".to_string();
        let mut second = CrmEntity::new("ACME Capital ", EntityKind::Organization);
        second.notes = "new".to_string();

        let roster: Roster = vec![
            CrmEntity::new("Jane Doe", EntityKind::Person),
            first,
            CrmEntity::new("Beta Ventures", EntityKind::Organization),
            second,
        ]
        .into_iter()
        .collect();

        assert_eq!(roster.len(), 3);
        let keys: Vec<&str> = roster.iter().map(|e| e.normalized_key.as_str()).collect();
        assert_eq!(keys, vec!["acme capital", "beta ventures", "jane doe"]);
        assert_eq!(roster.get("Acme Capital").unwrap().notes, "new");
    }

    #[test]
    fn test_empty_names_skipped() {
        let mut roster = Roster::new();
        roster.insert(CrmEntity::new("   ", EntityKind::Person));
        assert!(roster.is_empty());
    }
}
