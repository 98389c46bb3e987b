// src/crm/matcher.rs
use crate::crm::models::{CrmEntity, MatchResult};
use crate::crm::roster::Roster;
use std::sync::Arc;

pub const DEFAULT_MATCH_THRESHOLD: u8 = 80;

/// Whole-string similarity on a 0–100 scale.
pub fn ratio(a: &str, b: &str) -> u8 {
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    (strsim::normalized_levenshtein(a, b) * 100.0).round() as u8
}

/// Best `ratio` of the shorter string against every equal-length window of
/// the longer one. Rewards a name contained in a longer listing.
pub fn partial_ratio(a: &str, b: &str) -> u8 {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let (short, long) = if a_chars.len() <= b_chars.len() {
        (a_chars, b_chars)
    } else {
        (b_chars, a_chars)
    };

    if short.is_empty() {
        return 0;
    }

    let needle: String = short.iter().collect();
    let mut best = 0;
    for window in long.windows(short.len()) {
        let candidate: String = window.iter().collect();
        best = best.max(ratio(&needle, &candidate));
        if best == 100 {
            break;
        }
    }
    best
}

/// Entry score: the better of the whole-string and partial ratios.
pub fn similarity(query: &str, key: &str) -> u8 {
    ratio(query, key).max(partial_ratio(query, key))
}

/// Fuzzy lookup of investor names against a shared, read-only roster.
#[derive(Debug, Clone)]
pub struct RosterMatcher {
    roster: Arc<Roster>,
    threshold: u8,
}

impl RosterMatcher {
    pub fn new(roster: Arc<Roster>, threshold: u8) -> Self {
        Self { roster, threshold }
    }

    pub fn threshold(&self) -> u8 {
        self.threshold
    }

    /// Highest-scoring entry at or above the threshold. Ties keep the entry
    /// seen first (organizations before persons).
    pub fn find_match(&self, investor_name: &str) -> Option<MatchResult> {
        let query = investor_name.trim().to_lowercase();

        let mut best: Option<&CrmEntity> = None;
        let mut best_score = 0u8;

        for entity in self.roster.iter() {
            let score = similarity(&query, &entity.normalized_key);
            if score > best_score && score >= self.threshold {
                best_score = score;
                best = Some(entity);
            }
        }

        let entity = best?;
        tracing::info!(
            "Matched '{}' to '{}' (score: {})",
            investor_name, entity.display_name, best_score
        );

        Some(MatchResult {
            entity: entity.clone(),
            score: best_score,
            kind: entity.kind,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crm::models::EntityKind;

    fn roster(names: &[(&str, EntityKind)]) -> Arc<Roster> {
        Arc::new(names.iter().map(|(n, k)| CrmEntity::new(n, *k)).collect())
    }

    #[test]
    fn test_ratios() {
        assert_eq!(ratio("acme", "acme"), 100);
        assert_eq!(ratio("", "acme"), 0);
        assert_eq!(partial_ratio("acme capital, llc", "acme capital"), 100);
        assert_eq!(partial_ratio("acme capital", "acme capital, llc"), 100);
        assert!(ratio("acme capital, llc", "acme capital") < 80);
    }

    #[test]
    fn test_match_with_suffix_variation() {
        let matcher = RosterMatcher::new(
            roster(&[("acme capital", EntityKind::Organization)]),
            DEFAULT_MATCH_THRESHOLD,
        );

        let hit = matcher.find_match("ACME Capital, LLC").unwrap();
        assert!(hit.score >= 80);
        assert_eq!(hit.entity.normalized_key, "acme capital");
        assert_eq!(hit.kind, EntityKind::Organization);

        assert!(matcher.find_match("Unrelated Ventures").is_none());
    }

    #[test]
    fn test_ties_keep_first_encountered() {
        let r = roster(&[
            ("jane doe", EntityKind::Person),
            ("jane doe", EntityKind::Organization),
        ]);
        let hit = RosterMatcher::new(r, 80).find_match("Jane Doe").unwrap();
        assert_eq!(hit.score, 100);
        assert_eq!(hit.kind, EntityKind::Organization);
    }

    #[test]
    fn test_best_score_wins_across_pools() {
        let r = roster(&[
            ("acme capital partners", EntityKind::Organization),
            ("acme capital partners fund", EntityKind::Organization),
            ("acme capital partner", EntityKind::Person),
        ]);
        let hit = RosterMatcher::new(r, 80).find_match("Acme Capital Partners").unwrap();
        assert_eq!(hit.entity.normalized_key, "acme capital partners");
        assert_eq!(hit.score, 100);
    }

    #[test]
    fn test_threshold_monotonic() {
        let r = roster(&[
            ("sequoia capital", EntityKind::Organization),
            ("sequoia capital operations", EntityKind::Organization),
            ("jim sequoia", EntityKind::Person),
        ]);
        let queries = ["Sequoia Capital XV, L.P.", "Sequoya Capitol", "Jim Sequoia", "Nobody"];

        for q in queries {
            let mut previous_matched = true;
            for threshold in (0..=100).step_by(5) {
                let matched = RosterMatcher::new(r.clone(), threshold).find_match(q).is_some();
                assert!(previous_matched || !matched, "match reappeared at {} for {}", threshold, q);
                previous_matched = matched;
            }
        }
    }
}
