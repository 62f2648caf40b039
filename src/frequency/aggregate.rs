use chrono::{DateTime, Utc};

use crate::cache::records::CountryFrequencyRecord;
use crate::frequency::prune::{prune, PruneConfig};
use crate::types::frequency::TokenCounts;

/// Add freshly counted tokens to a country's previous (already pruned) table.
///
/// Words removed by an earlier prune are not recoverable: their count
/// restarts from the new occurrences.
pub fn merge(existing: Option<&TokenCounts>, new_counts: &TokenCounts) -> TokenCounts {
    let mut merged = existing.cloned().unwrap_or_default();
    merged.merge(new_counts);
    merged
}

/// Merges new counts into a country record and prunes the result.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrequencyAggregator {
    prune: PruneConfig,
}

impl FrequencyAggregator {
    pub fn new(prune: PruneConfig) -> Self {
        Self { prune }
    }

    pub fn prune_config(&self) -> &PruneConfig {
        &self.prune
    }

    /// Only call this when the country actually has new documents; an
    /// unchanged country keeps its previous record as-is.
    pub fn update(
        &self,
        existing: Option<&CountryFrequencyRecord>,
        new_counts: &TokenCounts,
        now: DateTime<Utc>,
    ) -> CountryFrequencyRecord {
        let merged = merge(existing.map(|r| &r.frequencies), new_counts);

        CountryFrequencyRecord {
            frequencies: prune(&merged, &self.prune),
            last_updated: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn counts(entries: &[(&str, u64)]) -> TokenCounts {
        entries.iter().map(|(w, c)| (w.to_string(), *c)).collect()
    }

    #[test]
    fn merges_then_prunes() {
        let existing = CountryFrequencyRecord {
            frequencies: counts(&[("islam", 50), ("mosque", 3)]),
            last_updated: Utc.timestamp_opt(0, 0).unwrap(),
        };
        let new_counts = TokenCounts::from_tokens(["islam", "islam", "école"]);
        let now = Utc.timestamp_opt(1_000, 0).unwrap();

        let record = FrequencyAggregator::default().update(Some(&existing), &new_counts, now);

        assert_eq!(record.frequencies, counts(&[("islam", 52), ("mosque", 3)]));
        assert_eq!(record.last_updated, now);
    }

    #[test]
    fn pruned_words_restart_from_new_occurrences() {
        // "savane" had been seen before but was pruned away.
        let existing = counts(&[("fleuve", 4)]);
        let merged = merge(Some(&existing), &TokenCounts::from_tokens(["savane"]));
        assert_eq!(merged.get("savane"), Some(1));
        assert_eq!(merged.get("fleuve"), Some(4));
    }

    #[test]
    fn first_run_starts_from_empty() {
        let merged = merge(None, &TokenCounts::from_tokens(["a", "b", "a"]));
        assert_eq!(merged, counts(&[("a", 2), ("b", 1)]));
    }
}
