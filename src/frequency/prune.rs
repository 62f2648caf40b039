use serde::{Deserialize, Serialize};

use crate::frequency::ranking::rank;
use crate::types::frequency::TokenCounts;

pub const MIN_FREQUENCY_THRESHOLD: u64 = 2;
pub const MAX_WORDS_PER_COUNTRY: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PruneConfig {
    /// Entries with a lower count are dropped. `0` and `1` keep everything.
    pub min_freq: u64,
    /// Upper bound on the number of retained words.
    pub max_words: usize,
}

impl Default for PruneConfig {
    fn default() -> Self {
        Self {
            min_freq: MIN_FREQUENCY_THRESHOLD,
            max_words: MAX_WORDS_PER_COUNTRY,
        }
    }
}

/// Lossy reduction of a frequency table.
///
/// The frequency floor is applied first, then the table is cut to the
/// `max_words` best-ranked entries. Pruning a pruned table with the same
/// config returns it unchanged.
pub fn prune(counts: &TokenCounts, config: &PruneConfig) -> TokenCounts {
    let kept: Vec<(&str, u64)> = counts
        .iter()
        .filter(|(_, count)| *count >= config.min_freq)
        .collect();

    let kept = if kept.len() > config.max_words {
        let mut ranked = rank(kept);
        ranked.truncate(config.max_words);
        ranked
    } else {
        kept
    };

    kept.into_iter()
        .map(|(word, count)| (word.to_string(), count))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(entries: &[(&str, u64)]) -> TokenCounts {
        entries.iter().map(|(w, c)| (w.to_string(), *c)).collect()
    }

    #[test]
    fn drops_entries_below_floor() {
        let pruned = prune(
            &counts(&[("islam", 52), ("mosquée", 3), ("école", 1)]),
            &PruneConfig::default(),
        );
        assert_eq!(pruned, counts(&[("islam", 52), ("mosquée", 3)]));
    }

    #[test]
    fn keeps_top_words_when_over_cap() {
        let config = PruneConfig {
            min_freq: 2,
            max_words: 2,
        };
        let pruned = prune(&counts(&[("a", 5), ("b", 4), ("c", 3)]), &config);
        assert_eq!(pruned, counts(&[("a", 5), ("b", 4)]));
    }

    #[test]
    fn cap_tie_break_is_lexicographic() {
        let config = PruneConfig {
            min_freq: 0,
            max_words: 2,
        };
        let pruned = prune(&counts(&[("c", 4), ("b", 4), ("a", 4)]), &config);
        assert_eq!(pruned, counts(&[("a", 4), ("b", 4)]));
    }

    #[test]
    fn filter_runs_before_cap() {
        // Cap alone would keep "x"; the floor removes it first.
        let config = PruneConfig {
            min_freq: 3,
            max_words: 3,
        };
        let pruned = prune(&counts(&[("a", 9), ("b", 3), ("x", 2)]), &config);
        assert_eq!(pruned, counts(&[("a", 9), ("b", 3)]));
    }

    #[test]
    fn zero_cap_empties_table() {
        let config = PruneConfig {
            min_freq: 1,
            max_words: 0,
        };
        assert!(prune(&counts(&[("a", 9)]), &config).is_empty());
    }

    #[test]
    fn is_idempotent() {
        let config = PruneConfig {
            min_freq: 2,
            max_words: 3,
        };
        let once = prune(
            &counts(&[("a", 5), ("b", 5), ("c", 2), ("d", 2), ("e", 1)]),
            &config,
        );
        let twice = prune(&once, &config);
        assert_eq!(once, twice);
        assert_eq!(once.len(), 3);
    }
}
