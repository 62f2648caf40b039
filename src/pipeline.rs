//! One incremental run: fetch, detect changes, count, merge, prune.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::cache::detection::ChangeDetector;
use crate::cache::records::{DocumentCache, FrequencyCache};
use crate::clock::Clock;
use crate::frequency::aggregate::FrequencyAggregator;
use crate::frequency::prune::PruneConfig;
use crate::source::{fetch_item_set, DocumentSource};
use crate::tokenize::Tokenizer;
use crate::types::frequency::TokenCounts;
use crate::types::identifiers::{Country, ItemSetId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineSettings {
    /// Allow-list, also the order countries are aggregated in.
    pub countries: Vec<Country>,
    /// Fetched in this order.
    pub item_sets: Vec<ItemSetId>,
    pub prune: PruneConfig,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CountryStatus {
    /// New documents were merged into the table.
    Updated,
    /// Nothing changed; the previous table was kept.
    Cached,
    /// Nothing changed and there is no previous table.
    #[default]
    NoData,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CountrySummary {
    /// New or changed documents that were counted.
    pub accepted: usize,
    /// Documents skipped because their fingerprint was unchanged.
    pub unchanged: usize,
    /// Accepted documents that produced no tokens.
    pub empty: usize,
    pub words: usize,
    pub status: CountryStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedItemSet {
    pub item_set: ItemSetId,
    pub pages_fetched: u32,
    pub error: String,
}

/// What a run did. Always produced, whatever failed along the way.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub countries: BTreeMap<Country, CountrySummary>,
    /// Documents whose country label is not in the allow-list, by label.
    pub unrecognized: BTreeMap<Country, usize>,
    pub failed_item_sets: Vec<FailedItemSet>,
}

impl RunSummary {
    pub fn accepted(&self) -> usize {
        self.countries.values().map(|c| c.accepted).sum()
    }

    pub fn unchanged(&self) -> usize {
        self.countries.values().map(|c| c.unchanged).sum()
    }

    pub fn unrecognized_total(&self) -> usize {
        self.unrecognized.values().sum()
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Run summary: {} accepted, {} unchanged, {} unrecognized, {} failed item sets",
            self.accepted(),
            self.unchanged(),
            self.unrecognized_total(),
            self.failed_item_sets.len()
        )?;
        for (country, c) in &self.countries {
            writeln!(
                f,
                "  {country}: {} accepted, {} unchanged, {} empty, {} words ({:?})",
                c.accepted, c.unchanged, c.empty, c.words, c.status
            )?;
        }
        for (label, count) in &self.unrecognized {
            writeln!(f, "  skipped unrecognized country {:?}: {count} documents", label.as_str())?;
        }
        for failed in &self.failed_item_sets {
            writeln!(
                f,
                "  item set {} stopped after {} pages: {}",
                failed.item_set, failed.pages_fetched, failed.error
            )?;
        }
        Ok(())
    }
}

pub struct Pipeline<S, T, C> {
    source: S,
    tokenizer: T,
    clock: C,
    settings: PipelineSettings,
}

impl<S, T, C> Pipeline<S, T, C>
where
    S: DocumentSource,
    T: Tokenizer,
    C: Clock,
{
    pub fn new(source: S, tokenizer: T, clock: C, settings: PipelineSettings) -> Self {
        Self {
            source,
            tokenizer,
            clock,
            settings,
        }
    }

    /// Run once against the loaded caches, updating them in place.
    ///
    /// Fetch failures are contained to their item set. Countries without new
    /// documents keep their previous record untouched. Nothing is persisted
    /// here; the caller saves the caches afterwards.
    pub fn run(&mut self, documents: &mut DocumentCache, frequencies: &mut FrequencyCache) -> RunSummary {
        let incremental = self.source.is_incremental();
        let detector = ChangeDetector::new(&self.clock);
        let allowed: BTreeSet<&Country> = self.settings.countries.iter().collect();

        let mut summary = RunSummary {
            countries: self
                .settings
                .countries
                .iter()
                .map(|c| (c.clone(), CountrySummary::default()))
                .collect(),
            ..RunSummary::default()
        };
        let mut pending: BTreeMap<Country, TokenCounts> = BTreeMap::new();

        for item_set in &self.settings.item_sets {
            let outcome = fetch_item_set(&mut self.source, item_set);
            if let Some(err) = outcome.failure {
                summary.failed_item_sets.push(FailedItemSet {
                    item_set: item_set.clone(),
                    pages_fetched: outcome.pages_fetched,
                    error: err.to_string(),
                });
            }

            for document in outcome.documents {
                if !allowed.contains(&document.country) {
                    debug!("Skipping document {} with unrecognized country {:?}", document.id, document.country.as_str());
                    *summary.unrecognized.entry(document.country).or_insert(0) += 1;
                    continue;
                }

                let stats = summary.countries.entry(document.country.clone()).or_default();
                if incremental && !detector.detect_document(documents, &document) {
                    stats.unchanged += 1;
                    continue;
                }

                stats.accepted += 1;
                let tokens = self.tokenizer.tokenize(&document.text);
                if tokens.is_empty() {
                    stats.empty += 1;
                }
                pending.entry(document.country).or_default().add_tokens(tokens);
            }
        }

        let aggregator = FrequencyAggregator::new(self.settings.prune);
        for country in &self.settings.countries {
            let stats = summary.countries.entry(country.clone()).or_default();

            match pending.remove(country) {
                Some(new_counts) => {
                    // Rows of a non-incremental source are all re-read every
                    // run; merging them into the old table would count them twice.
                    let existing = if incremental { frequencies.get(country) } else { None };
                    let record = aggregator.update(existing, &new_counts, self.clock.now());
                    info!(
                        "{}: {} new documents, {} words after pruning",
                        country,
                        stats.accepted,
                        record.frequencies.len()
                    );
                    stats.words = record.frequencies.len();
                    stats.status = CountryStatus::Updated;
                    frequencies.insert(country.clone(), record);
                }
                None => match frequencies.get(country) {
                    Some(record) => {
                        info!("Using cached data for {} from {}", country, record.last_updated);
                        stats.words = record.frequencies.len();
                        stats.status = CountryStatus::Cached;
                    }
                    None => {
                        warn!("No data available for {}", country);
                        stats.status = CountryStatus::NoData;
                    }
                },
            }
        }

        if !summary.unrecognized.is_empty() {
            warn!(
                "Skipped {} documents with unrecognized countries: {:?}",
                summary.unrecognized_total(),
                summary.unrecognized.keys().map(Country::as_str).collect::<Vec<_>>()
            );
        }

        summary
    }
}
