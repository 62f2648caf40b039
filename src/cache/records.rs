use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::types::frequency::TokenCounts;
use crate::types::identifiers::{Country, DocumentId, Fingerprint, ItemSetId};

// Typed view of the two persisted caches.
// Maps are BTreeMaps so the files are written with sorted keys.

/// What was last seen for one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FingerprintEntry {
    #[serde(alias = "modified_date", deserialize_with = "nullable_fingerprint")]
    pub fingerprint: Fingerprint,
    #[serde(alias = "processed_date")]
    pub processed_at: DateTime<Utc>,
}

// Older caches store `null` for items that had no modification date. No
// source produces an empty fingerprint, so such entries always read as changed.
fn nullable_fingerprint<'de, D>(deserializer: D) -> Result<Fingerprint, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Fingerprint>::deserialize(deserializer)?.unwrap_or_else(|| Fingerprint::new("")))
}

/// `item_set -> document_id -> FingerprintEntry`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentCache {
    sets: BTreeMap<ItemSetId, BTreeMap<DocumentId, FingerprintEntry>>,
}

impl DocumentCache {
    pub fn new() -> Self {
        DocumentCache {
            sets: BTreeMap::new(),
        }
    }

    pub fn get(&self, item_set: &ItemSetId, id: &DocumentId) -> Option<&FingerprintEntry> {
        self.sets.get(item_set).and_then(|docs| docs.get(id))
    }

    pub fn insert(&mut self, item_set: ItemSetId, id: DocumentId, entry: FingerprintEntry) {
        self.sets.entry(item_set).or_default().insert(id, entry);
    }

    /// Number of documents across all item sets.
    pub fn len(&self) -> usize {
        self.sets.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn item_sets(&self) -> impl Iterator<Item = &ItemSetId> {
        self.sets.keys()
    }
}

/// Pruned frequency table of one country.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryFrequencyRecord {
    pub frequencies: TokenCounts,
    pub last_updated: DateTime<Utc>,
}

/// `country -> CountryFrequencyRecord`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FrequencyCache {
    countries: BTreeMap<Country, CountryFrequencyRecord>,
}

impl FrequencyCache {
    pub fn new() -> Self {
        FrequencyCache {
            countries: BTreeMap::new(),
        }
    }

    pub fn get(&self, country: &Country) -> Option<&CountryFrequencyRecord> {
        self.countries.get(country)
    }

    pub fn insert(&mut self, country: Country, record: CountryFrequencyRecord) {
        self.countries.insert(country, record);
    }

    pub fn len(&self) -> usize {
        self.countries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Country, &CountryFrequencyRecord)> {
        self.countries.iter()
    }
}

/// Everything a `CacheStore` persists.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CacheSnapshot {
    pub documents: DocumentCache,
    pub frequencies: FrequencyCache,
}
