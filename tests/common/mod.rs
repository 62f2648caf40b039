#![allow(dead_code)]

use std::collections::HashMap;

use chrono::{DateTime, TimeZone, Utc};
use wordcloud_core::clock::FixedClock;
use wordcloud_core::document::{Country, Document, DocumentId, Fingerprint, ItemSetId};
use wordcloud_core::frequency::PruneConfig;
use wordcloud_core::pipeline::PipelineSettings;
use wordcloud_core::source::{DocumentSource, SourceError};

/// One page of a scripted item set: documents, or an HTTP status failure.
pub enum Page {
    Docs(Vec<Document>),
    Fail(u16),
}

/// In-memory source. Pages past the end of a script are empty.
pub struct ScriptedSource {
    pub incremental: bool,
    pub sets: HashMap<ItemSetId, Vec<Page>>,
    pub requests: Vec<(ItemSetId, u32)>,
}

impl ScriptedSource {
    pub fn new(incremental: bool) -> Self {
        Self {
            incremental,
            sets: HashMap::new(),
            requests: Vec::new(),
        }
    }

    pub fn with_set(mut self, item_set: u64, pages: Vec<Page>) -> Self {
        self.sets.insert(ItemSetId::from(item_set), pages);
        self
    }
}

impl DocumentSource for ScriptedSource {
    fn is_incremental(&self) -> bool {
        self.incremental
    }

    fn fetch_page(&mut self, item_set: &ItemSetId, page: u32) -> Result<Vec<Document>, SourceError> {
        self.requests.push((item_set.clone(), page));
        let pages = self
            .sets
            .get(item_set)
            .ok_or_else(|| SourceError::UnknownItemSet(item_set.clone()))?;

        match pages.get(page as usize - 1) {
            None => Ok(Vec::new()),
            Some(Page::Fail(status)) => Err(SourceError::Status {
                status: *status,
                body: "Internal Server Error".to_string(),
            }),
            Some(Page::Docs(docs)) => Ok(docs.clone()),
        }
    }
}

pub fn doc(item_set: u64, id: u64, country: &str, fingerprint: &str, text: &str) -> Document {
    Document::new(
        DocumentId::from(id),
        ItemSetId::from(item_set),
        Country::from(country),
        Some(Fingerprint::new(fingerprint)),
        text.to_string(),
    )
}

/// Tokenizer for tests: whitespace split, nothing filtered.
pub fn whitespace(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_string).collect()
}

pub fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).unwrap()
}

pub fn clock(secs: i64) -> FixedClock {
    FixedClock(at(secs))
}

pub fn settings(countries: &[&str], item_sets: &[u64], prune: PruneConfig) -> PipelineSettings {
    PipelineSettings {
        countries: countries.iter().map(|c| Country::from(*c)).collect(),
        item_sets: item_sets.iter().map(|id| ItemSetId::from(*id)).collect(),
        prune,
    }
}
