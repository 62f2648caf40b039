//! Bulk corpus loader.
//!
//! A dataset lives on disk as `<root>/<dataset>[/<subset>]/<split>.jsonl`,
//! one JSON object per line holding pre-lemmatized text and a country label.
//! Each split is an item set. Rows have no change marker, so the source is
//! not incremental.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;

use serde_json::Value;
use tracing::{info, warn};

use crate::config::CorpusSettings;
use crate::document::Document;
use crate::source::{DocumentSource, SourceError};
use crate::types::identifiers::{Country, DocumentId, ItemSetId};

pub struct CorpusSource {
    settings: CorpusSettings,
    loaded: HashMap<ItemSetId, Vec<Document>>,
}

impl CorpusSource {
    pub fn new(settings: CorpusSettings) -> Self {
        Self {
            settings,
            loaded: HashMap::new(),
        }
    }

    /// Item sets served by this source, in configured order.
    pub fn item_sets(&self) -> Vec<ItemSetId> {
        self.settings.splits.iter().map(|s| ItemSetId::new(s.as_str())).collect()
    }

    pub fn split_path(&self, split: &str) -> PathBuf {
        let mut path = self.settings.root.join(&self.settings.dataset);
        if let Some(subset) = &self.settings.subset {
            path.push(subset);
        }
        path.join(format!("{split}.jsonl"))
    }

    fn load_split(&self, item_set: &ItemSetId) -> Result<Vec<Document>, SourceError> {
        if !self.settings.splits.iter().any(|s| s == item_set.as_str()) {
            return Err(SourceError::UnknownItemSet(item_set.clone()));
        }

        let path = self.split_path(item_set.as_str());
        let reader = BufReader::new(File::open(&path)?);
        let mut documents = Vec::new();

        // Bytes, not lines: a row with invalid UTF-8 is skipped like any other
        // undecodable row instead of failing the split.
        for (index, line) in reader.split(b'\n').enumerate() {
            let line = line?;
            if line.iter().all(u8::is_ascii_whitespace) {
                continue;
            }

            let row: Value = match serde_json::from_slice(&line) {
                Ok(row) => row,
                Err(e) => {
                    warn!("Skipping row {} of {}: {}", index + 1, path.display(), e);
                    continue;
                }
            };

            match self.row_to_document(&row, item_set, index) {
                Some(doc) => documents.push(doc),
                None => warn!(
                    "Skipping row {} of {}: missing '{}' or '{}'",
                    index + 1,
                    path.display(),
                    self.settings.text_field,
                    self.settings.country_field
                ),
            }
        }

        info!("Loaded {} rows from {}", documents.len(), path.display());
        Ok(documents)
    }

    fn row_to_document(&self, row: &Value, item_set: &ItemSetId, index: usize) -> Option<Document> {
        let country = row.get(&self.settings.country_field)?.as_str()?;
        let text = match row.get(&self.settings.text_field)? {
            Value::String(s) => s.clone(),
            // Already split into lemmas.
            Value::Array(items) => items
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join(" "),
            _ => return None,
        };

        Some(Document::new(
            DocumentId::new(index.to_string()),
            item_set.clone(),
            Country::new(country),
            None,
            text,
        ))
    }
}

impl DocumentSource for CorpusSource {
    fn is_incremental(&self) -> bool {
        false
    }

    fn fetch_page(&mut self, item_set: &ItemSetId, page: u32) -> Result<Vec<Document>, SourceError> {
        if !self.loaded.contains_key(item_set) {
            let documents = self.load_split(item_set)?;
            self.loaded.insert(item_set.clone(), documents);
        }

        let rows = match self.loaded.get(item_set) {
            Some(rows) => rows,
            None => return Ok(Vec::new()),
        };

        let page_size = self.settings.page_size.max(1);
        let start = (page.max(1) as usize - 1).saturating_mul(page_size);
        Ok(rows.iter().skip(start).take(page_size).cloned().collect())
    }
}
