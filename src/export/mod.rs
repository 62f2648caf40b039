//! Word-cloud JSON output.
//!
//! Per country: `<country>_word_frequencies.json`, an array of
//! `{"text", "size"}` sorted by size. All countries together:
//! `combined_word_frequencies.json`, an object keyed by country name, and
//! `all_word_frequencies.json`, one list merged across countries.
//! Files are regenerated on every run and never read back.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::frequency::ranking::{rank, ranked};
use crate::json::write_json_atomic;
use crate::types::frequency::{ExportEntry, TokenCounts};
use crate::types::identifiers::Country;

pub const EXPORT_TOP_N: usize = 200;
pub const COMBINED_FILE_NAME: &str = "combined_word_frequencies.json";
pub const ALL_COUNTRIES_FILE_NAME: &str = "all_word_frequencies.json";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// The `top_n` most frequent words, ordered like the pruner orders them.
pub fn top_entries(counts: &TokenCounts, top_n: usize) -> Vec<ExportEntry> {
    ranked(counts)
        .into_iter()
        .take(top_n)
        .map(|(word, count)| ExportEntry {
            text: word.to_string(),
            size: count,
        })
        .collect()
}

pub fn export_file_name(country: &Country) -> String {
    format!("{}_word_frequencies.json", country.file_stem())
}

/// A word across all exported countries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CombinedWord {
    pub text: String,
    pub size: u64,
    pub countries: Vec<Country>,
}

/// Merge per-country exports into one list: sizes are summed and the
/// contributing countries recorded. Ordered by summed size, then word.
pub fn combined_words(exports: &BTreeMap<Country, Vec<ExportEntry>>) -> Vec<CombinedWord> {
    let mut words: BTreeMap<&str, (u64, Vec<Country>)> = BTreeMap::new();
    for (country, entries) in exports {
        for entry in entries {
            let slot = words.entry(entry.text.as_str()).or_insert((0, Vec::new()));
            slot.0 = slot.0.saturating_add(entry.size);
            slot.1.push(country.clone());
        }
    }

    let sizes: Vec<(&str, u64)> = words.iter().map(|(w, (size, _))| (*w, *size)).collect();
    rank(sizes)
        .into_iter()
        .map(|(word, size)| CombinedWord {
            text: word.to_string(),
            size,
            countries: words.get(word).map(|(_, c)| c.clone()).unwrap_or_default(),
        })
        .collect()
}

pub struct Exporter {
    dir: PathBuf,
    top_n: usize,
}

impl Exporter {
    pub fn new(dir: impl Into<PathBuf>, top_n: usize) -> Self {
        Self {
            dir: dir.into(),
            top_n,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Top entries for each given country table.
    pub fn build<'a, I>(&self, tables: I) -> BTreeMap<Country, Vec<ExportEntry>>
    where
        I: IntoIterator<Item = (&'a Country, &'a TokenCounts)>,
    {
        tables
            .into_iter()
            .map(|(country, counts)| (country.clone(), top_entries(counts, self.top_n)))
            .collect()
    }

    /// Write every country file, then the combined and all-countries files.
    /// Returns the written paths in that order.
    pub fn write_all<'a, I>(&self, tables: I) -> Result<Vec<PathBuf>, ExportError>
    where
        I: IntoIterator<Item = (&'a Country, &'a TokenCounts)>,
    {
        let exports = self.build(tables);
        let mut written = Vec::with_capacity(exports.len() + 1);

        for (country, entries) in &exports {
            let path = self.dir.join(export_file_name(country));
            write_export(&path, entries)?;
            info!("Word frequencies for {} saved to {}", country, path.display());
            written.push(path);
        }

        let combined_path = self.dir.join(COMBINED_FILE_NAME);
        write_export(&combined_path, &exports)?;
        info!("Combined word frequencies saved to {}", combined_path.display());
        written.push(combined_path);

        let all_path = self.dir.join(ALL_COUNTRIES_FILE_NAME);
        write_export(&all_path, &combined_words(&exports))?;
        written.push(all_path);

        Ok(written)
    }
}

fn write_export<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), ExportError> {
    write_json_atomic(path, value).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })
}
