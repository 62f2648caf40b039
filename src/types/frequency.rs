use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Word frequencies for one country.
///
/// Backed by a `BTreeMap` so that serialized tables are key-sorted and
/// byte-identical across runs.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenCounts {
    inner: BTreeMap<String, u64>,
}

impl TokenCounts {
    pub fn new() -> Self {
        TokenCounts {
            inner: BTreeMap::new(),
        }
    }

    /// Count every token once.
    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut counts = TokenCounts::new();
        counts.add_tokens(tokens);
        counts
    }

    pub fn add(&mut self, word: impl Into<String>, count: u64) {
        let entry = self.inner.entry(word.into()).or_insert(0);
        *entry = entry.saturating_add(count);
    }

    pub fn add_tokens<I, S>(&mut self, tokens: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for token in tokens {
            self.add(token, 1);
        }
    }

    /// Add every count of `other` into this table.
    pub fn merge(&mut self, other: &TokenCounts) {
        for (word, count) in &other.inner {
            self.add(word.clone(), *count);
        }
    }

    pub fn get(&self, word: &str) -> Option<u64> {
        self.inner.get(word).copied()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.inner.values().fold(0u64, |acc, c| acc.saturating_add(*c))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.inner.iter().map(|(w, c)| (w.as_str(), *c))
    }
}

impl FromIterator<(String, u64)> for TokenCounts {
    fn from_iter<I: IntoIterator<Item = (String, u64)>>(iter: I) -> Self {
        let mut counts = TokenCounts::new();
        for (word, count) in iter {
            counts.add(word, count);
        }
        counts
    }
}

/// One word of an exported word cloud.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportEntry {
    pub text: String,
    pub size: u64,
}
