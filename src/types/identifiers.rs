use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use sha2::{Digest, Sha256};

/// Identifier of a document inside its item set.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    pub fn new(id: impl Into<String>) -> Self {
        DocumentId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<u64> for DocumentId {
    fn from(id: u64) -> Self {
        DocumentId(id.to_string())
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A named group of documents fetched as a unit.
///
/// Remote item sets are numeric, corpus splits are names. Both are kept as
/// strings, which is also how they appear as keys in the fingerprint cache.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ItemSetId(String);

impl ItemSetId {
    pub fn new(id: impl Into<String>) -> Self {
        ItemSetId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<u64> for ItemSetId {
    fn from(id: u64) -> Self {
        ItemSetId(id.to_string())
    }
}

impl From<&str> for ItemSetId {
    fn from(id: &str) -> Self {
        ItemSetId(id.to_string())
    }
}

impl fmt::Display for ItemSetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// Config files list item sets as bare integers, cache files key them by string.
impl<'de> Deserialize<'de> for ItemSetId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(u64),
            Text(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Number(n) => ItemSetId(n.to_string()),
            Raw::Text(s) => ItemSetId(s),
        })
    }
}

/// Country label attached to documents by their source.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Country(String);

impl Country {
    pub fn new(name: impl Into<String>) -> Self {
        Country(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Lowercased name with spaces and path separators replaced by
    /// underscores. Diacritics and other punctuation are kept as-is.
    pub fn file_stem(&self) -> String {
        self.0
            .to_lowercase()
            .chars()
            .map(|c| if c == ' ' || c == '/' || c == '\\' { '_' } else { c })
            .collect()
    }
}

impl From<&str> for Country {
    fn from(name: &str) -> Self {
        Country(name.to_string())
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque change marker, compared for equality only.
///
/// Usually the source's modification timestamp; falls back to a content hash
/// when the source has none.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn new(value: impl Into<String>) -> Self {
        Fingerprint(value.into())
    }

    pub fn from_content(content: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(content);

        let hash = hasher.finalize();
        let hex = hex::encode(hash);

        Fingerprint(format!("sha256:{hex}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
