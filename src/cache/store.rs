use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, warn};

use crate::cache::records::{CacheSnapshot, DocumentCache, FrequencyCache};
use crate::json::{read_json, write_json_atomic};

pub const ITEMS_CACHE_FILE: &str = "items_cache.json";
pub const PROCESSED_CACHE_FILE: &str = "processed_cache.json";

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Cache file is corrupt: {path}: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Durable storage for the fingerprint and frequency caches.
///
/// `load` on a store that has never been saved returns empty caches.
pub trait CacheStore {
    fn load(&self) -> Result<CacheSnapshot, CacheError>;

    fn save(&self, documents: &DocumentCache, frequencies: &FrequencyCache) -> Result<(), CacheError>;
}

/// Two pretty-printed JSON files in one directory.
///
/// Each file is replaced atomically: written to a temp file next to it,
/// synced, then renamed over the old one. A run that dies before `save`
/// leaves the previous files untouched.
#[derive(Debug, Clone)]
pub struct JsonCacheStore {
    dir: PathBuf,
    reset_on_corrupt: bool,
}

impl JsonCacheStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            reset_on_corrupt: false,
        }
    }

    /// Start from an empty cache instead of failing when a file cannot be parsed.
    pub fn with_reset_on_corrupt(mut self, reset: bool) -> Self {
        self.reset_on_corrupt = reset;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn items_path(&self) -> PathBuf {
        self.dir.join(ITEMS_CACHE_FILE)
    }

    pub fn processed_path(&self) -> PathBuf {
        self.dir.join(PROCESSED_CACHE_FILE)
    }

    fn read_or_default<T>(&self, path: &Path) -> Result<T, CacheError>
    where
        T: DeserializeOwned + Default,
    {
        let parsed = read_json(path).map_err(|source| CacheError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        match parsed {
            None => {
                debug!("No cache file at {}, starting empty", path.display());
                Ok(T::default())
            }
            Some(Ok(value)) => Ok(value),
            Some(Err(source)) if self.reset_on_corrupt => {
                warn!("Discarding corrupt cache file {}: {}", path.display(), source);
                Ok(T::default())
            }
            Some(Err(source)) => Err(CacheError::Corrupt {
                path: path.to_path_buf(),
                source,
            }),
        }
    }
}

impl CacheStore for JsonCacheStore {
    fn load(&self) -> Result<CacheSnapshot, CacheError> {
        let documents: DocumentCache = self.read_or_default(&self.items_path())?;
        let frequencies: FrequencyCache = self.read_or_default(&self.processed_path())?;

        debug!(
            "Loaded cache: {} documents, {} countries",
            documents.len(),
            frequencies.len()
        );

        Ok(CacheSnapshot {
            documents,
            frequencies,
        })
    }

    fn save(&self, documents: &DocumentCache, frequencies: &FrequencyCache) -> Result<(), CacheError> {
        let items_path = self.items_path();
        write_json_atomic(&items_path, documents).map_err(|source| CacheError::Io {
            path: items_path,
            source,
        })?;

        let processed_path = self.processed_path();
        write_json_atomic(&processed_path, frequencies).map_err(|source| CacheError::Io {
            path: processed_path,
            source,
        })?;

        Ok(())
    }
}
