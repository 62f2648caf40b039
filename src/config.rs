//! Run configuration.
//!
//! Read from a TOML file. Every section and field has a default, so an empty
//! file is valid apart from the country list. Example:
//!
//! ```toml
//! [source]
//! kind = "omeka"
//! base_url = "https://archive.example.org/api"
//!
//! [countries]
//! "Togo" = [25304, 9458]
//! "Niger" = [62021]
//!
//! [pruning]
//! min_freq = 2
//! max_words = 1000
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::export::EXPORT_TOP_N;
use crate::frequency::PruneConfig;
use crate::pipeline::PipelineSettings;
use crate::types::identifiers::{Country, ItemSetId};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,
    /// Allow-list of countries. For the Omeka source each country lists its
    /// item sets; for the corpus source the lists may be empty.
    #[serde(default)]
    pub countries: BTreeMap<Country, Vec<ItemSetId>>,
    #[serde(default)]
    pub pruning: PruneConfig,
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub tokenizer: TokenizerConfig,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    /// Checks that can only run once environment overrides are applied.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.countries.is_empty() {
            return Err(ConfigError::Invalid("no countries configured".to_string()));
        }

        match &self.source {
            SourceConfig::Omeka(omeka) => {
                if omeka.base_url.trim().is_empty() {
                    return Err(ConfigError::Invalid("source.base_url is empty".to_string()));
                }
                if let Some((country, _)) = self.countries.iter().find(|(_, sets)| sets.is_empty()) {
                    return Err(ConfigError::Invalid(format!(
                        "country {country} has no item sets"
                    )));
                }
            }
            SourceConfig::Corpus(corpus) => {
                if corpus.dataset.trim().is_empty() {
                    return Err(ConfigError::Invalid("source.dataset is empty".to_string()));
                }
                if corpus.splits.is_empty() {
                    return Err(ConfigError::Invalid("source.splits is empty".to_string()));
                }
            }
        }

        if self.export.top_n == 0 {
            return Err(ConfigError::Invalid("export.top_n must be positive".to_string()));
        }

        Ok(())
    }

    pub fn allowed_countries(&self) -> BTreeSet<Country> {
        self.countries.keys().cloned().collect()
    }

    /// Item sets to fetch, in order, without duplicates.
    pub fn item_set_plan(&self) -> Vec<ItemSetId> {
        let candidates: Vec<ItemSetId> = match &self.source {
            SourceConfig::Omeka(_) => self.countries.values().flatten().cloned().collect(),
            SourceConfig::Corpus(corpus) => corpus.splits.iter().map(|s| ItemSetId::new(s.as_str())).collect(),
        };

        let mut seen = BTreeSet::new();
        candidates
            .into_iter()
            .filter(|id| seen.insert(id.clone()))
            .collect()
    }

    pub fn pipeline_settings(&self) -> PipelineSettings {
        PipelineSettings {
            countries: self.countries.keys().cloned().collect(),
            item_sets: self.item_set_plan(),
            prune: self.pruning,
        }
    }

    pub fn cache_dir(&self) -> PathBuf {
        self.paths
            .cache_dir
            .clone()
            .unwrap_or_else(|| self.paths.data_dir.join("cache"))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SourceConfig {
    Omeka(OmekaSettings),
    Corpus(CorpusSettings),
}

impl Default for SourceConfig {
    fn default() -> Self {
        SourceConfig::Omeka(OmekaSettings::default())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OmekaSettings {
    #[serde(default)]
    pub base_url: String,
    #[serde(default)]
    pub key_identity: String,
    #[serde(default)]
    pub key_credential: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for OmekaSettings {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            key_identity: String::new(),
            key_credential: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorpusSettings {
    #[serde(default = "default_corpus_root")]
    pub root: PathBuf,
    #[serde(default)]
    pub dataset: String,
    #[serde(default)]
    pub subset: Option<String>,
    /// Concatenated in this order.
    #[serde(default = "default_splits")]
    pub splits: Vec<String>,
    #[serde(default = "default_text_field")]
    pub text_field: String,
    #[serde(default = "default_country_field")]
    pub country_field: String,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

impl Default for CorpusSettings {
    fn default() -> Self {
        Self {
            root: default_corpus_root(),
            dataset: String::new(),
            subset: None,
            splits: default_splits(),
            text_field: default_text_field(),
            country_field: default_country_field(),
            page_size: default_page_size(),
        }
    }
}

fn default_corpus_root() -> PathBuf {
    PathBuf::from("corpus")
}

fn default_splits() -> Vec<String> {
    vec!["train".to_string()]
}

fn default_text_field() -> String {
    "lemmas".to_string()
}

fn default_country_field() -> String {
    "country".to_string()
}

fn default_page_size() -> usize {
    1000
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            top_n: default_top_n(),
        }
    }
}

fn default_top_n() -> usize {
    EXPORT_TOP_N
}

#[derive(Debug, Clone, Deserialize)]
pub struct PathsConfig {
    /// Export files go here.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Defaults to `<data_dir>/cache`.
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            cache_dir: None,
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct CacheConfig {
    /// Start from empty caches when a cache file cannot be parsed.
    #[serde(default)]
    pub reset_on_corrupt: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenizerConfig {
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default)]
    pub extra_stopwords: Vec<String>,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
            extra_stopwords: Vec::new(),
        }
    }
}

fn default_language() -> String {
    "fr".to_string()
}
