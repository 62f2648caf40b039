//! Omeka S REST API client.
//!
//! Items are listed per item set with `GET {base}/items?item_set_id=..&page=..`,
//! authenticated by a key identity / key credential pair passed as query
//! parameters. Only `literal` values of `bibo:content` are read as text.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::debug;

use crate::config::OmekaSettings;
use crate::document::Document;
use crate::source::{DocumentSource, SourceError};
use crate::types::identifiers::{Country, DocumentId, Fingerprint, ItemSetId};

const USER_AGENT: &str = concat!("wordcloud-core/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Deserialize)]
struct OmekaItem {
    #[serde(rename = "o:id")]
    id: u64,
    #[serde(rename = "o:modified", default)]
    modified: Option<OmekaDate>,
    #[serde(rename = "bibo:content", default)]
    content: Vec<OmekaValue>,
}

#[derive(Debug, Deserialize)]
struct OmekaDate {
    #[serde(rename = "@value")]
    value: String,
}

#[derive(Debug, Deserialize)]
struct OmekaValue {
    #[serde(rename = "type")]
    kind: String,
    #[serde(rename = "@value", default)]
    value: Option<String>,
}

pub struct OmekaSource {
    base_url: String,
    key_identity: String,
    key_credential: String,
    client: Client,
    countries: HashMap<ItemSetId, Country>,
}

impl OmekaSource {
    /// `item_sets` maps each country to the item sets holding its documents.
    pub fn new(
        settings: &OmekaSettings,
        item_sets: &BTreeMap<Country, Vec<ItemSetId>>,
    ) -> Result<Self, SourceError> {
        if settings.base_url.trim().is_empty() {
            return Err(SourceError::Unavailable("Omeka base URL is not set".to_string()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| SourceError::Unavailable(format!("failed to build HTTP client: {e}")))?;

        Ok(Self::with_client(client, settings, item_sets))
    }

    /// Like `new`, with a caller-built HTTP client. `timeout_secs` is ignored.
    pub fn with_client(
        client: Client,
        settings: &OmekaSettings,
        item_sets: &BTreeMap<Country, Vec<ItemSetId>>,
    ) -> Self {
        let mut countries = HashMap::new();
        for (country, sets) in item_sets {
            for set in sets {
                countries.insert(set.clone(), country.clone());
            }
        }

        Self {
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            key_identity: settings.key_identity.clone(),
            key_credential: settings.key_credential.clone(),
            client,
            countries,
        }
    }
}

impl DocumentSource for OmekaSource {
    fn is_incremental(&self) -> bool {
        true
    }

    fn fetch_page(&mut self, item_set: &ItemSetId, page: u32) -> Result<Vec<Document>, SourceError> {
        let country = self
            .countries
            .get(item_set)
            .ok_or_else(|| SourceError::UnknownItemSet(item_set.clone()))?;

        let endpoint = format!("{}/items", self.base_url);
        let page_param = page.to_string();
        debug!("GET {} item_set_id={} page={}", endpoint, item_set, page);

        // Request errors carry the URL, which holds the credentials.
        let response = self
            .client
            .get(&endpoint)
            .query(&[
                ("key_identity", self.key_identity.as_str()),
                ("key_credential", self.key_credential.as_str()),
                ("item_set_id", item_set.as_str()),
                ("page", page_param.as_str()),
            ])
            .send()
            .map_err(|e| SourceError::Unavailable(e.without_url().to_string()))?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().unwrap_or_default();
            return Err(SourceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response
            .text()
            .map_err(|e| SourceError::Unavailable(e.without_url().to_string()))?;

        parse_items(&body, item_set, country)
    }
}

/// Turn one page of the items listing into documents.
///
/// The modification timestamp is the fingerprint; items without one are
/// fingerprinted by content.
pub fn parse_items(body: &str, item_set: &ItemSetId, country: &Country) -> Result<Vec<Document>, SourceError> {
    let items: Vec<OmekaItem> =
        serde_json::from_str(body).map_err(|e| SourceError::Malformed(e.to_string()))?;

    Ok(items
        .into_iter()
        .map(|item| {
            let text = item
                .content
                .into_iter()
                .filter(|v| v.kind == "literal")
                .filter_map(|v| v.value)
                .collect::<Vec<_>>()
                .join("\n");

            Document::new(
                DocumentId::from(item.id),
                item_set.clone(),
                country.clone(),
                item.modified.map(|d| Fingerprint::new(d.value)),
                text,
            )
        })
        .collect())
}
