//! Document providers.
//!
//! Every source is read page by page through `DocumentSource::fetch_page`;
//! `fetch_item_set` drives the pagination for one item set.

pub mod corpus;
pub mod omeka;

use thiserror::Error;
use tracing::{debug, warn};

use crate::document::Document;
use crate::types::identifiers::ItemSetId;

pub use corpus::CorpusSource;
pub use omeka::OmekaSource;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Source unavailable: {0}")]
    Unavailable(String),
    #[error("Source returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Malformed source data: {0}")]
    Malformed(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Unknown item set: {0}")]
    UnknownItemSet(ItemSetId),
}

pub trait DocumentSource {
    /// Whether fingerprints identify unchanged documents across runs.
    /// Non-incremental sources hand out every document as new on every run.
    fn is_incremental(&self) -> bool;

    /// Documents of one page, pages numbered from 1. An empty page means the
    /// item set is exhausted.
    fn fetch_page(&mut self, item_set: &ItemSetId, page: u32) -> Result<Vec<Document>, SourceError>;
}

impl<S: DocumentSource + ?Sized> DocumentSource for Box<S> {
    fn is_incremental(&self) -> bool {
        (**self).is_incremental()
    }

    fn fetch_page(&mut self, item_set: &ItemSetId, page: u32) -> Result<Vec<Document>, SourceError> {
        (**self).fetch_page(item_set, page)
    }
}

/// Result of reading one item set to its end, or to its first failure.
#[derive(Debug)]
pub struct FetchOutcome {
    pub documents: Vec<Document>,
    pub pages_fetched: u32,
    pub failure: Option<SourceError>,
}

/// Read every page of `item_set` in order.
///
/// Stops at the first empty page. A failing page stops the loop as well, with
/// no retry: documents from earlier pages are kept and the error is returned
/// in `failure`.
pub fn fetch_item_set<S>(source: &mut S, item_set: &ItemSetId) -> FetchOutcome
where
    S: DocumentSource + ?Sized,
{
    let mut documents = Vec::new();
    let mut page = 1;
    let mut failure = None;

    loop {
        match source.fetch_page(item_set, page) {
            Ok(batch) if batch.is_empty() => break,
            Ok(batch) => {
                debug!("Item set {}: page {} has {} documents", item_set, page, batch.len());
                documents.extend(batch);
                page += 1;
            }
            Err(e) => {
                warn!("Failed to retrieve page {} of item set {}: {}", page, item_set, e);
                failure = Some(e);
                break;
            }
        }
    }

    FetchOutcome {
        documents,
        pages_fetched: page - 1,
        failure,
    }
}
