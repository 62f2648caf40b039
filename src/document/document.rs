use serde::{Deserialize, Serialize};

use crate::types::identifiers::{Country, DocumentId, Fingerprint, ItemSetId};

/// A raw document as fetched from a source.
///
/// Identity is `(item_set, id)`. Documents are never mutated after they are
/// built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub item_set: ItemSetId,
    pub country: Country,
    pub fingerprint: Fingerprint,
    pub text: String,
}

impl Document {
    /// Build a document from source data.
    ///
    /// When the source has no change marker of its own, the fingerprint is the
    /// content hash of `text`.
    pub fn new(
        id: DocumentId,
        item_set: ItemSetId,
        country: Country,
        fingerprint: Option<Fingerprint>,
        text: String,
    ) -> Self {
        let fingerprint = fingerprint.unwrap_or_else(|| Fingerprint::from_content(text.as_bytes()));

        Document {
            id,
            item_set,
            country,
            fingerprint,
            text,
        }
    }
}
