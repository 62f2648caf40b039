use crate::cache::records::{DocumentCache, FingerprintEntry};
use crate::clock::Clock;
use crate::document::Document;
use crate::types::identifiers::{DocumentId, Fingerprint, ItemSetId};

/// Decides whether a fetched document has to be (re)processed.
///
/// A document is new or changed when the cache holds no entry for
/// `(item_set, id)` or holds a different fingerprint. Detection records the
/// new fingerprint immediately, before the document is counted. A run that
/// fails after detection therefore does not reprocess the document next time.
///
/// Fingerprints are compared for equality only. A document deleted and
/// recreated with a fingerprint equal to its stale entry reads as unchanged.
pub struct ChangeDetector<C> {
    clock: C,
}

impl<C: Clock> ChangeDetector<C> {
    pub fn new(clock: C) -> Self {
        Self { clock }
    }

    pub fn detect(
        &self,
        cache: &mut DocumentCache,
        item_set: &ItemSetId,
        id: &DocumentId,
        fingerprint: &Fingerprint,
    ) -> bool {
        if let Some(entry) = cache.get(item_set, id) {
            if entry.fingerprint == *fingerprint {
                return false;
            }
        }

        cache.insert(
            item_set.clone(),
            id.clone(),
            FingerprintEntry {
                fingerprint: fingerprint.clone(),
                processed_at: self.clock.now(),
            },
        );
        true
    }

    pub fn detect_document(&self, cache: &mut DocumentCache, document: &Document) -> bool {
        self.detect(cache, &document.item_set, &document.id, &document.fingerprint)
    }
}
