pub mod frequency;
pub mod identifiers;

pub use frequency::{ExportEntry, TokenCounts};
pub use identifiers::{Country, DocumentId, Fingerprint, ItemSetId};
