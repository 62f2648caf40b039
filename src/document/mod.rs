pub mod document;

pub use crate::types::identifiers::{Country, DocumentId, Fingerprint, ItemSetId};
pub use document::Document;
