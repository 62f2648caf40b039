pub mod detection;
pub mod records;
pub mod store;

pub use detection::ChangeDetector;
pub use records::{CacheSnapshot, CountryFrequencyRecord, DocumentCache, FingerprintEntry, FrequencyCache};
pub use store::{CacheError, CacheStore, JsonCacheStore, ITEMS_CACHE_FILE, PROCESSED_CACHE_FILE};
