pub mod aggregate;
pub mod prune;
pub mod ranking;

pub use aggregate::{merge, FrequencyAggregator};
pub use prune::{prune, PruneConfig, MAX_WORDS_PER_COUNTRY, MIN_FREQUENCY_THRESHOLD};
pub use ranking::{rank, ranked};
