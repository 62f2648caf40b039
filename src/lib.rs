//! Incremental per-country word-frequency tables for word clouds.
//!
//! `wordcloud-core` fetches documents, skips the ones whose fingerprint has not
//! changed since the last run, merges the token counts of the rest into a
//! persisted per-country table, prunes that table to a bounded size, and
//! exports the top words of every country as JSON. Pruning and export order
//! are deterministic: identical inputs produce identical files.

pub mod cache;
pub mod clock;
pub mod config;
pub mod document;
pub mod export;
pub mod frequency;
pub mod pipeline;
pub mod source;
pub mod tokenize;
pub mod types;

mod json;
