use crate::types::frequency::TokenCounts;

/// Order entries by count descending, then word ascending (byte order).
///
/// Counts alone are not a total order; the word tie-break keeps pruning and
/// export reproducible for identical input.
pub fn rank<'a, I>(entries: I) -> Vec<(&'a str, u64)>
where
    I: IntoIterator<Item = (&'a str, u64)>,
{
    let mut ranked: Vec<(&'a str, u64)> = entries.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    debug_assert!(ranked
        .windows(2)
        .all(|w| w[0].1 > w[1].1 || (w[0].1 == w[1].1 && w[0].0 < w[1].0)));

    ranked
}

pub fn ranked(counts: &TokenCounts) -> Vec<(&str, u64)> {
    rank(counts.iter())
}
