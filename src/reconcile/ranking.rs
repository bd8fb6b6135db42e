use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A key and how often it occurred.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedEntry {
    pub key: String,
    pub count: u64,
}

impl RankedEntry {
    #[must_use]
    pub fn new(key: impl Into<String>, count: u64) -> Self {
        Self { key: key.into(), count }
    }
}

/// Count occurrences per key and return the `limit` most frequent.
///
/// Missing and empty keys are ignored. Entries come out by descending count; keys with
/// equal counts keep the order in which they were first seen.
#[must_use]
pub fn aggregate<K: AsRef<str>>(keys: impl IntoIterator<Item = Option<K>>, limit: usize) -> Vec<RankedEntry> {
    rank_counts(keys.into_iter().flatten().map(|key| (key, 1)), limit)
}

/// Rank pre-counted entries the same way [`aggregate`] ranks raw keys.
///
/// Counts for a repeated key are summed at the key's first position.
#[must_use]
pub fn rank_counts<K: AsRef<str>>(counts: impl IntoIterator<Item = (K, u64)>, limit: usize) -> Vec<RankedEntry> {
    let mut entries: Vec<RankedEntry> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for (key, count) in counts {
        let key = key.as_ref();
        if key.is_empty() {
            continue;
        }

        if let Some(&index) = positions.get(key) {
            entries[index].count = entries[index].count.saturating_add(count);
        } else {
            let _ = positions.insert(key.to_string(), entries.len());
            entries.push(RankedEntry::new(key, count));
        }
    }

    // stable: ties stay in first-seen order
    entries.sort_by(|a, b| b.count.cmp(&a.count));
    entries.truncate(limit);
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(raw: &[&str]) -> Vec<Option<String>> {
        raw.iter().map(|k| Some((*k).to_string())).collect()
    }

    #[test]
    fn test_counts_and_sorts_descending() {
        let ranked = aggregate(keys(&["a", "b", "b", "c", "c", "c"]), 10);
        assert_eq!(
            ranked,
            vec![RankedEntry::new("c", 3), RankedEntry::new("b", 2), RankedEntry::new("a", 1)]
        );
    }

    #[test]
    fn test_ties_keep_first_seen_order() {
        let ranked = aggregate(keys(&["172", "10", "8", "10", "172", "8", "165", "9"]), 10);
        let order: Vec<&str> = ranked.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(order, vec!["172", "10", "8", "165", "9"]);
    }

    #[test]
    fn test_truncates_to_limit() {
        let ranked = aggregate(keys(&["a", "b", "c", "d", "e", "f", "g"]), 5);
        assert_eq!(ranked.len(), 5);
        assert!(aggregate(keys(&["a"]), 0).is_empty());
    }

    #[test]
    fn test_ignores_missing_and_empty_keys() {
        let mut raw = keys(&["x", "", "x"]);
        raw.push(None);
        let ranked = aggregate(raw, 5);
        assert_eq!(ranked, vec![RankedEntry::new("x", 2)]);
    }

    #[test]
    fn test_never_ascending() {
        let ranked = aggregate(keys(&["q", "r", "r", "s", "q", "r", "t", "t", "t", "t"]), 3);
        assert!(ranked.len() <= 3);
        assert!(ranked.windows(2).all(|w| w[0].count >= w[1].count));
    }

    #[test]
    fn test_rank_counts_sums_repeated_keys() {
        let ranked = rank_counts(vec![("Chrome", 5), ("Firefox", 7), ("Chrome", 4)], 5);
        assert_eq!(ranked, vec![RankedEntry::new("Chrome", 9), RankedEntry::new("Firefox", 7)]);
    }

    #[test]
    fn test_rank_counts_saturates_huge_counts() {
        let ranked = rank_counts(vec![("Chrome", u64::MAX), ("Chrome", 1), ("Safari", 3)], 5);
        assert_eq!(ranked, vec![RankedEntry::new("Chrome", u64::MAX), RankedEntry::new("Safari", 3)]);
    }

    #[test]
    fn test_empty_input() {
        assert!(aggregate(Vec::<Option<&str>>::new(), 5).is_empty());
    }
}
