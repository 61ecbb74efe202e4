//! Selection history: the single source of truth for learning signals

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Lossy `{prefix: {value: count}}` view of a history
pub type HistorySnapshot = BTreeMap<String, BTreeMap<String, u64>>;

/// A single observed selection event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// The prefix that was being completed
    pub prefix: String,
    /// The value the user selected
    pub value: String,
    /// Timestamp of the selection
    pub timestamp: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn new(prefix: impl Into<String>, value: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            prefix: prefix.into(),
            value: value.into(),
            timestamp,
        }
    }
}

/// Append-only log of selection events
///
/// `History` is a shared handle: clones observe and append to the same log,
/// which is how the engine, history-backed predictors and learning rankers
/// see one another's selections. There is no internal ordering guarantee
/// between concurrent writers; callers serialize mutation.
#[derive(Debug, Clone, Default)]
pub struct History {
    entries: Arc<RwLock<Vec<HistoryEntry>>>,
}

impl History {
    /// Create a new, empty history
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a history pre-populated with entries
    pub fn with_entries(entries: Vec<HistoryEntry>) -> Self {
        Self {
            entries: Arc::new(RwLock::new(entries)),
        }
    }

    /// Record a selection at the current wall-clock time
    pub fn record(&self, prefix: &str, value: &str) {
        self.record_at(prefix, value, Utc::now());
    }

    /// Record a selection with an explicit timestamp
    pub fn record_at(&self, prefix: &str, value: &str, timestamp: DateTime<Utc>) {
        self.entries
            .write()
            .push(HistoryEntry::new(prefix, value, timestamp));
    }

    /// Replace the whole log. The only operation that may shrink a history.
    pub fn replace(&self, entries: Vec<HistoryEntry>) {
        *self.entries.write() = entries;
    }

    /// Copy of all recorded events, oldest first
    pub fn entries(&self) -> Vec<HistoryEntry> {
        self.entries.read().clone()
    }

    /// Recorded events for a single prefix, oldest first
    pub fn entries_for_prefix(&self, prefix: &str) -> Vec<HistoryEntry> {
        self.entries
            .read()
            .iter()
            .filter(|entry| entry.prefix == prefix)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// How often each value was selected for a given prefix
    pub fn counts_for_prefix(&self, prefix: &str) -> BTreeMap<String, u64> {
        let entries = self.entries.read();
        let mut counts = BTreeMap::new();
        for entry in entries.iter().filter(|e| e.prefix == prefix) {
            *counts.entry(entry.value.clone()).or_insert(0) += 1;
        }
        counts
    }

    /// Like [`History::counts_for_prefix`], restricted to events at or after `since`
    pub fn counts_for_prefix_since(
        &self,
        prefix: &str,
        since: DateTime<Utc>,
    ) -> BTreeMap<String, u64> {
        let entries = self.entries.read();
        let mut counts = BTreeMap::new();
        for entry in entries
            .iter()
            .filter(|e| e.prefix == prefix && e.timestamp >= since)
        {
            *counts.entry(entry.value.clone()).or_insert(0) += 1;
        }
        counts
    }

    /// Total selections of a value across all prefixes
    pub fn count(&self, value: &str) -> u64 {
        self.entries
            .read()
            .iter()
            .filter(|entry| entry.value == value)
            .count() as u64
    }

    /// Serializable `{prefix: {value: count}}` snapshot. Timestamps are dropped.
    pub fn snapshot(&self) -> HistorySnapshot {
        let entries = self.entries.read();
        let mut snapshot = HistorySnapshot::new();
        for entry in entries.iter() {
            *snapshot
                .entry(entry.prefix.clone())
                .or_default()
                .entry(entry.value.clone())
                .or_insert(0) += 1;
        }
        snapshot
    }

    /// Whether two handles refer to the same underlying log
    pub fn ptr_eq(&self, other: &History) -> bool {
        Arc::ptr_eq(&self.entries, &other.entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap()
    }

    #[test]
    fn test_record_entries_in_order() {
        let history = History::new();
        history.record("he", "hello");
        history.record("he", "help");
        history.record("wo", "world");

        let entries = history.entries();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].prefix, "he");
        assert_eq!(entries[0].value, "hello");
        assert_eq!(entries[2].prefix, "wo");
        assert_eq!(entries[2].value, "world");
    }

    #[test]
    fn test_counts_for_prefix() {
        let history = History::new();
        history.record("he", "hello");
        history.record("he", "hello");
        history.record("he", "help");
        history.record("wo", "world");

        let counts = history.counts_for_prefix("he");
        assert_eq!(counts.len(), 2);
        assert_eq!(counts["hello"], 2);
        assert_eq!(counts["help"], 1);
        assert!(history.counts_for_prefix("zz").is_empty());
    }

    #[test]
    fn test_counts_for_prefix_since() {
        let history = History::new();
        history.record_at("he", "hello", t0());
        history.record_at("he", "hello", t0() + Duration::hours(2));
        history.record_at("he", "help", t0() + Duration::hours(3));

        let counts = history.counts_for_prefix_since("he", t0() + Duration::hours(1));
        assert_eq!(counts["hello"], 1);
        assert_eq!(counts["help"], 1);

        let counts = history.counts_for_prefix_since("he", t0() + Duration::hours(3));
        assert!(!counts.contains_key("hello"));
    }

    #[test]
    fn test_count_across_prefixes() {
        let history = History::new();
        history.record("h", "help");
        history.record("he", "help");
        history.record("he", "hello");
        assert_eq!(history.count("help"), 2);
        assert_eq!(history.count("missing"), 0);
    }

    #[test]
    fn test_snapshot_drops_timestamps() {
        let history = History::new();
        history.record_at("he", "hello", t0());
        history.record_at("he", "hello", t0() + Duration::days(3));
        history.record_at("wo", "world", t0());

        let snapshot = history.snapshot();
        assert_eq!(snapshot["he"]["hello"], 2);
        assert_eq!(snapshot["wo"]["world"], 1);
        assert_eq!(snapshot.keys().collect::<Vec<_>>(), vec!["he", "wo"]);
    }

    #[test]
    fn test_clones_share_the_same_log() {
        let history = History::new();
        let shared = history.clone();
        shared.record("he", "help");

        assert_eq!(history.len(), 1);
        assert!(history.ptr_eq(&shared));
        assert!(!history.ptr_eq(&History::new()));
    }

    #[test]
    fn test_replace_is_the_only_way_to_shrink() {
        let history = History::new();
        history.record("he", "hello");
        history.record("he", "help");
        assert_eq!(history.len(), 2);

        history.replace(vec![HistoryEntry::new("wo", "world", t0())]);
        assert_eq!(history.len(), 1);
        assert_eq!(history.entries()[0].value, "world");
    }

    #[test]
    fn test_entries_is_a_copy() {
        let history = History::new();
        history.record("he", "hello");
        let mut copy = history.entries();
        copy.clear();
        assert_eq!(history.len(), 1);
    }
}
