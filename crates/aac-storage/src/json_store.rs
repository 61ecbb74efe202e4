//! JSON file store for history snapshots

use crate::error::{IoOperation, StorageError, StorageResult};
use aac_completion::{History, HistoryEntry};
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Largest count replayed for a single prefix/value pair
///
/// Every counted selection becomes one in-memory entry, so larger counts are
/// skipped rather than allowed to exhaust memory at startup.
pub const MAX_REPLAY_PER_ENTRY: u64 = 100_000;

/// A persisted entry that could not be loaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    pub prefix: Option<String>,
    pub value: Option<String>,
    pub reason: String,
}

/// Outcome of a best-effort load
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HydrationReport {
    /// Number of selection events replayed into the history
    pub replayed: u64,
    pub skipped: Vec<SkippedEntry>,
}

impl HydrationReport {
    /// Whether every persisted entry was loaded
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }

    fn skip(&mut self, prefix: Option<&str>, value: Option<&str>, reason: impl Into<String>) {
        let entry = SkippedEntry {
            prefix: prefix.map(str::to_string),
            value: value.map(str::to_string),
            reason: reason.into(),
        };
        warn!(
            prefix = ?entry.prefix,
            value = ?entry.value,
            reason = %entry.reason,
            "Skipping malformed persisted history entry"
        );
        self.skipped.push(entry);
    }
}

/// Replay a `{prefix: {value: count}}` document into a fresh [`History`]
///
/// Each count becomes that many selections stamped `loaded_at`. Malformed
/// parts, and counts above [`MAX_REPLAY_PER_ENTRY`], are skipped and
/// reported; they never abort the load.
pub fn hydrate(document: &Value, loaded_at: DateTime<Utc>) -> (History, HydrationReport) {
    let mut report = HydrationReport::default();
    let mut entries = Vec::new();

    let Some(prefixes) = document.as_object() else {
        report.skip(None, None, "top-level value is not an object");
        return (History::new(), report);
    };

    for (prefix, values) in prefixes {
        let Some(values) = values.as_object() else {
            report.skip(Some(prefix), None, "prefix entry is not an object");
            continue;
        };

        for (value, count) in values {
            let Some(count) = count.as_u64() else {
                report.skip(
                    Some(prefix),
                    Some(value),
                    format!("count {} is not a non-negative integer", count),
                );
                continue;
            };
            if count > MAX_REPLAY_PER_ENTRY {
                report.skip(
                    Some(prefix),
                    Some(value),
                    format!("count {} exceeds the replay limit {}", count, MAX_REPLAY_PER_ENTRY),
                );
                continue;
            }
            for _ in 0..count {
                entries.push(HistoryEntry::new(prefix.as_str(), value.as_str(), loaded_at));
            }
            report.replayed = report.replayed.saturating_add(count);
        }
    }

    (History::with_entries(entries), report)
}

/// History persisted as a single JSON file
#[derive(Debug, Clone)]
pub struct JsonHistoryStore {
    path: PathBuf,
}

impl JsonHistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the history, discarding the hydration report
    ///
    /// A missing file yields an empty history.
    pub fn load(&self) -> StorageResult<History> {
        self.load_with_report().map(|(history, _)| history)
    }

    /// Load the history and report what had to be skipped
    ///
    /// # Errors
    ///
    /// Fails when the file exists but cannot be read or is not valid JSON.
    pub fn load_with_report(&self) -> StorageResult<(History, HydrationReport)> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "No history file, starting empty");
            return Ok((History::new(), HydrationReport::default()));
        }

        let content = std::fs::read_to_string(&self.path)
            .map_err(|e| StorageError::io_error(self.path.clone(), IoOperation::Read, e))?;
        let document: Value = serde_json::from_str(&content)
            .map_err(|e| StorageError::parse_error(self.path.clone(), "json", e.to_string()))?;

        let (history, report) = hydrate(&document, Utc::now());
        debug!(
            path = %self.path.display(),
            replayed = report.replayed,
            skipped = report.skipped.len(),
            "Loaded history"
        );
        Ok((history, report))
    }

    /// Write the history snapshot as pretty JSON with sorted keys
    ///
    /// Parent directories are created as needed.
    pub fn save(&self, history: &History) -> StorageResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| StorageError::directory_creation_failed(parent.to_path_buf(), e))?;
        }

        let content = serde_json::to_string_pretty(&history.snapshot())
            .map_err(|e| StorageError::parse_error(self.path.clone(), "json", e.to_string()))?;
        std::fs::write(&self.path, content)
            .map_err(|e| StorageError::io_error(self.path.clone(), IoOperation::Write, e))?;

        debug!(path = %self.path.display(), events = history.len(), "Saved history");
        Ok(())
    }
}
