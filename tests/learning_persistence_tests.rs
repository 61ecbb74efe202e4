//! Learning survives a save/load cycle through the JSON store

use aac_cli::output::OutputStyle;
use aac_cli::{Session, SessionOptions};
use aac_completion::{EngineConfig, FixedClock, History, Preset};
use aac_storage::JsonHistoryStore;
use chrono::{Duration, Utc};
use proptest::prelude::*;
use std::sync::Arc;
use tempfile::TempDir;

fn options(history: &std::path::Path, preset: &str) -> SessionOptions {
    SessionOptions {
        config: None,
        history: history.to_path_buf(),
        preset: preset.to_string(),
        limit: 10,
        style: OutputStyle::plain(),
    }
}

#[test]
fn test_learned_order_survives_restart() {
    let dir = TempDir::new().unwrap();
    let store = JsonHistoryStore::new(dir.path().join("history.json"));
    let config = EngineConfig::default();

    let engine = Preset::Default.build(store.load().unwrap(), &config).unwrap();
    assert_eq!(engine.suggest("he").unwrap()[0], "help");

    engine.record_selection("he", "helium");
    engine.record_selection("he", "helium");
    let learned = engine.suggest("he").unwrap();
    assert_eq!(learned[0], "helium");
    store.save(engine.history()).unwrap();

    let restarted = Preset::Default.build(store.load().unwrap(), &config).unwrap();
    assert_eq!(restarted.suggest("he").unwrap(), learned);
    assert_eq!(restarted.history().count("helium"), 2);
}

#[test]
fn test_reloaded_history_loses_recency() {
    let dir = TempDir::new().unwrap();
    let store = JsonHistoryStore::new(dir.path().join("history.json"));
    let now = Utc::now();

    let history = History::new();
    history.record_at("pr", "private", now - Duration::days(30));
    history.record_at("pr", "priority", now - Duration::seconds(1));
    store.save(&history).unwrap();

    let loaded = store.load().unwrap();
    let entries = loaded.entries();
    assert_eq!(entries.len(), 2);
    assert!(entries.iter().all(|e| e.timestamp == entries[0].timestamp));
    assert!(entries[0].timestamp >= now);

    let clock = Arc::new(FixedClock(entries[0].timestamp));
    let engine = Preset::Recency
        .build_with_clock(loaded, &EngineConfig::default(), clock)
        .unwrap();
    let explanations = engine.explain("pr").unwrap();
    let boost_of = |value: &str| {
        explanations
            .iter()
            .find(|e| e.value() == value)
            .map(|e| e.history_boost())
            .unwrap()
    };
    assert_eq!(boost_of("private"), boost_of("priority"));
}

#[test]
fn test_session_reports_skipped_entries() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("history.json");
    std::fs::write(&path, r#"{"he": {"hero": 3, "help": "often"}}"#).unwrap();

    let session = Session::open(&options(&path, "developer")).unwrap();
    assert_eq!(session.hydration_report().replayed, 3);
    assert_eq!(session.hydration_report().skipped.len(), 1);
    assert_eq!(session.engine().suggest("he").unwrap()[0], "hero");
}

#[test]
fn test_session_select_then_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("history.json");

    let session = Session::open(&options(&path, "robust")).unwrap();
    session.engine().record_selection("say he", "hero");
    session.save_history().unwrap();

    let reopened = Session::open(&options(&path, "robust")).unwrap();
    assert!(reopened.hydration_report().is_clean());
    assert_eq!(reopened.engine().history().counts_for_prefix("he").get("hero"), Some(&1));
    assert_eq!(reopened.engine().suggest("he").unwrap()[0], "hero");
}

proptest! {
    /// Property: a developer engine ranks identically before and after a restart
    #[test]
    fn prop_restart_preserves_ranking(
        selections in prop::collection::vec(0usize..4, 0..12),
        prefix in prop::sample::select(vec!["he", "pr", "h", "p"]),
    ) {
        let words = ["hello", "help", "private", "print"];
        let dir = TempDir::new().unwrap();
        let store = JsonHistoryStore::new(dir.path().join("history.json"));
        let config = EngineConfig::default();

        let engine = Preset::Developer.build(History::new(), &config).unwrap();
        for index in selections {
            engine.record_selection(prefix, words[index]);
        }
        store.save(engine.history()).unwrap();

        let restarted = Preset::Developer.build(store.load().unwrap(), &config).unwrap();
        prop_assert_eq!(engine.suggest(prefix).unwrap(), restarted.suggest(prefix).unwrap());
        prop_assert_eq!(engine.history().snapshot(), restarted.history().snapshot());
    }
}
