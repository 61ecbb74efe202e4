//! End-to-end scenarios for predictors, rankers and the engine

use aac_completion::{
    CompletionContext, CompletionEngine, CompletionError, DecayFunction, DecayRanker,
    EditDistancePredictor, EngineConfig, FixedClock, History, HistoryPredictor, LearningRanker,
    Predictor, Preset, Ranker, ScoreRanker, ScoredSuggestion, StaticPrefixPredictor,
    TriePrefixPredictor, WeightedPredictor, WeightedRanker,
};
use chrono::{Duration, TimeZone, Utc};
use std::sync::Arc;

fn score_of(results: &[ScoredSuggestion], value: &str) -> f64 {
    results
        .iter()
        .find(|s| s.value() == value)
        .map(|s| s.score)
        .unwrap_or_else(|| panic!("missing suggestion {}", value))
}

#[test]
fn test_static_prefix_scores_by_coverage() {
    let predictor = StaticPrefixPredictor::new(["hello", "help", "helium", "hero"]);
    let results = predictor.predict(&CompletionContext::new("he"));

    assert_eq!(results.len(), 4);
    for word in ["hello", "help", "helium", "hero"] {
        let expected = 2.0 / word.chars().count() as f64;
        assert!((score_of(&results, word) - expected).abs() < 1e-12);
    }
}

#[test]
fn test_trie_prefix_recalls_all_with_neutral_score() {
    let predictor = TriePrefixPredictor::new(["hello", "help", "helium"], 10).unwrap();
    let results = predictor.predict(&CompletionContext::new("he"));

    assert_eq!(results.len(), 3);
    assert!(results.iter().all(|s| s.score == 1.0));
}

#[test]
fn test_history_predictor_prefers_frequent_selection() {
    let history = History::new();
    history.record("he", "hello");
    history.record("he", "hello");
    history.record("he", "help");

    let results = HistoryPredictor::new(history).predict(&CompletionContext::new("he"));
    assert_eq!(score_of(&results, "hello"), 2.0);
    assert_eq!(score_of(&results, "help"), 1.0);
    assert_eq!(results[0].value(), "hello");
}

#[test]
fn test_learning_ranker_promotes_selected_value() {
    let history = History::new();
    history.record("he", "help");
    history.record("he", "help");

    let ranker = LearningRanker::new(history, 1.0).unwrap();
    let ranked = ranker.rank(
        "he",
        &[
            ScoredSuggestion::new("hello", 1.0),
            ScoredSuggestion::new("help", 1.0),
        ],
    );

    assert_eq!(ranked[0].value(), "help");
    assert_eq!(ranked[0].score, 3.0);
    assert_eq!(ranked[1].value(), "hello");
    assert_eq!(ranked[1].score, 1.0);
}

#[test]
fn test_decay_one_half_life_halves_weight() {
    let now = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
    let history = History::new();
    history.record_at("he", "help", now - Duration::seconds(3600));

    let ranker = DecayRanker::new(
        history,
        DecayFunction::new(3600.0).unwrap(),
        1.0,
        Arc::new(FixedClock(now)),
    )
    .unwrap();

    assert_eq!(ranker.recency_weights("he").get("help"), Some(&0.5));
    let ranked = ranker.rank("he", &[ScoredSuggestion::new("help", 1.0)]);
    assert_eq!(ranked[0].score, 1.5);
}

#[test]
fn test_edit_distance_tolerates_one_typo() {
    let predictor = EditDistancePredictor::new(["hello"], 2, 1.0).unwrap();
    let results = predictor.predict(&CompletionContext::new("helo"));

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].value(), "hello");
    assert!((results[0].score - 0.5).abs() < 1e-12);
}

#[test]
fn test_engine_learns_from_selections() {
    let history = History::new();
    let engine = CompletionEngine::new(
        vec![
            StaticPrefixPredictor::new(["hello", "help", "helium", "hero"]).into(),
            WeightedPredictor::new(Arc::new(HistoryPredictor::new(history.clone())), 2.0).unwrap(),
        ],
        vec![
            Arc::new(ScoreRanker) as Arc<dyn Ranker>,
            Arc::new(LearningRanker::balanced(history.clone())),
        ],
        Some(history.clone()),
    );

    assert_eq!(engine.suggest("he").unwrap()[0], "help");

    engine.record_selection("he", "helium");
    engine.record_selection("he", "helium");

    assert_eq!(history.len(), 2);
    assert_eq!(engine.suggest("he").unwrap()[0], "helium");

    let top = &engine.explain("he").unwrap()[0];
    assert_eq!(top.value(), "helium");
    assert!(top.history_boost() > 0.0);
    assert!(top.base_components().contains_key("history"));
}

#[test]
fn test_weighted_ranker_does_not_change_order() {
    let history = History::new();
    history.record("he", "hero");

    let learning: Arc<dyn Ranker> = Arc::new(LearningRanker::new(history.clone(), 1.0).unwrap());
    let plain = CompletionEngine::new(
        vec![StaticPrefixPredictor::new(["hello", "help", "hero"]).into()],
        vec![learning.clone()],
        Some(history.clone()),
    );
    let weighted = CompletionEngine::new(
        vec![StaticPrefixPredictor::new(["hello", "help", "hero"]).into()],
        vec![Arc::new(WeightedRanker::new(learning, 3.0).unwrap()) as Arc<dyn Ranker>],
        Some(history),
    );

    assert_eq!(plain.suggest("he").unwrap(), weighted.suggest("he").unwrap());

    let plain_top = &plain.explain("he").unwrap()[0];
    let weighted_top = &weighted.explain("he").unwrap()[0];
    assert!((weighted_top.final_score() - 3.0 * plain_top.final_score()).abs() < 1e-9);
}

#[test]
fn test_cursor_selects_token() {
    let engine = Preset::Stateless
        .build(History::new(), &EngineConfig::default())
        .unwrap();

    assert!(engine.suggest_at("pr he", 2).unwrap().contains(&"print".to_string()));
    assert!(engine.suggest_at("pr he", 99).unwrap().contains(&"hello".to_string()));
    assert!(engine.suggest_at("pr he", 0).unwrap().is_empty());
}

#[test]
fn test_unknown_preset_reports_choices() {
    let err = "fastest".parse::<Preset>().unwrap_err();
    assert!(matches!(err, CompletionError::UnknownPreset { .. }));
    assert!(err.to_string().contains("default, developer, recency, robust, stateless"));
}

#[test]
fn test_robust_preset_recovers_from_typo() {
    let engine = Preset::Robust
        .build(History::new(), &EngineConfig::default())
        .unwrap();
    assert!(engine.suggest("helo").unwrap().contains(&"hello".to_string()));

    let stateless = Preset::Stateless
        .build(History::new(), &EngineConfig::default())
        .unwrap();
    assert!(!stateless.suggest("helo").unwrap().contains(&"hello".to_string()));
}

#[test]
fn test_recency_preset_prefers_recent_selection() {
    let now = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
    let history = History::new();
    history.record_at("pr", "private", now - Duration::days(7));
    history.record_at("pr", "private", now - Duration::days(7));
    history.record_at("pr", "priority", now - Duration::seconds(5));

    let engine = Preset::Recency
        .build_with_clock(history, &EngineConfig::default(), Arc::new(FixedClock(now)))
        .unwrap();
    assert_eq!(engine.suggest("pr").unwrap()[0], "priority");
}

#[test]
fn test_empty_input_never_suggests_from_history() {
    let history = History::new();
    let engine = Preset::Developer
        .build(history.clone(), &EngineConfig::default())
        .unwrap();

    engine.record_selection("", "hello");
    assert!(history.is_empty());
    assert!(engine.suggest("").unwrap().is_empty());

    history.record("", "hello");
    assert!(engine.suggest("").unwrap().is_empty());
}
