//! Property-based tests for aggregation, ranking and explanations

use aac_completion::{
    CompletionContext, DecayFunction, DecayRanker, EngineConfig, FixedClock, History,
    LearningRanker, Preset, Ranker, ScoreRanker, ScoredSuggestion, EXPLANATION_EPSILON,
};
use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Distinct suggestion values with arbitrary non-negative scores, in arbitrary order
fn suggestions_strategy() -> impl Strategy<Value = Vec<ScoredSuggestion>> {
    prop::collection::btree_map("[a-z]{1,6}", 0.0f64..10.0, 0..12)
        .prop_map(|map| {
            map.into_iter()
                .map(|(value, score)| ScoredSuggestion::new(value, score))
                .collect::<Vec<_>>()
        })
        .prop_shuffle()
}

fn words_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-d]{1,5}", 1..20)
}

fn scores_by_value(suggestions: &[ScoredSuggestion]) -> BTreeMap<String, f64> {
    suggestions
        .iter()
        .map(|s| (s.value().to_string(), s.score))
        .collect()
}

proptest! {
    /// Property: without history for the prefix, learning changes nothing
    #[test]
    fn prop_learning_without_signal_is_stable(
        input in suggestions_strategy(),
        boost in 0.0f64..5.0,
        unrelated in prop::collection::vec("[a-z]{1,6}", 0..5),
    ) {
        let history = History::new();
        for value in &unrelated {
            history.record("zz-other", value);
        }

        let ranker = LearningRanker::new(history, boost).unwrap();
        prop_assert_eq!(ranker.rank("pre", &input), input);
    }

    /// Property: learning never lowers a score
    #[test]
    fn prop_learning_boosts_are_non_negative(
        input in suggestions_strategy(),
        selections in prop::collection::vec(0usize..12, 0..20),
        boost in 0.0f64..3.0,
        ratio in prop::option::of(0.0f64..2.0),
    ) {
        let history = History::new();
        for index in selections {
            if let Some(s) = input.get(index) {
                history.record("pre", s.value());
            }
        }

        let mut ranker = LearningRanker::new(history, boost).unwrap();
        if let Some(ratio) = ratio {
            ranker = ranker.with_dominance_ratio(ratio).unwrap();
        }

        let before = scores_by_value(&input);
        let ranked = ranker.rank("pre", &input);
        prop_assert_eq!(ranked.len(), input.len());
        for suggestion in &ranked {
            prop_assert!(suggestion.score >= before[suggestion.value()]);
        }
    }

    /// Property: recency never lowers a score, and explanations agree
    #[test]
    fn prop_decay_boosts_are_non_negative(
        input in suggestions_strategy(),
        events in prop::collection::vec((0usize..12, -3_600i64..1_000_000), 0..20),
        half_life in 1.0f64..1e5,
        weight in 0.0f64..3.0,
    ) {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let history = History::new();
        for (index, age) in events {
            if let Some(s) = input.get(index) {
                history.record_at("pre", s.value(), now - Duration::seconds(age));
            }
        }

        let ranker = DecayRanker::new(
            history,
            DecayFunction::new(half_life).unwrap(),
            weight,
            Arc::new(FixedClock(now)),
        )
        .unwrap();

        let before = scores_by_value(&input);
        let ranked = ranker.rank("pre", &input);
        prop_assert_eq!(ranked.len(), input.len());
        for suggestion in &ranked {
            prop_assert!(suggestion.score >= before[suggestion.value()]);
        }
        for explanation in ranker.explain("pre", &input) {
            prop_assert!(explanation.history_boost() >= 0.0);
        }
    }

    /// Property: decay weight is 1 at zero, in (0, 1], and never increases with age
    #[test]
    fn prop_decay_is_monotonic(
        half_life in 1.0f64..1e6,
        elapsed in 0.0f64..1e7,
        extra in 1e-3f64..1e7,
    ) {
        let decay = DecayFunction::new(half_life).unwrap();
        let w1 = decay.weight_for_elapsed(elapsed);
        let w2 = decay.weight_for_elapsed(elapsed + extra);

        prop_assert_eq!(decay.weight_for_elapsed(0.0), 1.0);
        prop_assert!(w2 <= w1);
        prop_assert!(w1 > 0.0 && w1 <= 1.0);
        prop_assert!(w2 > 0.0 && w2 <= 1.0);
    }

    /// Property: sorting by score is idempotent
    #[test]
    fn prop_score_ranker_is_idempotent(input in suggestions_strategy()) {
        let once = ScoreRanker.rank("", &input);
        let twice = ScoreRanker.rank("", &once);
        prop_assert_eq!(once, twice);
    }

    /// Property: every explanation satisfies final = base + boost
    #[test]
    fn prop_engine_explanations_are_consistent(
        words in words_strategy(),
        selections in prop::collection::vec(0usize..20, 0..10),
        prefix in "[a-d]{1,2}",
    ) {
        let config = EngineConfig {
            vocabulary: words.clone(),
            ..EngineConfig::default()
        };
        let history = History::new();
        for index in selections {
            if let Some(word) = words.get(index) {
                history.record(&prefix, word);
            }
        }

        let clock = Arc::new(FixedClock(Utc::now()));
        for preset in Preset::ALL {
            let engine = preset
                .build_with_clock(history.clone(), &config, clock.clone())
                .unwrap();
            let suggestions = engine.suggest(&prefix).unwrap();
            let explanations = engine.explain(&prefix).unwrap();

            let explained: Vec<&str> = explanations.iter().map(|e| e.value()).collect();
            prop_assert_eq!(&suggestions, &explained);
            for explanation in &explanations {
                let diff = explanation.final_score()
                    - (explanation.base_score() + explanation.history_boost());
                prop_assert!(diff.abs() < EXPLANATION_EPSILON);
            }
        }
    }

    /// Property: aggregation is a pure function of its input
    #[test]
    fn prop_aggregation_is_deterministic(
        words in words_strategy(),
        text in "[a-d ]{0,8}",
    ) {
        let config = EngineConfig {
            vocabulary: words,
            ..EngineConfig::default()
        };
        let engine = Preset::Robust.build(History::new(), &config).unwrap();
        let ctx = CompletionContext::new(text);

        prop_assert_eq!(engine.predict_scored(&ctx), engine.predict_scored(&ctx));
    }

    /// Property: rankers keep exactly the values they were given
    #[test]
    fn prop_pipeline_preserves_suggestion_set(
        words in words_strategy(),
        selections in prop::collection::vec(0usize..20, 0..10),
        prefix in "[a-d]{1,2}",
    ) {
        let config = EngineConfig {
            vocabulary: words.clone(),
            ..EngineConfig::default()
        };
        let history = History::new();
        for index in selections {
            if let Some(word) = words.get(index) {
                history.record(&prefix, word);
            }
        }

        let engine = Preset::Developer.build(history, &config).unwrap();
        let state = engine.debug(&prefix).unwrap();

        let mut before: Vec<String> = state.scored.iter().map(|s| s.value().to_string()).collect();
        let mut after = state.suggestions.clone();
        before.sort();
        after.sort();
        prop_assert_eq!(before, after);
    }
}
