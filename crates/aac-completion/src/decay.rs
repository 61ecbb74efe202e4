//! Recency-aware ranking through exponential time decay

use crate::clock::Clock;
use crate::error::{ensure_non_negative, CompletionError, CompletionResult};
use crate::explanation::RankingExplanation;
use crate::history::History;
use crate::ranker::{apply_boosts, boosted_explanations, Boosted, Ranker};
use crate::types::ScoredSuggestion;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Exponential half-life decay
///
/// An event `half_life_seconds` old weighs 0.5, twice that 0.25, and so on.
/// Events at or after `now` weigh 1.0. Weights stay in `(0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecayFunction {
    half_life_seconds: f64,
}

impl DecayFunction {
    /// # Errors
    ///
    /// Returns [`CompletionError::Configuration`] unless the half-life is finite and positive.
    pub fn new(half_life_seconds: f64) -> CompletionResult<Self> {
        if !half_life_seconds.is_finite() || half_life_seconds <= 0.0 {
            return Err(CompletionError::Configuration(format!(
                "decay half_life_seconds must be positive (got {})",
                half_life_seconds
            )));
        }
        Ok(Self { half_life_seconds })
    }

    pub fn half_life_seconds(&self) -> f64 {
        self.half_life_seconds
    }

    /// Weight of an event `elapsed_seconds` old
    pub fn weight_for_elapsed(&self, elapsed_seconds: f64) -> f64 {
        if elapsed_seconds.is_nan() || elapsed_seconds <= 0.0 {
            return 1.0;
        }
        0.5f64
            .powf(elapsed_seconds / self.half_life_seconds)
            .max(f64::MIN_POSITIVE)
    }

    /// Weight at `now` of an event that happened at `event_time`
    pub fn weight(&self, now: DateTime<Utc>, event_time: DateTime<Utc>) -> f64 {
        if event_time >= now {
            return 1.0;
        }
        let elapsed = now.signed_duration_since(event_time);
        let elapsed_seconds = match elapsed.num_microseconds() {
            Some(micros) => micros as f64 / 1e6,
            // microseconds overflow beyond ~292k years
            None => elapsed.num_milliseconds() as f64 / 1e3,
        };
        self.weight_for_elapsed(elapsed_seconds)
    }
}

/// Boosts suggestions by how recently they were selected for the prefix
///
/// Each matching history entry contributes its decay weight; the per-value
/// sum times `weight` is added to the base score. Time comes from the
/// injected [`Clock`]. Without matching history the ranker is the identity.
pub struct DecayRanker {
    history: History,
    decay: DecayFunction,
    weight: f64,
    clock: Arc<dyn Clock>,
}

impl DecayRanker {
    pub const NAME: &'static str = "decay";

    /// # Errors
    ///
    /// Returns [`CompletionError::Configuration`] for a negative or non-finite weight.
    pub fn new(
        history: History,
        decay: DecayFunction,
        weight: f64,
        clock: Arc<dyn Clock>,
    ) -> CompletionResult<Self> {
        ensure_non_negative("decay weight", weight)?;
        Ok(Self {
            history,
            decay,
            weight,
            clock,
        })
    }

    pub fn decay(&self) -> DecayFunction {
        self.decay
    }

    /// Decayed selection weight per value for `prefix`, as of the clock's now
    pub fn recency_weights(&self, prefix: &str) -> HashMap<String, f64> {
        let now = self.clock.now();
        let mut weights: HashMap<String, f64> = HashMap::new();
        for entry in self.history.entries_for_prefix(prefix) {
            *weights.entry(entry.value).or_insert(0.0) += self.decay.weight(now, entry.timestamp);
        }
        weights
    }

    /// `None` when no suggestion has a matching history entry
    fn boosted(&self, prefix: &str, suggestions: &[ScoredSuggestion]) -> Option<Vec<Boosted>> {
        let weights = self.recency_weights(prefix);
        if !suggestions.iter().any(|s| weights.contains_key(s.value())) {
            return None;
        }

        let boosts: Vec<f64> = suggestions
            .iter()
            .map(|s| weights.get(s.value()).copied().unwrap_or(0.0) * self.weight)
            .collect();
        Some(apply_boosts(suggestions, &boosts, |boost| {
            format!("decay boost={:.3}", boost)
        }))
    }
}

impl fmt::Debug for DecayRanker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecayRanker")
            .field("decay", &self.decay)
            .field("weight", &self.weight)
            .field("history_len", &self.history.len())
            .finish()
    }
}

impl Ranker for DecayRanker {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn rank(&self, prefix: &str, suggestions: &[ScoredSuggestion]) -> Vec<ScoredSuggestion> {
        match self.boosted(prefix, suggestions) {
            Some(boosted) => boosted.into_iter().map(|b| b.suggestion).collect(),
            None => suggestions.to_vec(),
        }
    }

    fn explain(&self, prefix: &str, suggestions: &[ScoredSuggestion]) -> Vec<RankingExplanation> {
        match self.boosted(prefix, suggestions) {
            Some(boosted) => boosted_explanations(boosted, Self::NAME),
            None => suggestions
                .iter()
                .map(|s| RankingExplanation::from_scores(s.value(), s.score, 0.0, Self::NAME))
                .collect(),
        }
    }

    fn history(&self) -> Option<&History> {
        Some(&self.history)
    }
}
