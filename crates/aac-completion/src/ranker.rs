//! Ranking strategies applied to aggregated suggestions

use crate::error::{ensure_non_negative, CompletionError, CompletionResult};
use crate::explanation::RankingExplanation;
use crate::history::History;
use crate::types::ScoredSuggestion;
use std::fmt;
use std::sync::Arc;

/// Reorders and rescores aggregated suggestions
///
/// Rankers never mutate their input: `rank` returns a new list. They may
/// change scores but must return exactly the values they were given; the
/// engine checks this after every stage.
pub trait Ranker: Send + Sync {
    /// Stable name, used as explanation source and in traces
    fn name(&self) -> &str;

    /// Order `suggestions` for `prefix`
    fn rank(&self, prefix: &str, suggestions: &[ScoredSuggestion]) -> Vec<ScoredSuggestion>;

    /// Explanations aligned, in order and values, with [`Ranker::rank`]
    fn explain(&self, prefix: &str, suggestions: &[ScoredSuggestion]) -> Vec<RankingExplanation>;

    /// The history this ranker learns from, if any
    fn history(&self) -> Option<&History> {
        None
    }
}

/// A suggestion rescored by an additive boost
pub(crate) struct Boosted {
    pub suggestion: ScoredSuggestion,
    pub base: f64,
    pub boost: f64,
}

/// Apply `boosts[i]` to `suggestions[i]` and stably sort by the new score
///
/// Ties keep their input order. Suggestions with a zero boost are carried over
/// as-is.
pub(crate) fn apply_boosts(
    suggestions: &[ScoredSuggestion],
    boosts: &[f64],
    describe: impl Fn(f64) -> String,
) -> Vec<Boosted> {
    let mut boosted: Vec<Boosted> = suggestions
        .iter()
        .zip(boosts)
        .map(|(suggestion, &boost)| Boosted {
            suggestion: if boost == 0.0 {
                suggestion.clone()
            } else {
                suggestion.rescored(suggestion.score + boost, describe(boost))
            },
            base: suggestion.score,
            boost,
        })
        .collect();
    boosted.sort_by(|a, b| b.suggestion.score.total_cmp(&a.suggestion.score));
    boosted
}

pub(crate) fn boosted_explanations(boosted: Vec<Boosted>, source: &str) -> Vec<RankingExplanation> {
    boosted
        .into_iter()
        .map(|b| {
            let seed = RankingExplanation::from_scores(b.suggestion.value(), b.base, 0.0, source);
            if b.boost == 0.0 {
                seed
            } else {
                seed.apply_history_boost(b.boost, source)
            }
        })
        .collect()
}

fn sort_by_score(suggestions: &[ScoredSuggestion]) -> Vec<ScoredSuggestion> {
    let mut sorted = suggestions.to_vec();
    sorted.sort_by(|a, b| b.score.total_cmp(&a.score));
    sorted
}

/// Stable sort by score, highest first. No learning.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoreRanker;

impl ScoreRanker {
    pub const NAME: &'static str = "score";
}

impl Ranker for ScoreRanker {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn rank(&self, _prefix: &str, suggestions: &[ScoredSuggestion]) -> Vec<ScoredSuggestion> {
        sort_by_score(suggestions)
    }

    fn explain(&self, _prefix: &str, suggestions: &[ScoredSuggestion]) -> Vec<RankingExplanation> {
        sort_by_score(suggestions)
            .iter()
            .map(|s| RankingExplanation::from_scores(s.value(), s.score, 0.0, Self::NAME))
            .collect()
    }
}

/// Boosts suggestions the user selected before for the same prefix
///
/// The boost for a value is `count * boost`, optionally capped by an absolute
/// `max_boost` and by `dominance_ratio * base_score` so learning cannot
/// overwhelm a strong base signal. Counts below `min_samples` are ignored.
///
/// With no history for the prefix the input is returned unchanged, in its
/// original order.
#[derive(Debug, Clone)]
pub struct LearningRanker {
    history: History,
    boost: f64,
    dominance_ratio: Option<f64>,
    max_boost: Option<f64>,
    min_samples: u64,
}

impl LearningRanker {
    pub const NAME: &'static str = "learning";

    /// Create a learning ranker without caps
    ///
    /// # Errors
    ///
    /// Returns [`CompletionError::Configuration`] for a negative or non-finite boost.
    pub fn new(history: History, boost: f64) -> CompletionResult<Self> {
        ensure_non_negative("learning boost", boost)?;
        Ok(Self {
            history,
            boost,
            dominance_ratio: None,
            max_boost: None,
            min_samples: 1,
        })
    }

    /// Cap the boost at `ratio * base_score`
    pub fn with_dominance_ratio(mut self, ratio: f64) -> CompletionResult<Self> {
        ensure_non_negative("dominance_ratio", ratio)?;
        self.dominance_ratio = Some(ratio);
        Ok(self)
    }

    /// Cap the boost at an absolute amount
    pub fn with_max_boost(mut self, max_boost: f64) -> CompletionResult<Self> {
        ensure_non_negative("max_boost", max_boost)?;
        self.max_boost = Some(max_boost);
        Ok(self)
    }

    /// Ignore values selected fewer than `min_samples` times
    pub fn with_min_samples(mut self, min_samples: u64) -> Self {
        self.min_samples = min_samples;
        self
    }

    fn profile(history: History, boost: f64, dominance_ratio: f64) -> Self {
        Self {
            history,
            boost,
            dominance_ratio: Some(dominance_ratio),
            max_boost: None,
            min_samples: 1,
        }
    }

    /// Light learning: boost 0.25, dominance ratio 0.5
    pub fn conservative(history: History) -> Self {
        Self::profile(history, 0.25, 0.5)
    }

    /// Boost 0.75, dominance ratio 1.0
    pub fn balanced(history: History) -> Self {
        Self::profile(history, 0.75, 1.0)
    }

    /// Strong learning: boost 1.5, dominance ratio 2.0
    pub fn aggressive(history: History) -> Self {
        Self::profile(history, 1.5, 2.0)
    }

    pub fn boost(&self) -> f64 {
        self.boost
    }

    pub fn dominance_ratio(&self) -> Option<f64> {
        self.dominance_ratio
    }

    pub fn max_boost(&self) -> Option<f64> {
        self.max_boost
    }

    /// Boost granted to a value selected `count` times whose base score is `base`
    pub fn boost_for(&self, count: u64, base: f64) -> f64 {
        if count == 0 || count < self.min_samples {
            return 0.0;
        }
        let mut amount = count as f64 * self.boost;
        if let Some(max_boost) = self.max_boost {
            amount = amount.min(max_boost);
        }
        if let Some(ratio) = self.dominance_ratio {
            amount = amount.min(ratio * base.max(0.0));
        }
        amount.max(0.0)
    }

    /// `None` when the prefix has no history at all
    fn boosted(&self, prefix: &str, suggestions: &[ScoredSuggestion]) -> Option<Vec<Boosted>> {
        let counts = self.history.counts_for_prefix(prefix);
        if counts.is_empty() {
            return None;
        }

        let boosts: Vec<f64> = suggestions
            .iter()
            .map(|s| {
                let count = counts.get(s.value()).copied().unwrap_or(0);
                self.boost_for(count, s.score)
            })
            .collect();
        Some(apply_boosts(suggestions, &boosts, |boost| {
            format!("learning boost={:.3}", boost)
        }))
    }
}

impl Ranker for LearningRanker {
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

/// Scales another ranker's explanations without changing its ordering
///
/// `rank` is delegated untouched. `explain` multiplies the base score,
/// history boost and final score of the inner explanations by `weight`.
pub struct WeightedRanker {
    inner: Arc<dyn Ranker>,
    weight: f64,
    name: String,
}

impl WeightedRanker {
    /// # Errors
    ///
    /// Returns [`CompletionError::Configuration`] unless `weight` is finite and positive.
    pub fn new(inner: Arc<dyn Ranker>, weight: f64) -> CompletionResult<Self> {
        if !weight.is_finite() || weight <= 0.0 {
            return Err(CompletionError::Configuration(format!(
                "ranker weight must be positive (got {})",
                weight
            )));
        }
        let name = format!("weighted({})", inner.name());
        Ok(Self {
            inner,
            weight,
            name,
        })
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }
}

impl fmt::Debug for WeightedRanker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeightedRanker")
            .field("inner", &self.inner.name())
            .field("weight", &self.weight)
            .finish()
    }
}

impl Ranker for WeightedRanker {
    fn name(&self) -> &str {
        &self.name
    }

    fn rank(&self, prefix: &str, suggestions: &[ScoredSuggestion]) -> Vec<ScoredSuggestion> {
        self.inner.rank(prefix, suggestions)
    }

    fn explain(&self, prefix: &str, suggestions: &[ScoredSuggestion]) -> Vec<RankingExplanation> {
        self.inner
            .explain(prefix, suggestions)
            .iter()
            .map(|explanation| explanation.scaled(self.weight))
            .collect()
    }

    fn history(&self) -> Option<&History> {
        self.inner.history()
    }
}
