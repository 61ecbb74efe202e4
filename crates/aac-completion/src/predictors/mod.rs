//! Prediction signals
//!
//! Each predictor turns a [`CompletionContext`] into raw, unweighted scored
//! candidates. Predictors never rank; ordering is left to the rankers. The
//! engine pairs each predictor with a weight ([`WeightedPredictor`]) and sums
//! the weighted scores of candidates produced by several predictors.
//!
//! Available signals:
//! - [`StaticPrefixPredictor`]: linear scan, score grows with prefix coverage
//! - [`TriePrefixPredictor`]: trie lookup with neutral scores
//! - [`FrequencyPredictor`]: global usage counts
//! - [`HistoryPredictor`]: the user's own selections (learns through [`LearnableSignal`])
//! - [`EditDistancePredictor`]: typo-tolerant fallback

mod edit_distance;
mod frequency;
mod history;
mod static_prefix;
mod trie_prefix;

pub use edit_distance::{levenshtein, EditDistancePredictor};
pub use frequency::FrequencyPredictor;
pub use history::HistoryPredictor;
pub use static_prefix::StaticPrefixPredictor;
pub use trie_prefix::TriePrefixPredictor;

use crate::context::CompletionContext;
use crate::error::{ensure_non_negative, CompletionResult};
use crate::history::History;
use crate::types::ScoredSuggestion;
use std::fmt;
use std::sync::Arc;

/// A strategy producing scored candidate completions for a context
pub trait Predictor: Send + Sync {
    /// Stable name, used in traces and explanation sources
    fn name(&self) -> &str;

    /// Produce candidates for `ctx`. Scores are unweighted.
    fn predict(&self, ctx: &CompletionContext) -> Vec<ScoredSuggestion>;

    /// The learning capability of this predictor, if it has one
    fn as_learnable(&self) -> Option<&dyn LearnableSignal> {
        None
    }
}

/// Optional capability for predictors that learn from selections
pub trait LearnableSignal {
    /// Observe that `value` was selected for `ctx`
    fn record(&self, ctx: &CompletionContext, value: &str);

    /// The history this signal writes to, if any
    ///
    /// The engine uses this to avoid recording one selection twice into the
    /// same log.
    fn backing_history(&self) -> Option<&History> {
        None
    }
}

/// A predictor paired with the scalar weight applied to its scores
#[derive(Clone)]
pub struct WeightedPredictor {
    predictor: Arc<dyn Predictor>,
    weight: f64,
}

impl WeightedPredictor {
    /// Pair `predictor` with `weight`. Negative or non-finite weights are rejected.
    pub fn new(predictor: Arc<dyn Predictor>, weight: f64) -> CompletionResult<Self> {
        ensure_non_negative("predictor weight", weight)?;
        Ok(Self { predictor, weight })
    }

    /// Pair `predictor` with the neutral weight 1.0
    pub fn unweighted(predictor: Arc<dyn Predictor>) -> Self {
        Self {
            predictor,
            weight: 1.0,
        }
    }

    pub fn name(&self) -> &str {
        self.predictor.name()
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn predictor(&self) -> &dyn Predictor {
        self.predictor.as_ref()
    }
}

impl fmt::Debug for WeightedPredictor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeightedPredictor")
            .field("name", &self.name())
            .field("weight", &self.weight)
            .finish()
    }
}

impl<P: Predictor + 'static> From<P> for WeightedPredictor {
    fn from(predictor: P) -> Self {
        WeightedPredictor::unweighted(Arc::new(predictor))
    }
}

/// Deduplicate a vocabulary, keeping first-occurrence order
pub(crate) fn dedup_vocabulary<I, S>(vocabulary: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut seen = std::collections::HashSet::new();
    vocabulary
        .into_iter()
        .map(Into::into)
        .filter(|word| seen.insert(word.clone()))
        .collect()
}
