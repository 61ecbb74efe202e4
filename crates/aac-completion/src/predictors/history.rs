use super::{LearnableSignal, Predictor};
use crate::context::CompletionContext;
use crate::history::History;
use crate::types::{PredictorExplanation, ScoredSuggestion};
use tracing::trace;

/// Suggests values the user previously selected for the same prefix
///
/// Score is the selection count; confidence is the count relative to the
/// most selected value for the prefix. The predictor learns: recording a
/// selection appends to the backing [`History`].
#[derive(Debug, Clone)]
pub struct HistoryPredictor {
    history: History,
}

impl HistoryPredictor {
    pub const NAME: &'static str = "history";

    pub fn new(history: History) -> Self {
        Self { history }
    }

    pub fn history(&self) -> &History {
        &self.history
    }
}

impl Predictor for HistoryPredictor {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn predict(&self, ctx: &CompletionContext) -> Vec<ScoredSuggestion> {
        let prefix = ctx.prefix();
        if prefix.is_empty() {
            return Vec::new();
        }
        let counts = self.history.counts_for_prefix(&prefix);
        let Some(max_count) = counts.values().copied().max() else {
            return Vec::new();
        };

        let mut ranked: Vec<(String, u64)> = counts.into_iter().collect();
        // BTreeMap order is by value; the stable sort makes that the tie-break
        ranked.sort_by(|a, b| b.1.cmp(&a.1));

        ranked
            .into_iter()
            .map(|(value, count)| {
                let score = count as f64;
                let confidence = count as f64 / max_count as f64;
                ScoredSuggestion::new(value.clone(), score)
                    .with_explanation(
                        PredictorExplanation::new(value.clone(), score, Self::NAME)
                            .with_confidence(confidence),
                    )
                    .with_trace(vec![
                        format!("prefix='{}'", prefix),
                        format!("history_count={}", count),
                    ])
            })
            .collect()
    }

    fn as_learnable(&self) -> Option<&dyn LearnableSignal> {
        Some(self)
    }
}

impl LearnableSignal for HistoryPredictor {
    fn record(&self, ctx: &CompletionContext, value: &str) {
        let prefix = ctx.prefix();
        trace!(prefix = %prefix, value = %value, "History predictor recorded selection");
        self.history.record(&prefix, value);
    }

    fn backing_history(&self) -> Option<&History> {
        Some(&self.history)
    }
}
