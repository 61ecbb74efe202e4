//! Completion engine: prediction, aggregation, ranking and explanation
//!
//! The engine runs each request through purely functional stages:
//!
//! 1. **Context**: derive the prefix from the raw input and optional cursor
//! 2. **Aggregation**: run every weighted predictor and merge duplicates by value
//! 3. **Ranking**: feed the aggregated list through the ranker pipeline
//! 4. **Projection**: return values only, or reconciled explanations
//!
//! The only state that outlives a request is the shared [`History`], which
//! changes exclusively through [`CompletionEngine::record_selection`].
//!
//! # Example
//!
//! ```
//! use aac_completion::{
//!     CompletionEngine, History, LearningRanker, Ranker, ScoreRanker, StaticPrefixPredictor,
//! };
//! use std::sync::Arc;
//!
//! let history = History::new();
//! let engine = CompletionEngine::new(
//!     vec![StaticPrefixPredictor::new(["hello", "help"]).into()],
//!     vec![
//!         Arc::new(ScoreRanker) as Arc<dyn Ranker>,
//!         Arc::new(LearningRanker::new(history.clone(), 1.0)?),
//!     ],
//!     Some(history),
//! );
//!
//! engine.record_selection("he", "hello");
//! assert_eq!(engine.suggest("he")?, vec!["hello", "help"]);
//! # Ok::<(), aac_completion::CompletionError>(())
//! ```

use crate::context::CompletionContext;
use crate::error::{CompletionError, CompletionResult};
use crate::explanation::RankingExplanation;
use crate::history::History;
use crate::predictors::WeightedPredictor;
use crate::ranker::{Ranker, ScoreRanker};
use crate::types::ScoredSuggestion;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

/// Introspection snapshot of a single request. Not a stable format.
#[derive(Debug, Clone, Serialize)]
pub struct DebugState {
    pub input: String,
    pub prefix: String,
    /// Aggregated predictions, before ranking
    pub scored: Vec<ScoredSuggestion>,
    /// Output of the full ranker pipeline
    pub ranked: Vec<ScoredSuggestion>,
    pub suggestions: Vec<String>,
}

/// A predictor as seen by [`CompletionEngine::describe`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictorDescription {
    pub name: String,
    pub weight: f64,
}

/// Static composition of an engine
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngineDescription {
    pub predictors: Vec<PredictorDescription>,
    pub rankers: Vec<String>,
    /// Whether any predictor or ranker learns from history
    pub history_enabled: bool,
}

/// An aggregated suggestion with its per-predictor contributions
struct Aggregated {
    suggestion: ScoredSuggestion,
    components: BTreeMap<String, f64>,
}

/// The completion engine
///
/// Owns the predictor list, the ranker pipeline and the shared [`History`].
pub struct CompletionEngine {
    predictors: Vec<WeightedPredictor>,
    rankers: Vec<Arc<dyn Ranker>>,
    history: History,
}

impl CompletionEngine {
    /// Create a new completion engine
    ///
    /// # Arguments
    ///
    /// * `predictors` - Weighted predictors, run in order during aggregation
    /// * `rankers` - Ranker pipeline; an empty pipeline falls back to [`ScoreRanker`]
    /// * `history` - Shared selection history. When `None`, the history of the
    ///   first history-backed ranker is adopted, or a fresh one is created.
    pub fn new(
        predictors: Vec<WeightedPredictor>,
        rankers: Vec<Arc<dyn Ranker>>,
        history: Option<History>,
    ) -> Self {
        let rankers = if rankers.is_empty() {
            vec![Arc::new(ScoreRanker) as Arc<dyn Ranker>]
        } else {
            rankers
        };

        let history = history
            .or_else(|| rankers.iter().find_map(|r| r.history().cloned()))
            .unwrap_or_default();

        Self {
            predictors,
            rankers,
            history,
        }
    }

    /// The shared selection history
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Ranked suggestion values for `text`
    ///
    /// # Errors
    ///
    /// Fails when a ranker produces a non-finite score or changes the set of
    /// suggestions.
    pub fn suggest(&self, text: &str) -> CompletionResult<Vec<String>> {
        self.suggest_context(&CompletionContext::new(text))
    }

    /// Like [`CompletionEngine::suggest`], completing the token before `cursor`
    pub fn suggest_at(&self, text: &str, cursor: usize) -> CompletionResult<Vec<String>> {
        self.suggest_context(&CompletionContext::with_cursor(text, cursor))
    }

    pub fn suggest_context(&self, ctx: &CompletionContext) -> CompletionResult<Vec<String>> {
        let ranked = self.rank(ctx)?;
        Ok(ranked.into_iter().map(|s| s.suggestion.value).collect())
    }

    /// Explanations for `text`, aligned with [`CompletionEngine::suggest`]
    pub fn explain(&self, text: &str) -> CompletionResult<Vec<RankingExplanation>> {
        self.explain_context(&CompletionContext::new(text))
    }

    pub fn explain_at(&self, text: &str, cursor: usize) -> CompletionResult<Vec<RankingExplanation>> {
        self.explain_context(&CompletionContext::with_cursor(text, cursor))
    }

    /// Reconciled explanations for a context
    ///
    /// Each value starts from its aggregated base score, attributed to the
    /// predictors that produced it. Every ranker stage then contributes the
    /// change it made relative to its own input: a base delta (non-zero only
    /// for scaling rankers) and a history boost. Contributions are combined
    /// with [`RankingExplanation::merge`].
    pub fn explain_context(&self, ctx: &CompletionContext) -> CompletionResult<Vec<RankingExplanation>> {
        let prefix = ctx.prefix();
        let aggregated = self.aggregate(ctx);
        let source = self.rankers.first().map(|r| r.name()).unwrap_or(ScoreRanker::NAME);

        let mut explanations: HashMap<String, RankingExplanation> = aggregated
            .iter()
            .map(|a| {
                let value = a.suggestion.value().to_string();
                let seed =
                    RankingExplanation::from_components(value.clone(), source, a.components.clone());
                (value, seed)
            })
            .collect();

        let mut current: Vec<ScoredSuggestion> =
            aggregated.into_iter().map(|a| a.suggestion).collect();

        for ranker in &self.rankers {
            let stage: HashMap<String, RankingExplanation> = ranker
                .explain(&prefix, &current)
                .into_iter()
                .map(|e| (e.value().to_string(), e))
                .collect();

            for input in &current {
                let stage_explanation =
                    stage
                        .get(input.value())
                        .ok_or_else(|| CompletionError::SuggestionSetChanged {
                            ranker: ranker.name().to_string(),
                        })?;
                let contribution = RankingExplanation::from_scores(
                    input.value(),
                    stage_explanation.base_score() - input.score,
                    stage_explanation.history_boost(),
                    ranker.name(),
                );
                if let Some(explanation) = explanations.get_mut(input.value()) {
                    *explanation = explanation.merge(&contribution)?;
                }
            }

            let ranked = ranker.rank(&prefix, &current);
            check_stage(ranker.as_ref(), &current, &ranked)?;
            current = ranked;
        }

        current
            .iter()
            .map(|s| {
                explanations
                    .remove(s.value())
                    .ok_or_else(|| CompletionError::SuggestionSetChanged {
                        ranker: source.to_string(),
                    })
            })
            .collect()
    }

    /// Record that `value` was selected for `text`
    ///
    /// The selection is appended once to the engine history, then passed to
    /// every learnable predictor whose backing history has not already seen it.
    /// Input without a token to complete records nothing.
    pub fn record_selection(&self, text: &str, value: &str) {
        let ctx = CompletionContext::new(text);
        let prefix = ctx.prefix();
        if prefix.is_empty() {
            debug!(value = %value, "Ignoring selection without a prefix");
            return;
        }
        debug!(prefix = %prefix, value = %value, "Recording selection");

        self.history.record(&prefix, value);
        let mut recorded: Vec<History> = vec![self.history.clone()];

        for weighted in &self.predictors {
            let Some(learnable) = weighted.predictor().as_learnable() else {
                continue;
            };
            match learnable.backing_history() {
                Some(backing) if recorded.iter().any(|h| h.ptr_eq(backing)) => {}
                Some(backing) => {
                    learnable.record(&ctx, value);
                    recorded.push(backing.clone());
                }
                None => learnable.record(&ctx, value),
            }
        }
    }

    /// Aggregation, ranking and projection for `text`, all exposed
    pub fn debug(&self, text: &str) -> CompletionResult<DebugState> {
        let ctx = CompletionContext::new(text);
        let scored = self.predict_scored(&ctx);
        let ranked = self.run_pipeline(&ctx.prefix(), scored.clone())?;
        let suggestions = ranked.iter().map(|s| s.value().to_string()).collect();

        Ok(DebugState {
            input: text.to_string(),
            prefix: ctx.prefix(),
            scored,
            ranked,
            suggestions,
        })
    }

    /// Aggregated predictions for a context, before ranking
    ///
    /// Each predictor's scores are multiplied by its weight. A value produced
    /// by several predictors gets the sum of their weighted scores, the first
    /// producer's explanation and the trace lines of all of them. Output order
    /// is the order in which values were first seen.
    pub fn predict_scored(&self, ctx: &CompletionContext) -> Vec<ScoredSuggestion> {
        self.aggregate(ctx)
            .into_iter()
            .map(|a| a.suggestion)
            .collect()
    }

    /// Static composition of this engine
    pub fn describe(&self) -> EngineDescription {
        let predictors = self
            .predictors
            .iter()
            .map(|p| PredictorDescription {
                name: p.name().to_string(),
                weight: p.weight(),
            })
            .collect();

        let history_enabled = self
            .predictors
            .iter()
            .any(|p| p.predictor().as_learnable().is_some())
            || self.rankers.iter().any(|r| r.history().is_some());

        EngineDescription {
            predictors,
            rankers: self.rankers.iter().map(|r| r.name().to_string()).collect(),
            history_enabled,
        }
    }

    fn rank(&self, ctx: &CompletionContext) -> CompletionResult<Vec<ScoredSuggestion>> {
        let scored = self.predict_scored(ctx);
        self.run_pipeline(&ctx.prefix(), scored)
    }

    fn run_pipeline(
        &self,
        prefix: &str,
        scored: Vec<ScoredSuggestion>,
    ) -> CompletionResult<Vec<ScoredSuggestion>> {
        let mut current = scored;
        for ranker in &self.rankers {
            let ranked = ranker.rank(prefix, &current);
            check_stage(ranker.as_ref(), &current, &ranked)?;
            trace!(ranker = ranker.name(), count = ranked.len(), "Ranker stage complete");
            current = ranked;
        }
        Ok(current)
    }

    fn aggregate(&self, ctx: &CompletionContext) -> Vec<Aggregated> {
        let mut merged: Vec<Aggregated> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for weighted in &self.predictors {
            let name = weighted.name().to_string();
            let weight = weighted.weight();

            for prediction in weighted.predictor().predict(ctx) {
                let raw_score = prediction.score;
                let weighted_score = raw_score * weight;
                let note = format!(
                    "predictor={} weight={} raw_score={:.3}",
                    name, weight, raw_score
                );

                match index.get(prediction.value()) {
                    Some(&slot) => {
                        let entry = &mut merged[slot];
                        entry.suggestion.score += weighted_score;
                        entry.suggestion.trace.extend(prediction.trace);
                        entry.suggestion.trace.push(note);
                        *entry.components.entry(name.clone()).or_insert(0.0) += weighted_score;
                    }
                    None => {
                        index.insert(prediction.value().to_string(), merged.len());
                        let mut trace = prediction.trace;
                        trace.push(note);
                        merged.push(Aggregated {
                            suggestion: ScoredSuggestion {
                                suggestion: prediction.suggestion,
                                score: weighted_score,
                                explanation: prediction.explanation,
                                trace,
                            },
                            components: BTreeMap::from([(name.clone(), weighted_score)]),
                        });
                    }
                }
            }
        }

        debug!(
            prefix = %ctx.prefix(),
            candidates = merged.len(),
            "Aggregated predictions"
        );
        merged
    }
}

impl fmt::Debug for CompletionEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletionEngine")
            .field("predictors", &self.predictors)
            .field(
                "rankers",
                &self.rankers.iter().map(|r| r.name()).collect::<Vec<_>>(),
            )
            .field("history_len", &self.history.len())
            .finish()
    }
}

/// Enforce the per-stage invariants: same values in, same values out, and
/// every score finite.
fn check_stage(
    ranker: &dyn Ranker,
    input: &[ScoredSuggestion],
    output: &[ScoredSuggestion],
) -> CompletionResult<()> {
    let mut before: Vec<&str> = input.iter().map(|s| s.value()).collect();
    let mut after: Vec<&str> = output.iter().map(|s| s.value()).collect();
    before.sort_unstable();
    after.sort_unstable();
    if before != after {
        return Err(CompletionError::SuggestionSetChanged {
            ranker: ranker.name().to_string(),
        });
    }

    if let Some(bad) = output.iter().find(|s| !s.score.is_finite()) {
        return Err(CompletionError::NonFiniteScore {
            ranker: ranker.name().to_string(),
            value: bad.value().to_string(),
            score: bad.score,
        });
    }
    Ok(())
}
