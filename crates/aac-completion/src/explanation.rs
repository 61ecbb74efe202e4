//! Score explanations: how a final score decomposes into base and history parts

use crate::error::{CompletionError, CompletionResult};
use crate::types::PredictorExplanation;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Tolerance for `final_score == base_score + history_boost`
pub const EXPLANATION_EPSILON: f64 = 1e-9;

/// Invariant-checked decomposition of a suggestion's final score
///
/// `final_score` always equals `base_score + history_boost` within
/// [`EXPLANATION_EPSILON`]. The validating constructor rejects anything else;
/// every other constructor and transformation computes the final score from
/// its parts, so the invariant cannot be broken after construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankingExplanation {
    value: String,
    base_score: f64,
    history_boost: f64,
    final_score: f64,
    source: String,
    base_components: BTreeMap<String, f64>,
    history_components: BTreeMap<String, f64>,
}

impl RankingExplanation {
    /// Build an explanation from fully specified parts
    ///
    /// # Errors
    ///
    /// Returns [`CompletionError::InconsistentExplanation`] when `final_score`
    /// differs from `base_score + history_boost` by more than the epsilon, or
    /// when any of the three is NaN.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        value: impl Into<String>,
        base_score: f64,
        history_boost: f64,
        final_score: f64,
        source: impl Into<String>,
        base_components: BTreeMap<String, f64>,
        history_components: BTreeMap<String, f64>,
    ) -> CompletionResult<Self> {
        let value = value.into();
        let expected = base_score + history_boost;
        // written so that NaN fails the check
        if !((final_score - expected).abs() <= EXPLANATION_EPSILON) {
            return Err(CompletionError::InconsistentExplanation {
                value,
                final_score,
                expected,
            });
        }
        Ok(Self {
            value,
            base_score,
            history_boost,
            final_score,
            source: source.into(),
            base_components,
            history_components,
        })
    }

    /// Explanation whose final score is derived from `base_score + history_boost`
    ///
    /// Non-zero parts are attributed to `source` in the component maps.
    pub fn from_scores(
        value: impl Into<String>,
        base_score: f64,
        history_boost: f64,
        source: impl Into<String>,
    ) -> Self {
        let source = source.into();
        let mut base_components = BTreeMap::new();
        if base_score != 0.0 {
            base_components.insert(source.clone(), base_score);
        }
        let mut history_components = BTreeMap::new();
        if history_boost != 0.0 {
            history_components.insert(source.clone(), history_boost);
        }
        Self {
            value: value.into(),
            base_score,
            history_boost,
            final_score: base_score + history_boost,
            source,
            base_components,
            history_components,
        }
    }

    /// Base-only explanation mirroring a predictor's raw signal
    pub fn from_predictor(explanation: &PredictorExplanation) -> Self {
        Self::from_scores(
            explanation.value.clone(),
            explanation.score,
            0.0,
            explanation.source.clone(),
        )
    }

    /// Base-only explanation built from per-predictor contributions
    pub(crate) fn from_components(
        value: impl Into<String>,
        source: impl Into<String>,
        base_components: BTreeMap<String, f64>,
    ) -> Self {
        let base_score = base_components.values().sum();
        Self {
            value: value.into(),
            base_score,
            history_boost: 0.0,
            final_score: base_score,
            source: source.into(),
            base_components,
            history_components: BTreeMap::new(),
        }
    }

    /// Additively combine two explanations of the same suggestion
    ///
    /// Base scores, boosts and components are summed and the final score is
    /// recomputed. The source of `self` is kept.
    ///
    /// # Errors
    ///
    /// Returns [`CompletionError::ExplanationMismatch`] when the values differ.
    pub fn merge(&self, other: &RankingExplanation) -> CompletionResult<Self> {
        if self.value != other.value {
            return Err(CompletionError::ExplanationMismatch {
                left: self.value.clone(),
                right: other.value.clone(),
            });
        }

        let base_score = self.base_score + other.base_score;
        let history_boost = self.history_boost + other.history_boost;
        Ok(Self {
            value: self.value.clone(),
            base_score,
            history_boost,
            final_score: base_score + history_boost,
            source: self.source.clone(),
            base_components: sum_components(&self.base_components, &other.base_components),
            history_components: sum_components(
                &self.history_components,
                &other.history_components,
            ),
        })
    }

    /// Copy of this explanation with `boost` added to the history part
    pub fn apply_history_boost(&self, boost: f64, source: &str) -> Self {
        let mut history_components = self.history_components.clone();
        *history_components.entry(source.to_string()).or_insert(0.0) += boost;
        let history_boost = self.history_boost + boost;
        Self {
            value: self.value.clone(),
            base_score: self.base_score,
            history_boost,
            final_score: self.base_score + history_boost,
            source: self.source.clone(),
            base_components: self.base_components.clone(),
            history_components,
        }
    }

    /// Copy with every score and component multiplied by `weight`
    pub fn scaled(&self, weight: f64) -> Self {
        let scale = |components: &BTreeMap<String, f64>| {
            components
                .iter()
                .map(|(name, score)| (name.clone(), score * weight))
                .collect()
        };
        let base_score = self.base_score * weight;
        let history_boost = self.history_boost * weight;
        Self {
            value: self.value.clone(),
            base_score,
            history_boost,
            final_score: base_score + history_boost,
            source: self.source.clone(),
            base_components: scale(&self.base_components),
            history_components: scale(&self.history_components),
        }
    }

    /// One-line, human-readable summary
    pub fn short_summary(&self) -> String {
        format!(
            "{}: base={:.2} history={:+.2} final={:.2} [{}]",
            self.value, self.base_score, self.history_boost, self.final_score, self.source
        )
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn base_score(&self) -> f64 {
        self.base_score
    }

    pub fn history_boost(&self) -> f64 {
        self.history_boost
    }

    pub fn final_score(&self) -> f64 {
        self.final_score
    }

    /// Name of the ranker (or predictor) that produced the explanation
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn base_components(&self) -> &BTreeMap<String, f64> {
        &self.base_components
    }

    pub fn history_components(&self) -> &BTreeMap<String, f64> {
        &self.history_components
    }
}

impl fmt::Display for RankingExplanation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.short_summary())
    }
}

fn sum_components(
    left: &BTreeMap<String, f64>,
    right: &BTreeMap<String, f64>,
) -> BTreeMap<String, f64> {
    let mut merged = left.clone();
    for (name, score) in right {
        *merged.entry(name.clone()).or_insert(0.0) += score;
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_accepts_consistent_scores() {
        let explanation = RankingExplanation::new(
            "help",
            1.0,
            2.0,
            3.0,
            "learning",
            BTreeMap::new(),
            BTreeMap::new(),
        )
        .unwrap();
        assert_eq!(explanation.final_score(), 3.0);
    }

    #[test]
    fn test_new_rejects_inconsistent_scores() {
        let result = RankingExplanation::new(
            "help",
            1.0,
            2.0,
            3.5,
            "learning",
            BTreeMap::new(),
            BTreeMap::new(),
        );
        assert!(matches!(
            result,
            Err(CompletionError::InconsistentExplanation { .. })
        ));
    }

    #[test]
    fn test_new_rejects_nan() {
        let result = RankingExplanation::new(
            "help",
            f64::NAN,
            0.0,
            f64::NAN,
            "score",
            BTreeMap::new(),
            BTreeMap::new(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_merge_sums_parts() {
        let a = RankingExplanation::from_scores("hello", 1.0, 0.5, "learning");
        let b = RankingExplanation::from_scores("hello", 0.25, 0.25, "decay");

        let merged = a.merge(&b).unwrap();
        assert_eq!(merged.base_score(), 1.25);
        assert_eq!(merged.history_boost(), 0.75);
        assert_eq!(merged.final_score(), 2.0);
        assert_eq!(merged.source(), "learning");
        assert_eq!(merged.history_components().get("decay"), Some(&0.25));
    }

    #[test]
    fn test_merge_rejects_different_values() {
        let a = RankingExplanation::from_scores("hello", 1.0, 0.0, "score");
        let b = RankingExplanation::from_scores("help", 1.0, 0.0, "score");
        assert!(matches!(
            a.merge(&b),
            Err(CompletionError::ExplanationMismatch { .. })
        ));
    }

    #[test]
    fn test_apply_history_boost_is_functional() {
        let original = RankingExplanation::from_scores("hello", 1.0, 0.0, "score");
        let boosted = original.apply_history_boost(2.0, "learning");

        assert_eq!(original.final_score(), 1.0);
        assert_eq!(boosted.final_score(), 3.0);
        assert_eq!(boosted.history_components().get("learning"), Some(&2.0));
    }

    #[test]
    fn test_scaled_multiplies_everything() {
        let explanation = RankingExplanation::from_scores("hello", 1.0, 0.5, "learning");
        let scaled = explanation.scaled(2.0);
        assert_eq!(scaled.base_score(), 2.0);
        assert_eq!(scaled.history_boost(), 1.0);
        assert_eq!(scaled.final_score(), 3.0);
        assert_eq!(scaled.base_components().get("learning"), Some(&2.0));
    }

    #[test]
    fn test_from_predictor() {
        let raw = PredictorExplanation::new("hero", 0.5, "static_prefix");
        let explanation = RankingExplanation::from_predictor(&raw);
        assert_eq!(explanation.base_score(), 0.5);
        assert_eq!(explanation.history_boost(), 0.0);
        assert_eq!(explanation.source(), "static_prefix");
    }

    #[test]
    fn test_summary_and_json() {
        let explanation = RankingExplanation::from_scores("help", 1.0, 2.0, "learning");
        assert_eq!(
            explanation.short_summary(),
            "help: base=1.00 history=+2.00 final=3.00 [learning]"
        );

        let json = serde_json::to_value(&explanation).unwrap();
        assert_eq!(json["value"], "help");
        assert_eq!(json["final_score"], 3.0);
        assert_eq!(json["history_components"]["learning"], 2.0);
    }
}
