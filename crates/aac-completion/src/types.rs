//! Core value types shared by predictors, rankers and the engine

use serde::{Deserialize, Serialize};

/// A candidate completion, identified by its string value
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Suggestion {
    pub value: String,
}

impl Suggestion {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

/// Raw per-predictor signal emitted alongside a candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictorExplanation {
    pub value: String,
    pub score: f64,
    /// Name of the predictor that produced the signal
    pub source: String,
    /// Normalized strength of the signal in `[0, 1]`, when the predictor knows it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl PredictorExplanation {
    pub fn new(value: impl Into<String>, score: f64, source: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            score,
            source: source.into(),
            confidence: None,
        }
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }
}

/// A suggestion with its current score
///
/// Predictors emit unweighted scores; aggregation and ranking stages produce
/// new instances rather than mutating the ones they receive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredSuggestion {
    pub suggestion: Suggestion,
    pub score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<PredictorExplanation>,
    /// Ordered, human-readable record of the stages that touched this suggestion
    #[serde(default)]
    pub trace: Vec<String>,
}

impl ScoredSuggestion {
    pub fn new(value: impl Into<String>, score: f64) -> Self {
        Self {
            suggestion: Suggestion::new(value),
            score,
            explanation: None,
            trace: Vec::new(),
        }
    }

    pub fn with_explanation(mut self, explanation: PredictorExplanation) -> Self {
        self.explanation = Some(explanation);
        self
    }

    pub fn with_trace(mut self, trace: Vec<String>) -> Self {
        self.trace = trace;
        self
    }

    /// The suggestion's string value
    pub fn value(&self) -> &str {
        &self.suggestion.value
    }

    /// Copy of this suggestion carrying a new score and one more trace line.
    pub(crate) fn rescored(&self, score: f64, note: String) -> Self {
        let mut trace = self.trace.clone();
        trace.push(note);
        Self {
            suggestion: self.suggestion.clone(),
            score,
            explanation: self.explanation.clone(),
            trace,
        }
    }
}
