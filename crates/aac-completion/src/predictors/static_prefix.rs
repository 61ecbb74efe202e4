use super::{dedup_vocabulary, Predictor};
use crate::context::CompletionContext;
use crate::types::{PredictorExplanation, ScoredSuggestion};

/// Deterministic prefix predictor over a static vocabulary
///
/// Matches words that start with, and differ from, the prefix. The score is
/// `len(prefix) / len(word)` in characters, so a prefix covering more of the
/// word is a stronger signal. Scores do not depend on vocabulary order.
#[derive(Debug, Clone)]
pub struct StaticPrefixPredictor {
    vocabulary: Vec<String>,
}

impl StaticPrefixPredictor {
    pub const NAME: &'static str = "static_prefix";

    pub fn new<I, S>(vocabulary: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            vocabulary: dedup_vocabulary(vocabulary),
        }
    }
}

impl Predictor for StaticPrefixPredictor {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn predict(&self, ctx: &CompletionContext) -> Vec<ScoredSuggestion> {
        let prefix = ctx.prefix();
        if prefix.is_empty() {
            return Vec::new();
        }
        let prefix_len = prefix.chars().count() as f64;

        self.vocabulary
            .iter()
            .filter(|word| *word != &prefix && word.starts_with(prefix.as_str()))
            .map(|word| {
                let score = prefix_len / word.chars().count() as f64;
                ScoredSuggestion::new(word.clone(), score)
                    .with_explanation(PredictorExplanation::new(word.clone(), score, Self::NAME))
                    .with_trace(vec![
                        format!("prefix='{}'", prefix),
                        format!("matched='{}'", word),
                        format!("score={:.3}", score),
                    ])
            })
            .collect()
    }
}
