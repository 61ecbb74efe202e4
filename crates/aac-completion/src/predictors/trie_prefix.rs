use super::Predictor;
use crate::context::CompletionContext;
use crate::error::{CompletionError, CompletionResult};
use crate::trie::Trie;
use crate::types::{PredictorExplanation, ScoredSuggestion};

/// Prefix predictor backed by a trie
///
/// Recall is deterministic (depth-first, children in character order) and
/// every match carries the neutral score 1.0; ordering is left to rankers.
#[derive(Debug)]
pub struct TriePrefixPredictor {
    trie: Trie,
    max_results: usize,
}

impl TriePrefixPredictor {
    pub const NAME: &'static str = "trie_prefix";
    pub const DEFAULT_MAX_RESULTS: usize = 10;

    /// Build the trie from `words`. `max_results` must be at least 1.
    pub fn new<I, S>(words: I, max_results: usize) -> CompletionResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if max_results == 0 {
            return Err(CompletionError::Configuration(
                "trie max_results must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            trie: words.into_iter().collect(),
            max_results,
        })
    }

    /// Build with [`TriePrefixPredictor::DEFAULT_MAX_RESULTS`]
    pub fn with_default_limit<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            trie: words.into_iter().collect(),
            max_results: Self::DEFAULT_MAX_RESULTS,
        }
    }

    pub fn max_results(&self) -> usize {
        self.max_results
    }
}

impl Predictor for TriePrefixPredictor {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn predict(&self, ctx: &CompletionContext) -> Vec<ScoredSuggestion> {
        let prefix = ctx.prefix();
        if prefix.is_empty() {
            return Vec::new();
        }

        self.trie
            .find_completions(&prefix, self.max_results, true)
            .into_iter()
            .map(|word| {
                ScoredSuggestion::new(word.clone(), 1.0)
                    .with_explanation(PredictorExplanation::new(word.clone(), 1.0, Self::NAME))
                    .with_trace(vec![
                        format!("prefix='{}'", prefix),
                        format!("matched='{}'", word),
                        "score=1.0".to_string(),
                    ])
            })
            .collect()
    }
}
