use super::Predictor;
use crate::context::CompletionContext;
use crate::error::{CompletionError, CompletionResult};
use crate::types::{PredictorExplanation, ScoredSuggestion};

/// Suggests words by observed global frequency
///
/// Score is the raw count; confidence is the count relative to the most
/// frequent word in the table.
#[derive(Debug, Clone)]
pub struct FrequencyPredictor {
    frequencies: Vec<(String, u64)>,
    max_count: u64,
    max_results: Option<usize>,
}

impl FrequencyPredictor {
    pub const NAME: &'static str = "frequency";

    /// Build from `(word, count)` pairs. An empty table is a configuration error.
    pub fn new<I, S>(frequencies: I) -> CompletionResult<Self>
    where
        I: IntoIterator<Item = (S, u64)>,
        S: Into<String>,
    {
        let mut table: Vec<(String, u64)> = Vec::new();
        for (word, count) in frequencies {
            let word = word.into();
            match table.iter_mut().find(|(existing, _)| *existing == word) {
                Some(entry) => entry.1 = count,
                None => table.push((word, count)),
            }
        }

        let max_count = table
            .iter()
            .map(|(_, count)| *count)
            .max()
            .ok_or_else(|| {
                CompletionError::Configuration("frequency table must not be empty".to_string())
            })?;

        Ok(Self {
            frequencies: table,
            max_count,
            max_results: None,
        })
    }

    /// Keep only the `max_results` most frequent matches
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = Some(max_results);
        self
    }

    fn confidence(&self, count: u64) -> f64 {
        if self.max_count == 0 {
            0.0
        } else {
            count as f64 / self.max_count as f64
        }
    }
}

impl Predictor for FrequencyPredictor {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn predict(&self, ctx: &CompletionContext) -> Vec<ScoredSuggestion> {
        let prefix = ctx.prefix();
        if prefix.is_empty() {
            return Vec::new();
        }

        let mut matches: Vec<&(String, u64)> = self
            .frequencies
            .iter()
            .filter(|(word, _)| word.starts_with(prefix.as_str()))
            .collect();

        if let Some(limit) = self.max_results {
            // stable: equal counts keep table order
            matches.sort_by(|a, b| b.1.cmp(&a.1));
            matches.truncate(limit);
        }

        matches
            .into_iter()
            .map(|(word, count)| {
                let score = *count as f64;
                ScoredSuggestion::new(word.clone(), score).with_explanation(
                    PredictorExplanation::new(word.clone(), score, Self::NAME)
                        .with_confidence(self.confidence(*count)),
                )
            })
            .collect()
    }
}
