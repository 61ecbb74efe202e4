use super::{dedup_vocabulary, Predictor};
use crate::context::CompletionContext;
use crate::error::{ensure_non_negative, CompletionResult};
use crate::types::{PredictorExplanation, ScoredSuggestion};

/// Levenshtein distance between two strings, counted in characters
///
/// Insertions, deletions and substitutions each cost 1. Uses two rolling rows,
/// so memory is linear in the length of `b`.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0usize; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Typo-tolerant fallback signal
///
/// Every vocabulary word within `max_distance` edits of the prefix is a
/// candidate scored `base_score / (1 + distance)`. Meant to be weighted low
/// next to the exact-prefix predictors.
#[derive(Debug, Clone)]
pub struct EditDistancePredictor {
    vocabulary: Vec<String>,
    max_distance: usize,
    base_score: f64,
}

impl EditDistancePredictor {
    pub const NAME: &'static str = "edit_distance";
    pub const DEFAULT_MAX_DISTANCE: usize = 2;
    pub const DEFAULT_BASE_SCORE: f64 = 1.0;

    pub fn new<I, S>(vocabulary: I, max_distance: usize, base_score: f64) -> CompletionResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ensure_non_negative("edit distance base_score", base_score)?;
        Ok(Self {
            vocabulary: dedup_vocabulary(vocabulary),
            max_distance,
            base_score,
        })
    }

    /// Build with a maximum distance of 2 and a base score of 1.0
    pub fn with_defaults<I, S>(vocabulary: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            vocabulary: dedup_vocabulary(vocabulary),
            max_distance: Self::DEFAULT_MAX_DISTANCE,
            base_score: Self::DEFAULT_BASE_SCORE,
        }
    }

    fn confidence(&self, distance: usize) -> f64 {
        (1.0 - distance as f64 / (self.max_distance as f64 + 1.0)).max(0.0)
    }
}

impl Predictor for EditDistancePredictor {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn predict(&self, ctx: &CompletionContext) -> Vec<ScoredSuggestion> {
        let prefix = ctx.prefix();
        if prefix.is_empty() {
            return Vec::new();
        }

        self.vocabulary
            .iter()
            .filter_map(|word| {
                let distance = levenshtein(&prefix, word);
                if distance > self.max_distance {
                    return None;
                }
                let score = self.base_score / (1.0 + distance as f64);
                Some(
                    ScoredSuggestion::new(word.clone(), score)
                        .with_explanation(
                            PredictorExplanation::new(word.clone(), score, Self::NAME)
                                .with_confidence(self.confidence(distance)),
                        )
                        .with_trace(vec![
                            format!("prefix='{}'", prefix),
                            format!("candidate='{}'", word),
                            format!("distance={}", distance),
                        ]),
                )
            })
            .collect()
    }
}
