//! Named engine compositions

use crate::clock::{Clock, SystemClock};
use crate::config::EngineConfig;
use crate::decay::{DecayFunction, DecayRanker};
use crate::engine::CompletionEngine;
use crate::error::{CompletionError, CompletionResult};
use crate::history::History;
use crate::predictors::{
    EditDistancePredictor, FrequencyPredictor, HistoryPredictor, StaticPrefixPredictor,
    TriePrefixPredictor, WeightedPredictor,
};
use crate::ranker::{LearningRanker, Ranker, ScoreRanker};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// A predetermined composition of predictors and rankers
///
/// | preset      | predictors                                           | rankers            |
/// |-------------|------------------------------------------------------|--------------------|
/// | `stateless` | static, trie                                         | score              |
/// | `default`   | static, trie                                         | score, learning    |
/// | `developer` | static, trie, history (x2.0), frequency (x0.5)       | score, learning    |
/// | `recency`   | static, trie                                         | score, decay       |
/// | `robust`    | static, trie, edit distance                          | score, learning    |
///
/// `default` and `robust` use the balanced learning profile; `developer`
/// takes its learning settings from [`EngineConfig::learning`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Preset {
    Default,
    Developer,
    Recency,
    Robust,
    Stateless,
}

impl Preset {
    /// All presets, sorted by name
    pub const ALL: [Preset; 5] = [
        Preset::Default,
        Preset::Developer,
        Preset::Recency,
        Preset::Robust,
        Preset::Stateless,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Preset::Default => "default",
            Preset::Developer => "developer",
            Preset::Recency => "recency",
            Preset::Robust => "robust",
            Preset::Stateless => "stateless",
        }
    }

    /// Sorted preset names
    pub fn available() -> Vec<&'static str> {
        Self::ALL.iter().map(Preset::name).collect()
    }

    /// Compose an engine around `history` using wall-clock time
    pub fn build(&self, history: History, config: &EngineConfig) -> CompletionResult<CompletionEngine> {
        self.build_with_clock(history, config, Arc::new(SystemClock))
    }

    /// Compose an engine; `clock` drives recency ranking
    pub fn build_with_clock(
        &self,
        history: History,
        config: &EngineConfig,
        clock: Arc<dyn Clock>,
    ) -> CompletionResult<CompletionEngine> {
        let mut predictors: Vec<WeightedPredictor> = vec![
            StaticPrefixPredictor::new(config.vocabulary.iter().cloned()).into(),
            TriePrefixPredictor::new(&config.vocabulary, config.trie_max_results)?.into(),
        ];
        let mut rankers: Vec<Arc<dyn Ranker>> = vec![Arc::new(ScoreRanker)];

        match self {
            Preset::Stateless => {}
            Preset::Default => {
                rankers.push(Arc::new(LearningRanker::balanced(history.clone())));
            }
            Preset::Developer => {
                predictors.push(WeightedPredictor::new(
                    Arc::new(HistoryPredictor::new(history.clone())),
                    2.0,
                )?);
                predictors.push(WeightedPredictor::new(
                    Arc::new(FrequencyPredictor::new(
                        config.frequencies.iter().map(|(w, c)| (w.clone(), *c)),
                    )?),
                    0.5,
                )?);
                rankers.push(Arc::new(learning_from_config(history.clone(), config)?));
            }
            Preset::Recency => {
                let decay = DecayFunction::new(config.decay.half_life_seconds)?;
                rankers.push(Arc::new(DecayRanker::new(
                    history.clone(),
                    decay,
                    config.decay.weight,
                    clock,
                )?));
            }
            Preset::Robust => {
                let edit = &config.edit_distance;
                predictors.push(WeightedPredictor::new(
                    Arc::new(EditDistancePredictor::new(
                        config.vocabulary.iter().cloned(),
                        edit.max_distance,
                        edit.base_score,
                    )?),
                    edit.weight,
                )?);
                rankers.push(Arc::new(LearningRanker::balanced(history.clone())));
            }
        }

        Ok(CompletionEngine::new(predictors, rankers, Some(history)))
    }
}

fn learning_from_config(history: History, config: &EngineConfig) -> CompletionResult<LearningRanker> {
    let learning = &config.learning;
    let mut ranker =
        LearningRanker::new(history, learning.boost)?.with_min_samples(learning.min_samples);
    if let Some(ratio) = learning.dominance_ratio {
        ranker = ranker.with_dominance_ratio(ratio)?;
    }
    if let Some(max_boost) = learning.max_boost {
        ranker = ranker.with_max_boost(max_boost)?;
    }
    Ok(ranker)
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = CompletionError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|preset| preset.name() == name)
            .ok_or_else(|| CompletionError::UnknownPreset {
                name: name.to_string(),
                available: Self::available().into_iter().map(String::from).collect(),
            })
    }
}
