//! Adaptive autocomplete engine
//!
//! Computes ranked text-completion suggestions from a partial input by
//! blending independent prediction signals with an adaptive, history-driven
//! ranking layer, and explains every score it produces.
//!
//! # Architecture
//!
//! Each request flows through the same stages:
//!
//! 1. **Context**: [`CompletionContext`] derives the prefix being completed
//! 2. **Prediction**: every [`Predictor`] proposes raw scored candidates
//! 3. **Aggregation**: weighted scores are summed per suggestion value
//! 4. **Ranking**: a pipeline of [`Ranker`]s reorders and rescores candidates
//! 5. **Explanation**: [`RankingExplanation`]s decompose each final score
//!
//! # Core Components
//!
//! ## Predictors
//! - [`StaticPrefixPredictor`]: prefix coverage over a fixed vocabulary
//! - [`TriePrefixPredictor`]: trie-backed prefix recall with neutral scores
//! - [`FrequencyPredictor`]: global usage counts
//! - [`HistoryPredictor`]: the user's own past selections
//! - [`EditDistancePredictor`]: typo-tolerant fallback
//!
//! ## Rankers
//! - [`ScoreRanker`]: stable sort by score
//! - [`LearningRanker`]: bounded additive boosts from selection counts
//! - [`DecayRanker`]: recency boosts with exponential half-life decay
//! - [`WeightedRanker`]: scales another ranker's explanations
//!
//! ## History
//! [`History`] is the append-only selection log shared by the engine, the
//! history predictor and the learning rankers. It performs no I/O.
//!
//! # Configuration
//!
//! [`EngineConfig`] holds the vocabulary, frequency table and ranker
//! settings, loaded from YAML or JSON through [`ConfigLoader`]. A [`Preset`]
//! turns a configuration into a fully composed [`CompletionEngine`].
//!
//! # Example
//!
//! ```ignore
//! use aac_completion::{EngineConfig, History, Preset};
//!
//! let history = History::new();
//! let engine = Preset::Developer.build(history, &EngineConfig::default())?;
//!
//! let suggestions = engine.suggest("he")?;
//! engine.record_selection("he", &suggestions[0]);
//!
//! for explanation in engine.explain("he")? {
//!     println!("{}", explanation.short_summary());
//! }
//! ```

pub mod clock;
pub mod config;
pub mod context;
pub mod decay;
pub mod engine;
pub mod error;
pub mod explanation;
pub mod history;
pub mod predictors;
pub mod presets;
pub mod ranker;
pub mod trie;
pub mod types;

// Re-export public types and traits
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{
    ConfigFormat, ConfigLoader, DecayConfig, EditDistanceConfig, EngineConfig, LearningConfig,
};
pub use context::CompletionContext;
pub use decay::{DecayFunction, DecayRanker};
pub use engine::{CompletionEngine, DebugState, EngineDescription, PredictorDescription};
pub use error::{CompletionError, CompletionResult};
pub use explanation::{RankingExplanation, EXPLANATION_EPSILON};
pub use history::{History, HistoryEntry, HistorySnapshot};
pub use predictors::{
    levenshtein, EditDistancePredictor, FrequencyPredictor, HistoryPredictor, LearnableSignal,
    Predictor, StaticPrefixPredictor, TriePrefixPredictor, WeightedPredictor,
};
pub use presets::Preset;
pub use ranker::{LearningRanker, Ranker, ScoreRanker, WeightedRanker};
pub use trie::Trie;
pub use types::{PredictorExplanation, ScoredSuggestion, Suggestion};
