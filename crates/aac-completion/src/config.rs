//! Configuration loading and validation for the completion engine

use crate::error::{CompletionError, CompletionResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Words offered when no vocabulary is configured
pub const DEFAULT_VOCABULARY: &[&str] = &[
    "hello", "help", "helium", "hero", "print", "private", "priority", "import", "class", "def",
];

/// Usage counts offered when no frequency table is configured
pub const DEFAULT_FREQUENCIES: &[(&str, u64)] =
    &[("print", 100), ("import", 90), ("def", 80), ("class", 70)];

/// Learning ranker settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LearningConfig {
    /// Score added per past selection
    pub boost: f64,
    /// Cap on the boost relative to the base score
    pub dominance_ratio: Option<f64>,
    /// Absolute cap on the boost
    pub max_boost: Option<f64>,
    /// Selections needed before a value is boosted at all
    pub min_samples: u64,
}

impl Default for LearningConfig {
    fn default() -> Self {
        Self {
            boost: 0.75,
            dominance_ratio: Some(1.0),
            max_boost: None,
            min_samples: 1,
        }
    }
}

/// Recency ranking settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecayConfig {
    pub half_life_seconds: f64,
    pub weight: f64,
}

impl Default for DecayConfig {
    fn default() -> Self {
        Self {
            half_life_seconds: 3600.0,
            weight: 1.0,
        }
    }
}

/// Typo-tolerant predictor settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditDistanceConfig {
    pub max_distance: usize,
    pub base_score: f64,
    /// Predictor weight used by presets that include this signal
    pub weight: f64,
}

impl Default for EditDistanceConfig {
    fn default() -> Self {
        Self {
            max_distance: 2,
            base_score: 1.0,
            weight: 0.3,
        }
    }
}

/// Everything a preset needs to compose an engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub vocabulary: Vec<String>,
    pub frequencies: BTreeMap<String, u64>,
    pub learning: LearningConfig,
    pub decay: DecayConfig,
    pub trie_max_results: usize,
    pub edit_distance: EditDistanceConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            vocabulary: DEFAULT_VOCABULARY.iter().map(|w| w.to_string()).collect(),
            frequencies: DEFAULT_FREQUENCIES
                .iter()
                .map(|(word, count)| (word.to_string(), *count))
                .collect(),
            learning: LearningConfig::default(),
            decay: DecayConfig::default(),
            trie_max_results: 10,
            edit_distance: EditDistanceConfig::default(),
        }
    }
}

/// Configuration format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Json,
}

impl ConfigFormat {
    /// Guess the format from a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => Some(ConfigFormat::Yaml),
            Some("json") => Some(ConfigFormat::Json),
            _ => None,
        }
    }
}

/// Engine configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load engine configuration from a YAML file
    pub fn load_from_yaml(path: &Path) -> CompletionResult<EngineConfig> {
        let content = std::fs::read_to_string(path)?;
        Self::load_from_string(&content, ConfigFormat::Yaml)
    }

    /// Load engine configuration from a JSON file
    pub fn load_from_json(path: &Path) -> CompletionResult<EngineConfig> {
        let content = std::fs::read_to_string(path)?;
        Self::load_from_string(&content, ConfigFormat::Json)
    }

    /// Load engine configuration from a string
    pub fn load_from_string(content: &str, format: ConfigFormat) -> CompletionResult<EngineConfig> {
        let config = match format {
            ConfigFormat::Yaml => serde_yaml::from_str(content)?,
            ConfigFormat::Json => serde_json::from_str(content)?,
        };
        Self::validate_config(&config)?;
        Ok(config)
    }

    /// Load a `.yaml`, `.yml` or `.json` file, picking the parser by extension
    pub fn load_from_path(path: &Path) -> CompletionResult<EngineConfig> {
        match ConfigFormat::from_path(path) {
            Some(ConfigFormat::Yaml) => Self::load_from_yaml(path),
            Some(ConfigFormat::Json) => Self::load_from_json(path),
            None => Err(CompletionError::Configuration(format!(
                "Unsupported configuration file: {}",
                path.display()
            ))),
        }
    }

    /// Validate engine configuration
    pub fn validate_config(config: &EngineConfig) -> CompletionResult<()> {
        let learning = &config.learning;
        if !learning.boost.is_finite() || learning.boost < 0.0 {
            return Err(CompletionError::Configuration(
                "learning.boost must be non-negative".to_string(),
            ));
        }
        for (name, cap) in [
            ("learning.dominance_ratio", learning.dominance_ratio),
            ("learning.max_boost", learning.max_boost),
        ] {
            if matches!(cap, Some(v) if !v.is_finite() || v < 0.0) {
                return Err(CompletionError::Configuration(format!(
                    "{} must be non-negative",
                    name
                )));
            }
        }

        if !config.decay.half_life_seconds.is_finite() || config.decay.half_life_seconds <= 0.0 {
            return Err(CompletionError::Configuration(
                "decay.half_life_seconds must be positive".to_string(),
            ));
        }
        if !config.decay.weight.is_finite() || config.decay.weight < 0.0 {
            return Err(CompletionError::Configuration(
                "decay.weight must be non-negative".to_string(),
            ));
        }

        if config.trie_max_results == 0 {
            return Err(CompletionError::Configuration(
                "trie_max_results must be at least 1".to_string(),
            ));
        }

        let edit = &config.edit_distance;
        if !edit.base_score.is_finite() || edit.base_score < 0.0 {
            return Err(CompletionError::Configuration(
                "edit_distance.base_score must be non-negative".to_string(),
            ));
        }
        if !edit.weight.is_finite() || edit.weight < 0.0 {
            return Err(CompletionError::Configuration(
                "edit_distance.weight must be non-negative".to_string(),
            ));
        }

        Ok(())
    }
}
