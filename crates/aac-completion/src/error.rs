//! Completion engine error types

use thiserror::Error;

/// Errors that can occur while building or running the completion pipeline
#[derive(Debug, Error)]
pub enum CompletionError {
    /// Invalid weight, boost, ratio or other construction parameter
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// An explanation whose final score does not equal base + history boost
    #[error(
        "Inconsistent explanation for '{value}': final_score ({final_score}) != base_score + history_boost ({expected})"
    )]
    InconsistentExplanation {
        value: String,
        final_score: f64,
        expected: f64,
    },

    /// Two explanations for different suggestion values cannot be merged
    #[error("Cannot merge explanations for different values: '{left}' and '{right}'")]
    ExplanationMismatch { left: String, right: String },

    /// A ranker produced a NaN or infinite score
    #[error("Non-finite score for '{value}' after ranker '{ranker}': {score}")]
    NonFiniteScore {
        ranker: String,
        value: String,
        score: f64,
    },

    /// A ranker introduced or dropped candidates
    #[error("Ranker '{ranker}' modified the suggestion set")]
    SuggestionSetChanged { ranker: String },

    /// Preset name not found in the registry
    #[error("Unknown preset '{name}'. Available presets: {}", .available.join(", "))]
    UnknownPreset {
        name: String,
        available: Vec<String>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl CompletionError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        CompletionError::Configuration(message.into())
    }
}

/// Result type for completion operations
pub type CompletionResult<T> = std::result::Result<T, CompletionError>;

/// Reject negative, NaN or infinite construction parameters.
pub(crate) fn ensure_non_negative(name: &str, value: f64) -> CompletionResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(CompletionError::config(format!(
            "{} must be a finite, non-negative number (got {})",
            name, value
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_negative_accepts_zero() {
        assert!(ensure_non_negative("boost", 0.0).is_ok());
    }

    #[test]
    fn test_non_negative_rejects_negative_and_nan() {
        assert!(ensure_non_negative("boost", -0.5).is_err());
        assert!(ensure_non_negative("boost", f64::NAN).is_err());
        assert!(ensure_non_negative("boost", f64::INFINITY).is_err());
    }

    #[test]
    fn test_unknown_preset_lists_available() {
        let err = CompletionError::UnknownPreset {
            name: "nope".to_string(),
            available: vec!["default".to_string(), "robust".to_string()],
        };
        let message = err.to_string();
        assert!(message.contains("nope"));
        assert!(message.contains("default, robust"));
    }
}
