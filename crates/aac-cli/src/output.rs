// Output formatting and styling

use aac_completion::{RankingExplanation, ScoredSuggestion};
use colored::Colorize;

/// Output styling configuration
#[derive(Debug, Clone, Copy)]
pub struct OutputStyle {
    pub use_colors: bool,
}

impl Default for OutputStyle {
    fn default() -> Self {
        Self {
            use_colors: atty::is(atty::Stream::Stdout),
        }
    }
}

impl OutputStyle {
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    /// Plain output, used for `--no-color` and when piping
    pub fn plain() -> Self {
        Self::new(false)
    }

    /// Format success message
    pub fn success(&self, msg: &str) -> String {
        if self.use_colors {
            format!("{} {}", "✓".green().bold(), msg)
        } else {
            format!("✓ {}", msg)
        }
    }

    /// Format error message
    pub fn error(&self, msg: &str) -> String {
        if self.use_colors {
            format!("{} {}", "✗".red().bold(), msg)
        } else {
            format!("✗ {}", msg)
        }
    }

    /// Format warning message
    pub fn warning(&self, msg: &str) -> String {
        if self.use_colors {
            format!("{} {}", "⚠".yellow(), msg)
        } else {
            format!("⚠ {}", msg)
        }
    }

    /// Format header
    pub fn header(&self, title: &str) -> String {
        if self.use_colors {
            title.bold().to_string()
        } else {
            title.to_string()
        }
    }

    /// Format a suggestion value
    pub fn value(&self, value: &str) -> String {
        if self.use_colors {
            value.cyan().to_string()
        } else {
            value.to_string()
        }
    }

    /// One aligned line per explanation: `value base=.. + history=.. => final`
    pub fn explanation_line(&self, explanation: &RankingExplanation) -> String {
        let value = format!("{:12}", explanation.value());
        format!(
            "{} base={:.2} + history={:.2} => {:.2}",
            self.value(&value),
            explanation.base_score(),
            explanation.history_boost(),
            explanation.final_score()
        )
    }

    /// Explanation line for the ranking phase of `aac debug`
    pub fn ranking_line(&self, explanation: &RankingExplanation) -> String {
        format!(
            "{}: base={:.2}, history={:.2}, final={:.2}, source={}",
            self.value(explanation.value()),
            explanation.base_score(),
            explanation.history_boost(),
            explanation.final_score(),
            explanation.source()
        )
    }

    /// Aggregated candidate line for the prediction phase of `aac debug`
    ///
    /// Shows the aggregated score next to the raw signal of the first
    /// predictor that produced the candidate.
    pub fn prediction_line(&self, suggestion: &ScoredSuggestion) -> String {
        let origin = suggestion
            .explanation
            .as_ref()
            .map(RankingExplanation::from_predictor)
            .map(|e| format!(", origin={}={:.2}", e.source(), e.base_score()))
            .unwrap_or_default();
        format!(
            "{}: score={:.2}{}, trace=[{}]",
            self.value(suggestion.value()),
            suggestion.score,
            origin,
            suggestion.trace.join("; ")
        )
    }
}

pub fn print_error(msg: &str) {
    let style = OutputStyle::default();
    eprintln!("{}", style.error(msg));
}

pub fn print_warning(msg: &str) {
    let style = OutputStyle::default();
    eprintln!("{}", style.warning(msg));
}
