// Engine session shared by the commands of one invocation

use crate::error::CliResult;
use crate::output::{self, OutputStyle};
use aac_completion::{CompletionEngine, ConfigLoader, EngineConfig, Preset};
use aac_storage::{HydrationReport, JsonHistoryStore};
use std::path::PathBuf;
use tracing::debug;

/// Where the session's configuration and history come from
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub config: Option<PathBuf>,
    pub history: PathBuf,
    pub preset: String,
    pub limit: usize,
    pub style: OutputStyle,
}

/// A composed engine plus the store its history was loaded from
pub struct Session {
    engine: CompletionEngine,
    store: JsonHistoryStore,
    preset: Preset,
    limit: usize,
    style: OutputStyle,
    report: HydrationReport,
}

impl Session {
    /// Load configuration and history, then build the selected preset
    ///
    /// # Errors
    ///
    /// Fails on an unknown preset, an unreadable or invalid configuration
    /// file, or a history file that exists but is not valid JSON.
    pub fn open(options: &SessionOptions) -> CliResult<Self> {
        let preset: Preset = options.preset.parse()?;

        let config = match &options.config {
            Some(path) => ConfigLoader::load_from_path(path)?,
            None => EngineConfig::default(),
        };

        let store = JsonHistoryStore::new(&options.history);
        let (history, report) = store.load_with_report()?;
        if !report.is_clean() {
            output::print_warning(&format!(
                "Skipped {} malformed entries in {}",
                report.skipped.len(),
                store.path().display()
            ));
        }

        let engine = preset.build(history, &config)?;
        debug!(preset = %preset, history = %store.path().display(), "Session opened");

        Ok(Self {
            engine,
            store,
            preset,
            limit: options.limit,
            style: options.style,
            report,
        })
    }

    pub fn engine(&self) -> &CompletionEngine {
        &self.engine
    }

    pub fn preset(&self) -> Preset {
        self.preset
    }

    /// Maximum number of suggestions a command prints
    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn style(&self) -> &OutputStyle {
        &self.style
    }

    /// What happened while loading the history file
    pub fn hydration_report(&self) -> &HydrationReport {
        &self.report
    }

    /// Persist the engine history back to the store
    pub fn save_history(&self) -> CliResult<()> {
        self.store.save(self.engine.history())?;
        Ok(())
    }
}
