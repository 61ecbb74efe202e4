// Command routing and dispatch

use crate::commands::*;
use crate::error::CliResult;
use crate::logging::{self, LogLevel};
use crate::output::OutputStyle;
use crate::session::{Session, SessionOptions};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;

/// History file used when `--history` is not given
pub const DEFAULT_HISTORY_PATH: &str = ".aac_history.json";

/// Number of suggestions printed when `--limit` is not given
pub const DEFAULT_LIMIT: usize = 10;

/// aac - adaptive autocomplete with learning and explainability
#[derive(Parser, Debug)]
#[command(name = "aac")]
#[command(bin_name = "aac")]
#[command(about = "Adaptive autocomplete engine with learning and explainability")]
#[command(
    long_about = "Adaptive autocomplete engine with learning and explainability.\n\nSuggestions come from several predictors, are reranked by what you selected before, and every score can be explained.\n\nQuick Start:\n  • aac suggest he              Suggest completions for 'he'\n  • aac select he help          Teach the engine you picked 'help'\n  • aac suggest he --explain    See why each suggestion scored as it did"
)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only report errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Log level, overriding --verbose and --quiet
    #[arg(long, global = true, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Engine configuration file (.yaml, .yml or .json)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Selection history file
    #[arg(long, global = true, value_name = "PATH", default_value = DEFAULT_HISTORY_PATH)]
    pub history: PathBuf,

    /// Engine preset (see 'aac presets')
    #[arg(long, global = true, value_name = "NAME", default_value = "developer")]
    pub preset: String,

    /// Maximum number of suggestions to display
    #[arg(long, global = true, value_name = "N", default_value_t = DEFAULT_LIMIT)]
    pub limit: usize,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

impl Cli {
    pub fn output_style(&self) -> OutputStyle {
        if self.no_color {
            OutputStyle::plain()
        } else {
            OutputStyle::default()
        }
    }

    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            config: self.config.clone(),
            history: self.history.clone(),
            preset: self.preset.clone(),
            limit: self.limit,
            style: self.output_style(),
        }
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Suggest completions for the last word of TEXT
    #[command(about = "Generate autocomplete suggestions")]
    Suggest {
        #[arg(value_name = "TEXT")]
        text: String,

        /// Show scoring explanations instead of plain suggestions
        #[arg(long)]
        explain: bool,

        /// Complete the word ending at this character position
        #[arg(long, value_name = "N")]
        cursor: Option<usize>,
    },

    /// Record that VALUE was picked while typing TEXT
    #[command(about = "Record a user selection for learning")]
    Select {
        #[arg(value_name = "TEXT")]
        text: String,

        #[arg(value_name = "VALUE")]
        value: String,
    },

    /// Explain how every suggestion for TEXT was scored
    #[command(about = "Show base score, history boost and final score per suggestion")]
    Explain {
        #[arg(value_name = "TEXT")]
        text: String,

        /// Complete the word ending at this character position
        #[arg(long, value_name = "N")]
        cursor: Option<usize>,

        /// Print explanations as JSON
        #[arg(long)]
        json: bool,
    },

    /// Developer view of the prediction and ranking phases
    #[command(about = "Show the full prediction and ranking pipeline")]
    Debug {
        #[arg(value_name = "TEXT")]
        text: String,
    },

    /// List the available presets
    #[command(about = "List engine presets")]
    Presets,

    /// Show the predictors and rankers of the selected preset
    #[command(about = "Describe the engine composition")]
    Describe {
        /// Print the description as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Command router
pub struct CommandRouter;

impl CommandRouter {
    /// Parse CLI arguments and route to appropriate handler
    pub fn route() -> CliResult<()> {
        let cli = Cli::parse();

        logging::init_logging(cli.verbose, cli.quiet, cli.log_level);

        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        Self::execute(&cli, &mut out)
    }

    /// Execute a command, writing its output to `out`
    ///
    /// `presets` runs without opening a session, so it works even when the
    /// history or configuration file is broken.
    pub fn execute(cli: &Cli, out: &mut dyn Write) -> CliResult<()> {
        match &cli.command {
            Commands::Presets => {
                PresetsCommand::new(cli.preset.as_str(), cli.output_style()).execute(out)
            }
            Commands::Suggest {
                text,
                explain,
                cursor,
            } => {
                let session = Self::open_session(cli)?;
                SuggestCommand::new(&session, text.as_str())
                    .with_cursor(*cursor)
                    .with_explain(*explain)
                    .execute(out)
            }
            Commands::Explain { text, cursor, json } => {
                let session = Self::open_session(cli)?;
                SuggestCommand::new(&session, text.as_str())
                    .with_cursor(*cursor)
                    .with_explain(true)
                    .with_json(*json)
                    .execute(out)
            }
            Commands::Select { text, value } => {
                let session = Self::open_session(cli)?;
                SelectCommand::new(&session, text.as_str(), value.as_str()).execute(out)
            }
            Commands::Debug { text } => {
                let session = Self::open_session(cli)?;
                DebugCommand::new(&session, text.as_str()).execute(out)
            }
            Commands::Describe { json } => {
                let session = Self::open_session(cli)?;
                DescribeCommand::new(&session).with_json(*json).execute(out)
            }
        }
    }

    fn open_session(cli: &Cli) -> CliResult<Session> {
        Session::open(&cli.session_options())
    }
}
