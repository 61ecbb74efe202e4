//! Command-line front end for the adaptive autocomplete engine
//!
//! Every invocation loads the history file, builds the engine for the
//! selected preset, runs one command and, for `select`, writes the history
//! back.

pub mod commands;
pub mod error;
pub mod logging;
pub mod output;
pub mod router;
pub mod session;

pub use error::{CliError, CliResult};
pub use logging::{init_logging, LogLevel, VerbosityLevel};
pub use router::{Cli, CommandRouter, Commands};
pub use session::{Session, SessionOptions};
