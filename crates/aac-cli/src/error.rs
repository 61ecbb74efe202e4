// CLI error types and user-facing messages

use aac_completion::CompletionError;
use aac_storage::StorageError;
use thiserror::Error;

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Completion(#[from] CompletionError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Output error: {0}")]
    Output(#[from] serde_json::Error),
}

impl CliError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        CliError::InvalidArgument {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message with suggestions
    pub fn user_message(&self) -> String {
        match self {
            CliError::InvalidArgument { message } => {
                format!("Invalid argument: {}\n\nRun 'aac --help' for usage information.", message)
            }
            CliError::Io(e) => format!("File operation failed: {}", e),
            CliError::Completion(CompletionError::UnknownPreset { .. }) => {
                format!("{}\n\nRun 'aac presets' to list available presets.", self)
            }
            CliError::Completion(
                e @ (CompletionError::Configuration(_)
                | CompletionError::Yaml(_)
                | CompletionError::Serialization(_)
                | CompletionError::Io(_)),
            ) => {
                format!("{}\n\nCheck the file passed with --config.", e)
            }
            CliError::Completion(e) => {
                format!("Completion failed: {}\n\nPlease report this issue.", e)
            }
            CliError::Storage(e) => {
                format!("{}\n\nCheck the file passed with --history.", e)
            }
            CliError::Output(e) => format!("Failed to render output: {}", e),
        }
    }

    /// Get technical details for verbose mode
    pub fn technical_details(&self) -> String {
        format!("{:?}", self)
    }
}

pub type CliResult<T> = Result<T, CliError>;
