// Record a selection and persist the history

use super::Command;
use crate::error::{CliError, CliResult};
use crate::logging::VerbosityLevel;
use crate::session::Session;
use aac_completion::CompletionContext;
use std::io::Write;

/// `aac select`
pub struct SelectCommand<'a> {
    session: &'a Session,
    text: String,
    value: String,
}

impl<'a> SelectCommand<'a> {
    pub fn new(session: &'a Session, text: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            session,
            text: text.into(),
            value: value.into(),
        }
    }
}

impl Command for SelectCommand<'_> {
    fn execute(&self, out: &mut dyn Write) -> CliResult<()> {
        if self.value.trim().is_empty() {
            return Err(CliError::invalid_argument("selected value must not be empty"));
        }
        if CompletionContext::new(self.text.as_str()).prefix().is_empty() {
            return Err(CliError::invalid_argument(format!(
                "input '{}' has no word to complete",
                self.text
            )));
        }

        self.session.engine().record_selection(&self.text, &self.value);
        self.session.save_history()?;

        if VerbosityLevel::Normal.should_output() {
            let message = format!(
                "Recorded selection '{}' for input '{}'",
                self.value, self.text
            );
            writeln!(out, "{}", self.session.style().success(&message))?;
        }
        Ok(())
    }
}
