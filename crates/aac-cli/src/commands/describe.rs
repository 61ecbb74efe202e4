// Show how the selected preset composes the engine

use super::Command;
use crate::error::CliResult;
use crate::session::Session;
use std::io::Write;

/// `aac describe`
pub struct DescribeCommand<'a> {
    session: &'a Session,
    json: bool,
}

impl<'a> DescribeCommand<'a> {
    pub fn new(session: &'a Session) -> Self {
        Self {
            session,
            json: false,
        }
    }

    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }
}

impl Command for DescribeCommand<'_> {
    fn execute(&self, out: &mut dyn Write) -> CliResult<()> {
        let description = self.session.engine().describe();
        if self.json {
            writeln!(out, "{}", serde_json::to_string_pretty(&description)?)?;
            return Ok(());
        }

        let style = self.session.style();
        writeln!(out, "{}", style.header(&format!("preset: {}", self.session.preset())))?;
        writeln!(out, "predictors:")?;
        for predictor in &description.predictors {
            writeln!(out, "  {} (weight {:.2})", predictor.name, predictor.weight)?;
        }
        writeln!(out, "rankers: {}", description.rankers.join(" -> "))?;
        writeln!(
            out,
            "history: {}",
            if description.history_enabled { "enabled" } else { "disabled" }
        )?;
        Ok(())
    }
}
