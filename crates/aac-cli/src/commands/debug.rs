// Dump the prediction and ranking phases of one request

use super::Command;
use crate::error::CliResult;
use crate::session::Session;
use std::io::Write;

/// `aac debug`
pub struct DebugCommand<'a> {
    session: &'a Session,
    text: String,
}

impl<'a> DebugCommand<'a> {
    pub fn new(session: &'a Session, text: impl Into<String>) -> Self {
        Self {
            session,
            text: text.into(),
        }
    }
}

impl Command for DebugCommand<'_> {
    fn execute(&self, out: &mut dyn Write) -> CliResult<()> {
        let engine = self.session.engine();
        let style = self.session.style();
        let state = engine.debug(&self.text)?;
        let explanations = engine.explain(&self.text)?;

        writeln!(out, "input={:?} prefix={:?}", state.input, state.prefix)?;

        writeln!(out, "{}", style.header("=== PREDICTION PHASE ==="))?;
        for suggestion in &state.scored {
            writeln!(out, "{}", style.prediction_line(suggestion))?;
        }

        writeln!(out)?;
        writeln!(out, "{}", style.header("=== RANKING PHASE ==="))?;
        for explanation in &explanations {
            writeln!(out, "{}", style.ranking_line(explanation))?;
        }
        Ok(())
    }
}
