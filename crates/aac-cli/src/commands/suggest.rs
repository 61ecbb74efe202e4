// Print ranked suggestions, optionally with score explanations

use super::Command;
use crate::error::CliResult;
use crate::session::Session;
use aac_completion::CompletionContext;
use std::io::Write;

/// `aac suggest` and `aac explain`
pub struct SuggestCommand<'a> {
    session: &'a Session,
    text: String,
    cursor: Option<usize>,
    explain: bool,
    json: bool,
}

impl<'a> SuggestCommand<'a> {
    pub fn new(session: &'a Session, text: impl Into<String>) -> Self {
        Self {
            session,
            text: text.into(),
            cursor: None,
            explain: false,
            json: false,
        }
    }

    /// Complete the token before this character position
    pub fn with_cursor(mut self, cursor: Option<usize>) -> Self {
        self.cursor = cursor;
        self
    }

    pub fn with_explain(mut self, explain: bool) -> Self {
        self.explain = explain;
        self
    }

    /// Emit explanations as JSON; implies explain
    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    fn context(&self) -> CompletionContext {
        match self.cursor {
            Some(cursor) => CompletionContext::with_cursor(self.text.as_str(), cursor),
            None => CompletionContext::new(self.text.as_str()),
        }
    }
}

impl Command for SuggestCommand<'_> {
    fn execute(&self, out: &mut dyn Write) -> CliResult<()> {
        let engine = self.session.engine();
        let limit = self.session.limit();
        let ctx = self.context();

        if self.explain || self.json {
            let explanations: Vec<_> = engine
                .explain_context(&ctx)?
                .into_iter()
                .take(limit)
                .collect();
            if self.json {
                writeln!(out, "{}", serde_json::to_string_pretty(&explanations)?)?;
            } else {
                let style = self.session.style();
                for explanation in &explanations {
                    writeln!(out, "{}", style.explanation_line(explanation))?;
                }
            }
            return Ok(());
        }

        for value in engine.suggest_context(&ctx)?.into_iter().take(limit) {
            writeln!(out, "{}", value)?;
        }
        Ok(())
    }
}
