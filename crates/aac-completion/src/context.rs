//! Completion request context and prefix extraction

use serde::{Deserialize, Serialize};

/// The current completion request: raw input text plus an optional cursor
///
/// The cursor is a character offset (0-based count of characters before the
/// cursor). Offsets past the end of the text are clamped to the text length.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionContext {
    pub text: String,
    pub cursor_pos: Option<usize>,
}

impl CompletionContext {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            cursor_pos: None,
        }
    }

    pub fn with_cursor(text: impl Into<String>, cursor_pos: usize) -> Self {
        Self {
            text: text.into(),
            cursor_pos: Some(cursor_pos),
        }
    }

    /// The in-progress token being completed
    ///
    /// Without a cursor this is the last whitespace-delimited token of the
    /// text. With a cursor it is the last token of the text before the
    /// cursor, including the character immediately preceding it. Returns an
    /// empty string when no token is available.
    pub fn prefix(&self) -> String {
        match self.cursor_pos {
            None => last_token(&self.text).to_string(),
            Some(pos) => {
                let end = self
                    .text
                    .char_indices()
                    .nth(pos)
                    .map(|(idx, _)| idx)
                    .unwrap_or(self.text.len());
                last_token(&self.text[..end]).to_string()
            }
        }
    }
}

impl From<&str> for CompletionContext {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

fn last_token(text: &str) -> &str {
    text.split_whitespace().next_back().unwrap_or("")
}
