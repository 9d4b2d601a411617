//! Lexical spans produced by segmentation.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One lexical unit extracted from query text.
///
/// Spans are immutable values. Two spans are equal only when they are the
/// same variant and carry the same text, so `Word("H")` never equals
/// `Phrase("H")`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum Span {
    /// A run of letters or digits of any length, or a single CJK ideograph.
    Word(String),
    /// A run of two to seven contiguous CJK ideographs.
    Phrase(String),
}

impl Span {
    /// Create a word span.
    pub fn word(text: impl Into<String>) -> Self {
        Span::Word(text.into())
    }

    /// Create a phrase span.
    pub fn phrase(text: impl Into<String>) -> Self {
        Span::Phrase(text.into())
    }

    /// Get the span text.
    pub fn text(&self) -> &str {
        match self {
            Span::Word(text) | Span::Phrase(text) => text,
        }
    }

    /// Number of characters (not bytes) in the span text.
    pub fn char_len(&self) -> usize {
        self.text().chars().count()
    }

    pub fn is_word(&self) -> bool {
        matches!(self, Span::Word(_))
    }

    pub fn is_phrase(&self) -> bool {
        matches!(self, Span::Phrase(_))
    }

    /// Consume the span and return its text.
    pub fn into_text(self) -> String {
        match self {
            Span::Word(text) | Span::Phrase(text) => text,
        }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Span::Word(text) => write!(f, "Word({text})"),
            Span::Phrase(text) => write!(f, "Phrase({text})"),
        }
    }
}
