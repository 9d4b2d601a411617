//! Builds query expressions from span sequences.
//!
//! Every span becomes one leaf clause against a single composite field:
//!
//! - `Word` → `Term`
//! - `Phrase` of at most [`PHRASE_EXACT_MAX_CHARS`] characters → `Phrase`
//! - longer `Phrase` → `Fuzzy` with [`FUZZY_MINIMUM_MATCH_PERCENT`]
//!
//! Several spans are combined with `Or`.

use log::debug;

use crate::analysis::span::Span;
use crate::query::expression::QueryExpression;

/// The catch-all field every indexed text value is copied into.
pub const DEFAULT_FIELD: &str = "_all";

/// Phrases up to this many characters require strict adjacency.
pub const PHRASE_EXACT_MAX_CHARS: usize = 3;

/// Share of a long phrase's terms that must match.
pub const FUZZY_MINIMUM_MATCH_PERCENT: u8 = 75;

/// Maps spans to a [`QueryExpression`] against one field.
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    field: String,
}

impl QueryBuilder {
    pub fn new(field: impl Into<String>) -> Self {
        QueryBuilder {
            field: field.into(),
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    /// Build the leaf clause for a single span.
    pub fn leaf(&self, span: &Span) -> QueryExpression {
        match span {
            Span::Word(text) => QueryExpression::term(&self.field, text),
            Span::Phrase(text) if span.char_len() <= PHRASE_EXACT_MAX_CHARS => {
                QueryExpression::phrase(&self.field, text)
            }
            Span::Phrase(text) => {
                QueryExpression::fuzzy(&self.field, text, FUZZY_MINIMUM_MATCH_PERCENT)
            }
        }
    }

    /// Build the expression for a span sequence.
    ///
    /// Returns `None` for an empty sequence; callers must then skip the
    /// search entirely and report an empty result.
    pub fn build(&self, spans: &[Span]) -> Option<QueryExpression> {
        let expr = match spans {
            [] => return None,
            [span] => self.leaf(span),
            spans => QueryExpression::or(spans.iter().map(|span| self.leaf(span)).collect()),
        };
        debug!("built query: {}", expr.description());
        Some(expr)
    }
}

impl Default for QueryBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_FIELD)
    }
}
