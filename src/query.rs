//! Query construction from segmented text.
//!
//! - `expression`: The query expression tree handed to a search client
//! - `builder`: Maps a span sequence to an expression

pub mod builder;
pub mod expression;

// Re-exports
pub use builder::{
    DEFAULT_FIELD, FUZZY_MINIMUM_MATCH_PERCENT, PHRASE_EXACT_MAX_CHARS, QueryBuilder,
};
pub use expression::QueryExpression;
