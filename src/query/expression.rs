//! Query expression tree.
//!
//! An expression is built once per search call and then handed, unchanged,
//! to a [`SearchClient`](crate::client::SearchClient). It owns all of its
//! data and is `Send + Sync`, so it can move freely into an async call.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// A node in a query expression tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QueryExpression {
    /// Exact match against a single analyzed term.
    Term { field: String, value: String },
    /// Exact contiguous phrase match.
    Phrase { field: String, value: String },
    /// Relaxed match requiring a percentage of the value's terms to match.
    Fuzzy {
        field: String,
        value: String,
        minimum_match_percent: u8,
    },
    /// Matches when at least one child matches; child scores accumulate.
    Or { children: Vec<QueryExpression> },
}

impl QueryExpression {
    pub fn term(field: impl Into<String>, value: impl Into<String>) -> Self {
        QueryExpression::Term {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn phrase(field: impl Into<String>, value: impl Into<String>) -> Self {
        QueryExpression::Phrase {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn fuzzy(
        field: impl Into<String>,
        value: impl Into<String>,
        minimum_match_percent: u8,
    ) -> Self {
        QueryExpression::Fuzzy {
            field: field.into(),
            value: value.into(),
            minimum_match_percent,
        }
    }

    pub fn or(children: Vec<QueryExpression>) -> Self {
        QueryExpression::Or { children }
    }

    /// Returns true for every node kind except `Or`.
    pub fn is_leaf(&self) -> bool {
        !matches!(self, QueryExpression::Or { .. })
    }

    /// The field a leaf matches against, `None` for `Or`.
    pub fn field(&self) -> Option<&str> {
        match self {
            QueryExpression::Term { field, .. }
            | QueryExpression::Phrase { field, .. }
            | QueryExpression::Fuzzy { field, .. } => Some(field),
            QueryExpression::Or { .. } => None,
        }
    }

    /// Collect the leaves of this tree in depth-first order.
    pub fn leaves(&self) -> Vec<&QueryExpression> {
        let mut leaves = Vec::new();
        self.collect_leaves(&mut leaves);
        leaves
    }

    fn collect_leaves<'a>(&'a self, leaves: &mut Vec<&'a QueryExpression>) {
        match self {
            QueryExpression::Or { children } => {
                for child in children {
                    child.collect_leaves(leaves);
                }
            }
            leaf => leaves.push(leaf),
        }
    }

    /// Human-readable description, used in logs.
    pub fn description(&self) -> String {
        match self {
            QueryExpression::Term { field, value } => {
                format!("TermQuery(field: {field}, term: {value})")
            }
            QueryExpression::Phrase { field, value } => {
                format!("PhraseQuery(field: {field}, phrase: {value})")
            }
            QueryExpression::Fuzzy {
                field,
                value,
                minimum_match_percent,
            } => format!(
                "FuzzyQuery(field: {field}, text: {value}, minimum_should_match: {minimum_match_percent}%)"
            ),
            QueryExpression::Or { children } => {
                let parts: Vec<String> = children.iter().map(|c| c.description()).collect();
                format!("BooleanQuery(should: [{}])", parts.join(", "))
            }
        }
    }

    /// Render this expression in Elasticsearch query DSL.
    pub fn to_query_dsl(&self) -> Value {
        match self {
            QueryExpression::Term { field, value } => json!({ "term": { field: value } }),
            QueryExpression::Phrase { field, value } => {
                json!({ "match_phrase": { field: value } })
            }
            QueryExpression::Fuzzy {
                field,
                value,
                minimum_match_percent,
            } => json!({
                "multi_match": {
                    "query": value,
                    "fields": [field],
                    "minimum_should_match": format!("{minimum_match_percent}%"),
                }
            }),
            QueryExpression::Or { children } => {
                let should: Vec<Value> = children.iter().map(|c| c.to_query_dsl()).collect();
                json!({ "bool": { "should": should } })
            }
        }
    }
}
