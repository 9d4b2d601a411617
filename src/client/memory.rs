//! In-process search client.
//!
//! [`MemoryClient`] keeps every document in memory and evaluates query
//! expressions directly. Text is analyzed the way a standard analyzer
//! would: NFKC normalization, Unicode word boundaries, lowercasing, and one
//! token per CJK ideograph. Every field value is also copied into the
//! catch-all `_all` field.
//!
//! Scoring:
//! - `Term`: √tf, or the phrase score when the term analyzes into several tokens
//! - `Phrase`: √(number of contiguous occurrences)
//! - `Fuzzy`: requires ⌈n·pct/100⌉ of the n query tokens;
//!   scores Σ√tf over matched tokens, times matched/n
//! - `Or`: matches if any child matches; child scores are summed

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use ahash::AHashMap;
use async_trait::async_trait;
use log::{debug, info};
use parking_lot::RwLock;
use serde_json::Value;
use unicode_normalization::UnicodeNormalization;
use unicode_segmentation::UnicodeSegmentation;

use crate::analysis::script::is_cjk_ideograph;
use crate::client::{Hit, IndexStatus, SearchClient, SearchHits};
use crate::data::FieldMap;
use crate::error::{Result, SearchError};
use crate::query::builder::DEFAULT_FIELD;
use crate::query::expression::QueryExpression;

/// Analyze text into lowercase tokens.
pub fn analyze(text: &str) -> Vec<String> {
    let normalized: String = text.nfkc().collect::<String>().to_lowercase();
    let mut tokens = Vec::new();
    for word in normalized.unicode_words() {
        let mut current = String::new();
        for c in word.chars() {
            if is_cjk_ideograph(c) {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
                tokens.push(c.to_string());
            } else {
                current.push(c);
            }
        }
        if !current.is_empty() {
            tokens.push(current);
        }
    }
    tokens
}

/// Indexed form of a single field.
#[derive(Debug, Clone)]
enum IndexedField {
    /// Analyzed tokens, in order.
    Tokens(Vec<String>),
    /// Exact, non-analyzed value.
    Exact(String),
}

#[derive(Debug, Clone)]
struct StoredDocument {
    fields: FieldMap,
    indexed: HashMap<String, IndexedField>,
}

impl StoredDocument {
    fn new(fields: &FieldMap, schema_source: &Value) -> Self {
        let mut indexed = HashMap::new();
        let mut all_tokens = Vec::new();

        for (name, value) in fields {
            let Some(text) = value_text(value) else {
                continue;
            };
            let field_type = schema_source["properties"][name.as_str()]["type"].as_str();
            let tokens = analyze(&text);
            all_tokens.extend(tokens.iter().cloned());
            let field = match field_type {
                Some("text") => IndexedField::Tokens(tokens),
                _ => IndexedField::Exact(text),
            };
            indexed.insert(name.clone(), field);
        }
        indexed.insert(DEFAULT_FIELD.to_string(), IndexedField::Tokens(all_tokens));

        StoredDocument {
            fields: fields.clone(),
            indexed,
        }
    }

    /// Score this document against an expression, `None` when it does not match.
    fn score(&self, query: &QueryExpression) -> Option<f32> {
        match query {
            QueryExpression::Term { field, value } => match self.indexed.get(field)? {
                IndexedField::Tokens(tokens) => match analyze(value).as_slice() {
                    [] => None,
                    [term] => term_score(tokens, term),
                    // scripts without word boundaries analyze into several tokens
                    terms => phrase_score(tokens, terms),
                },
                IndexedField::Exact(exact) => (exact == value).then_some(1.0),
            },
            QueryExpression::Phrase { field, value } => match self.indexed.get(field)? {
                IndexedField::Tokens(tokens) => phrase_score(tokens, &analyze(value)),
                IndexedField::Exact(exact) => (exact == value).then_some(1.0),
            },
            QueryExpression::Fuzzy {
                field,
                value,
                minimum_match_percent,
            } => match self.indexed.get(field)? {
                IndexedField::Tokens(tokens) => {
                    fuzzy_score(tokens, &analyze(value), *minimum_match_percent)
                }
                IndexedField::Exact(exact) => (exact == value).then_some(1.0),
            },
            QueryExpression::Or { children } => children
                .iter()
                .filter_map(|child| self.score(child))
                .reduce(|a, b| a + b),
        }
    }
}

/// Render a scalar field value as indexable text.
fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(_) | Value::Object(_) => Some(value.to_string()),
    }
}

fn term_frequency(tokens: &[String], term: &str) -> usize {
    tokens.iter().filter(|token| *token == term).count()
}

fn term_score(tokens: &[String], term: &str) -> Option<f32> {
    let tf = term_frequency(tokens, term);
    (tf > 0).then(|| (tf as f32).sqrt())
}

fn phrase_score(tokens: &[String], phrase: &[String]) -> Option<f32> {
    if phrase.is_empty() || phrase.len() > tokens.len() {
        return None;
    }
    let freq = tokens.windows(phrase.len()).filter(|w| *w == phrase).count();
    (freq > 0).then(|| (freq as f32).sqrt())
}

fn fuzzy_score(tokens: &[String], query_tokens: &[String], percent: u8) -> Option<f32> {
    let n = query_tokens.len();
    if n == 0 {
        return None;
    }
    let required = (n * percent as usize).div_ceil(100).max(1);

    let mut matched = 0;
    let mut sum = 0.0;
    for token in query_tokens {
        let tf = term_frequency(tokens, token);
        if tf > 0 {
            matched += 1;
            sum += (tf as f32).sqrt();
        }
    }

    (matched >= required).then(|| sum * matched as f32 / n as f32)
}

#[derive(Debug, Default)]
struct IndexState {
    /// Schema source per document type.
    schemas: AHashMap<String, Value>,
    /// Documents per document type, keyed by id.
    documents: AHashMap<String, AHashMap<String, StoredDocument>>,
}

/// A [`SearchClient`] that keeps one index in memory.
#[derive(Debug)]
pub struct MemoryClient {
    index_name: String,
    /// `None` until the index is created.
    state: RwLock<Option<IndexState>>,
    closed: AtomicBool,
}

impl MemoryClient {
    pub fn new(index_name: impl Into<String>) -> Self {
        MemoryClient {
            index_name: index_name.into(),
            state: RwLock::new(None),
            closed: AtomicBool::new(false),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Number of stored documents of a type.
    pub fn document_count(&self, doc_type: &str) -> usize {
        self.state
            .read()
            .as_ref()
            .and_then(|state| state.documents.get(doc_type))
            .map_or(0, |docs| docs.len())
    }

    fn check_open(&self) -> Result<()> {
        if self.is_closed() {
            return Err(SearchError::engine_unavailable(format!(
                "connection to index {} is closed",
                self.index_name
            )));
        }
        Ok(())
    }

    fn index_not_found(&self) -> SearchError {
        SearchError::IndexNotFound(self.index_name.clone())
    }
}

impl Default for MemoryClient {
    fn default() -> Self {
        Self::new("default")
    }
}

#[async_trait]
impl SearchClient for MemoryClient {
    fn index_name(&self) -> &str {
        &self.index_name
    }

    async fn ensure_index_exists(&self) -> Result<IndexStatus> {
        self.check_open()?;
        let mut state = self.state.write();
        if state.is_some() {
            return Ok(IndexStatus::AlreadyExisted);
        }
        *state = Some(IndexState::default());
        info!("Index {} created.", self.index_name);
        Ok(IndexStatus::Created)
    }

    async fn ensure_schema_exists(
        &self,
        doc_type: &str,
        schema_source: &Value,
    ) -> Result<IndexStatus> {
        self.check_open()?;
        let mut guard = self.state.write();
        let state = guard.as_mut().ok_or_else(|| self.index_not_found())?;
        if state.schemas.contains_key(doc_type) {
            return Ok(IndexStatus::AlreadyExisted);
        }
        state
            .schemas
            .insert(doc_type.to_string(), schema_source.clone());
        info!("Schema for type {doc_type} created in index {}.", self.index_name);
        Ok(IndexStatus::Created)
    }

    async fn index_one(&self, doc_type: &str, id: &str, fields: &FieldMap) -> Result<()> {
        self.check_open()?;
        let mut guard = self.state.write();
        let state = guard.as_mut().ok_or_else(|| self.index_not_found())?;
        let schema = state
            .schemas
            .get(doc_type)
            .ok_or_else(|| SearchError::SchemaNotFound(doc_type.to_string()))?;
        let doc = StoredDocument::new(fields, schema);
        state
            .documents
            .entry(doc_type.to_string())
            .or_default()
            .insert(id.to_string(), doc);
        Ok(())
    }

    async fn get_by_id(&self, doc_type: &str, id: &str) -> Result<Option<FieldMap>> {
        self.check_open()?;
        let guard = self.state.read();
        let state = guard.as_ref().ok_or_else(|| self.index_not_found())?;
        Ok(state
            .documents
            .get(doc_type)
            .and_then(|docs| docs.get(id))
            .map(|doc| doc.fields.clone()))
    }

    async fn delete_by_id(&self, doc_type: &str, id: &str) -> Result<bool> {
        self.check_open()?;
        let mut guard = self.state.write();
        let state = guard.as_mut().ok_or_else(|| self.index_not_found())?;
        Ok(state
            .documents
            .get_mut(doc_type)
            .and_then(|docs| docs.remove(id))
            .is_some())
    }

    async fn execute_query(
        &self,
        doc_type: &str,
        query: &QueryExpression,
        max_results: usize,
    ) -> Result<SearchHits> {
        self.check_open()?;
        let guard = self.state.read();
        let state = guard.as_ref().ok_or_else(|| self.index_not_found())?;
        if !state.schemas.contains_key(doc_type) {
            return Err(SearchError::SchemaNotFound(doc_type.to_string()));
        }

        let mut scored: Vec<(&String, &StoredDocument, f32)> = state
            .documents
            .get(doc_type)
            .into_iter()
            .flat_map(|docs| docs.iter())
            .filter_map(|(id, doc)| doc.score(query).map(|score| (id, doc, score)))
            .collect();
        scored.sort_by(|a, b| b.2.total_cmp(&a.2).then_with(|| a.0.cmp(b.0)));

        let total_hits = scored.len() as u64;
        let hits: Vec<Hit> = scored
            .into_iter()
            .take(max_results)
            .map(|(id, doc, score)| Hit {
                id: id.clone(),
                score,
                fields: doc.fields.clone(),
            })
            .collect();
        debug!(
            "{} matched {total_hits} {doc_type} documents, returning {}",
            query.description(),
            hits.len()
        );

        Ok(SearchHits { total_hits, hits })
    }

    fn close(&self) {
        if !self.closed.swap(true, Ordering::AcqRel) {
            info!("Connection to index {} closed.", self.index_name);
        }
    }
}
