//! Search client contract.
//!
//! A [`SearchClient`] executes query expressions and stores documents on
//! behalf of the [`Engine`](crate::Engine). Implementations report
//! [`SearchError::EngineUnavailable`](crate::SearchError::EngineUnavailable),
//! [`SearchError::IndexNotFound`](crate::SearchError::IndexNotFound) and
//! [`SearchError::SchemaNotFound`](crate::SearchError::SchemaNotFound) as
//! distinct errors and never retry on their own.
//!
//! - `memory`: An in-process implementation

pub mod memory;

use std::fmt::Debug;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::data::FieldMap;
use crate::error::Result;
use crate::query::expression::QueryExpression;

/// Outcome of an idempotent create operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexStatus {
    Created,
    AlreadyExisted,
}

impl IndexStatus {
    pub fn is_created(&self) -> bool {
        *self == IndexStatus::Created
    }
}

/// A single ranked search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hit {
    pub id: String,
    pub score: f32,
    pub fields: FieldMap,
}

/// Result of [`SearchClient::execute_query`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchHits {
    /// Number of matching documents, before any result limit.
    pub total_hits: u64,
    /// Hits sorted by descending score, at most the requested count.
    pub hits: Vec<Hit>,
}

/// Contract of the remote search engine.
#[async_trait]
pub trait SearchClient: Send + Sync + Debug {
    /// Name of the index this client operates on.
    fn index_name(&self) -> &str;

    /// Create the index if it does not exist.
    async fn ensure_index_exists(&self) -> Result<IndexStatus>;

    /// Create the schema of a document type if it does not exist.
    async fn ensure_schema_exists(&self, doc_type: &str, schema_source: &Value)
    -> Result<IndexStatus>;

    /// Index a document, replacing any document with the same id.
    async fn index_one(&self, doc_type: &str, id: &str, fields: &FieldMap) -> Result<()>;

    /// Fetch a document's fields by id.
    async fn get_by_id(&self, doc_type: &str, id: &str) -> Result<Option<FieldMap>>;

    /// Delete a document by id. Returns true if a document was removed.
    async fn delete_by_id(&self, doc_type: &str, id: &str) -> Result<bool>;

    /// Execute a query against documents of one type.
    async fn execute_query(
        &self,
        doc_type: &str,
        query: &QueryExpression,
        max_results: usize,
    ) -> Result<SearchHits>;

    /// Release the connection. Calls made afterwards fail with
    /// `EngineUnavailable`. Closing twice is a no-op.
    fn close(&self);
}
