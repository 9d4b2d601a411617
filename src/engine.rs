pub mod config;
pub mod search;

use std::any::{TypeId, type_name};
use std::collections::HashMap;
use std::sync::Arc;

use log::{debug, info, warn};
use parking_lot::RwLock;

use crate::analysis::segmenter::Segmenter;
use crate::analysis::span::Span;
use crate::client::{IndexStatus, SearchClient};
use crate::error::{Result, SearchError};
use crate::query::builder::QueryBuilder;
use crate::query::expression::QueryExpression;
use crate::schema::mapping::{Mapping, Searchable};

use self::config::EngineConfig;
use self::search::{SearchResults, apply_score_threshold};

/// What [`Engine::init`] created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitReport {
    pub index: IndexStatus,
    /// Schema status per registered document type, ordered by type name.
    pub schemas: Vec<(String, IndexStatus)>,
}

/// A registered record type.
struct Registration {
    host_type: &'static str,
    mapping: Arc<Mapping>,
}

/// Search facade over a [`SearchClient`].
///
/// Record types are registered once at startup; their schemas are validated
/// at that point. Searching segments the query text, builds a query
/// expression, executes it and maps the surviving hits back to records.
///
/// The engine owns its connection: the client is closed when the engine is
/// dropped, on every exit path.
pub struct Engine {
    config: EngineConfig,
    client: Arc<dyn SearchClient>,
    segmenter: Segmenter,
    query_builder: QueryBuilder,
    mappings: RwLock<HashMap<TypeId, Registration>>,
}

impl Engine {
    /// Create an engine over `client`.
    ///
    /// The engine takes exclusive ownership of the connection: dropping it
    /// closes `client` even if other handles to it are still alive. The
    /// client must operate on the configured index.
    pub fn new(client: Arc<dyn SearchClient>, config: EngineConfig) -> Result<Self> {
        config.validate()?;
        if client.index_name() != config.index {
            return Err(SearchError::invalid_config(format!(
                "index {} does not match the client index {}",
                config.index,
                client.index_name()
            )));
        }
        let segmenter = Segmenter::new().with_overflow_policy(config.overflow_policy);
        let query_builder = QueryBuilder::new(config.default_field.clone());
        Ok(Engine {
            config,
            client,
            segmenter,
            query_builder,
            mappings: RwLock::new(HashMap::new()),
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn client(&self) -> &Arc<dyn SearchClient> {
        &self.client
    }

    /// Register a record type, validating its schema.
    ///
    /// Registering the same type again returns the existing mapping. A type
    /// name can only be registered by one record type.
    pub fn register<T: Searchable>(&self) -> Result<Arc<Mapping>> {
        let type_id = TypeId::of::<T>();
        if let Some(registered) = self.mappings.read().get(&type_id) {
            return Ok(registered.mapping.clone());
        }
        let mapping = Arc::new(Mapping::for_type::<T>()?);

        let mut mappings = self.mappings.write();
        if let Some(registered) = mappings.get(&type_id) {
            return Ok(registered.mapping.clone());
        }
        if let Some(other) = mappings
            .values()
            .find(|r| r.mapping.type_name() == mapping.type_name())
        {
            return Err(SearchError::DuplicateTypeName {
                type_name: mapping.type_name().to_string(),
                existing: other.host_type.to_string(),
                host_type: type_name::<T>().to_string(),
            });
        }
        info!(
            "Registered document type {} with {} indexed fields.",
            mapping.type_name(),
            mapping.fields().len()
        );
        mappings.insert(
            type_id,
            Registration {
                host_type: type_name::<T>(),
                mapping: mapping.clone(),
            },
        );
        Ok(mapping)
    }

    /// Get the mapping of a registered record type.
    pub fn mapping<T: Searchable>(&self) -> Result<Arc<Mapping>> {
        self.mappings
            .read()
            .get(&TypeId::of::<T>())
            .map(|registered| registered.mapping.clone())
            .ok_or_else(|| SearchError::UnknownDocumentType(type_name::<T>().to_string()))
    }

    /// Create the index if missing, then the schema of every registered type.
    pub async fn init(&self) -> Result<InitReport> {
        info!("Init engine on index {}...", self.client.index_name());
        let index = self.create_index().await?;

        let mut mappings: Vec<Arc<Mapping>> = self
            .mappings
            .read()
            .values()
            .map(|registered| registered.mapping.clone())
            .collect();
        mappings.sort_by(|a, b| a.type_name().cmp(b.type_name()));

        let mut schemas = Vec::with_capacity(mappings.len());
        for mapping in mappings {
            let status = self.ensure_schema(&mapping).await?;
            schemas.push((mapping.type_name().to_string(), status));
        }
        Ok(InitReport { index, schemas })
    }

    /// Create the index if it does not exist.
    pub async fn create_index(&self) -> Result<IndexStatus> {
        let status = self.client.ensure_index_exists().await?;
        match status {
            IndexStatus::Created => {
                info!("Index {} not found. Created.", self.client.index_name())
            }
            IndexStatus::AlreadyExisted => debug!("Index {} found.", self.client.index_name()),
        }
        Ok(status)
    }

    /// Create the schema of a registered type if it does not exist.
    pub async fn create_schema<T: Searchable>(&self) -> Result<IndexStatus> {
        let mapping = self.mapping::<T>()?;
        self.ensure_schema(&mapping).await
    }

    async fn ensure_schema(&self, mapping: &Mapping) -> Result<IndexStatus> {
        let status = self
            .client
            .ensure_schema_exists(mapping.type_name(), &mapping.schema_source())
            .await?;
        match status {
            IndexStatus::Created => {
                info!("Schema not found for type {}. Created.", mapping.type_name())
            }
            IndexStatus::AlreadyExisted => {
                info!("Found schema for type {}.", mapping.type_name())
            }
        }
        Ok(status)
    }

    /// Index a record, replacing any record with the same id.
    pub async fn index<T: Searchable>(&self, record: &T) -> Result<()> {
        let mapping = self.mapping::<T>()?;
        let doc = mapping.map_from(record)?;
        self.client
            .index_one(mapping.type_name(), &doc.id, &doc.fields)
            .await?;
        info!("Type {}@{} indexed.", mapping.type_name(), doc.id);
        Ok(())
    }

    /// Fetch a record by id.
    pub async fn get<T: Searchable>(&self, id: &str) -> Result<Option<T>> {
        let mapping = self.mapping::<T>()?;
        match self.client.get_by_id(mapping.type_name(), id).await? {
            Some(fields) => Ok(Some(mapping.map_to(id, &fields)?)),
            None => Ok(None),
        }
    }

    /// Remove a record from the index. Returns true if it was indexed.
    pub async fn unindex<T: Searchable>(&self, record: &T) -> Result<bool> {
        let id = self.mapping::<T>()?.map_from(record)?.id;
        self.unindex_by_id::<T>(&id).await
    }

    /// Remove a record from the index by id. Returns true if it was indexed.
    pub async fn unindex_by_id<T: Searchable>(&self, id: &str) -> Result<bool> {
        let mapping = self.mapping::<T>()?;
        let removed = self.client.delete_by_id(mapping.type_name(), id).await?;
        info!("Type {}@{id} unindexed.", mapping.type_name());
        Ok(removed)
    }

    /// Segment query text with the configured overflow policy.
    pub fn segment(&self, text: &str) -> Vec<Span> {
        self.segmenter.segment(text)
    }

    /// Build the query expression for `text`, `None` if it has no spans.
    pub fn build_query(&self, text: &str) -> Option<QueryExpression> {
        let spans = self.segment(text);
        debug!("segmented {text:?} into {} spans", spans.len());
        self.query_builder.build(&spans)
    }

    /// Search records of type `T` with the configured minimum score.
    pub async fn search<T: Searchable>(&self, text: &str) -> Result<SearchResults<T>> {
        self.search_with_min_score(text, self.config.min_score).await
    }

    /// Search records of type `T`, dropping hits from the first one scoring
    /// below `min_score` onwards.
    ///
    /// Text without any span returns an empty result without calling the
    /// search client.
    pub async fn search_with_min_score<T: Searchable>(
        &self,
        text: &str,
        min_score: f32,
    ) -> Result<SearchResults<T>> {
        if !min_score.is_finite() {
            return Err(SearchError::invalid_argument(format!(
                "min_score must be finite, got {min_score}"
            )));
        }
        let mapping = self.mapping::<T>()?;
        let Some(query) = self.build_query(text) else {
            return Ok(SearchResults::empty());
        };

        let response = self
            .client
            .execute_query(mapping.type_name(), &query, self.config.max_results)
            .await?;

        let mut results = Vec::new();
        for hit in apply_score_threshold(response.hits, min_score) {
            match mapping.map_to(&hit.id, &hit.fields) {
                Ok(record) => results.push(record),
                Err(e) => warn!("Skipping hit {}@{}: {e}", mapping.type_name(), hit.id),
            }
        }

        Ok(SearchResults {
            total_hits: response.total_hits,
            results,
        })
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        self.client.close();
    }
}
