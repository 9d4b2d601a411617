//! # Searchable
//!
//! Declare plain records as searchable documents and query them with
//! free-form, mixed-script text.
//!
//! ## Features
//!
//! - Script-aware query segmentation (Latin words, CJK phrases)
//! - Term, phrase and fuzzy clause selection per span
//! - Explicit, validated document schemas
//! - Pluggable search clients, with an in-memory implementation
//! - Score threshold filtering over ranked hits
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use searchable::{Engine, EngineConfig, MemoryClient};
//!
//! let engine = Engine::new(Arc::new(MemoryClient::default()), EngineConfig::default()).unwrap();
//! let query = engine.build_query("防 毒 软件").unwrap();
//! assert_eq!(query.leaves().len(), 3);
//! ```
pub mod analysis;
pub mod client;
mod data;
mod engine;
mod error;
pub mod query;
pub mod schema;

// Re-exports for the public API
pub use analysis::{OverflowPolicy, Segmenter, Span, segment};
pub use client::memory::MemoryClient;
pub use client::{Hit, IndexStatus, SearchClient, SearchHits};
pub use data::{Document, FieldMap};
pub use engine::config::{EngineConfig, EngineConfigBuilder};
pub use engine::search::{SearchResults, apply_score_threshold};
pub use engine::{Engine, InitReport};
pub use error::{Result, SearchError};
pub use query::{QueryBuilder, QueryExpression};
pub use schema::{DocumentSchema, FieldType, Mapping, Searchable};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
