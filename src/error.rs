//! Error types for the searchable crate.
//!
//! Every fallible operation returns [`Result`], whose error side is
//! [`SearchError`]. Mapping errors are raised while a document type is
//! registered, so a misdeclared schema fails at startup rather than at
//! query time. Search client errors are surfaced unchanged and never retried.

use thiserror::Error;

/// The error type for all searchable operations.
#[derive(Error, Debug)]
pub enum SearchError {
    /// A field was declared with a host type that has no engine field type.
    #[error("Field {type_name}.{field} type is unsupported: {host_type}")]
    UnsupportedFieldType {
        type_name: String,
        field: String,
        host_type: String,
    },

    /// A document schema declares no identifier field.
    #[error("Identifier field not found in document type: {0}")]
    MissingIdentifierField(String),

    /// A field was declared both as the identifier and as an indexed field.
    #[error("Field {type_name}.{field} cannot be both the identifier and an indexed field")]
    DuplicateIdentifierAndField { type_name: String, field: String },

    /// The identifier field was declared with a non-string host type.
    #[error("Identifier field {type_name}.{field} must be a string, found: {host_type}")]
    InvalidIdentifierType {
        type_name: String,
        field: String,
        host_type: String,
    },

    /// Two record types were registered under the same type name.
    #[error(
        "Document type {type_name} is already registered by {existing}, cannot register {host_type}"
    )]
    DuplicateTypeName {
        type_name: String,
        existing: String,
        host_type: String,
    },

    /// A record type was used before it was registered with the engine.
    #[error("Document type is not registered: {0}")]
    UnknownDocumentType(String),

    /// The search engine could not be reached or the connection was closed.
    #[error("Search engine unavailable: {0}")]
    EngineUnavailable(String),

    /// The target index does not exist.
    #[error("Index not found: {0}")]
    IndexNotFound(String),

    /// No schema has been created for the document type.
    #[error("Schema not found for document type: {0}")]
    SchemaNotFound(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Mapping error: {0}")]
    Mapping(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Errors raised by search client implementations.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for searchable operations.
pub type Result<T> = std::result::Result<T, SearchError>;

impl SearchError {
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        SearchError::InvalidArgument(msg.into())
    }

    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        SearchError::InvalidConfig(msg.into())
    }

    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        SearchError::NotFound(msg.into())
    }

    pub fn mapping<S: Into<String>>(msg: S) -> Self {
        SearchError::Mapping(msg.into())
    }

    pub fn engine_unavailable<S: Into<String>>(msg: S) -> Self {
        SearchError::EngineUnavailable(msg.into())
    }

    /// Returns true for configuration-time mapping errors.
    pub fn is_mapping_error(&self) -> bool {
        matches!(
            self,
            SearchError::UnsupportedFieldType { .. }
                | SearchError::MissingIdentifierField(_)
                | SearchError::DuplicateIdentifierAndField { .. }
                | SearchError::InvalidIdentifierType { .. }
                | SearchError::DuplicateTypeName { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = SearchError::UnsupportedFieldType {
            type_name: "tweet".to_string(),
            field: "tags".to_string(),
            host_type: "Vec<String>".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Field tweet.tags type is unsupported: Vec<String>"
        );
        assert!(err.is_mapping_error());

        let err = SearchError::invalid_config("max_results must be greater than zero");
        assert!(err.to_string().contains("max_results"));
        assert!(!err.is_mapping_error());
    }

    #[test]
    fn test_from_anyhow() {
        let err: SearchError = anyhow::anyhow!("connection reset").into();
        assert_eq!(err.to_string(), "connection reset");
    }
}
