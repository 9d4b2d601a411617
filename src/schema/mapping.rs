//! Validated mapping between record types and documents.

use std::any::TypeId;
use std::collections::BTreeMap;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::data::{Document, FieldMap};
use crate::error::{Result, SearchError};
use crate::schema::field::{FieldDeclaration, FieldRole, FieldType};

/// A record type that can be indexed and searched.
///
/// The record is converted to and from a [`Document`] through serde, so any
/// record field that is not declared in the schema must be optional or carry
/// `#[serde(default)]` to survive a round trip through the index.
pub trait Searchable: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Declare the identifier and indexed fields of this type.
    fn schema() -> DocumentSchema;
}

/// Declaration of a document type: its name plus a list of fields.
///
/// Declarations are not checked when added; [`Mapping::new`] validates the
/// whole schema at once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentSchema {
    type_name: String,
    declarations: Vec<FieldDeclaration>,
}

impl DocumentSchema {
    /// Start a schema for the given document type name (lowerCamelCase by
    /// convention, e.g. `tweet`).
    pub fn new(type_name: impl Into<String>) -> Self {
        DocumentSchema {
            type_name: type_name.into(),
            declarations: Vec::new(),
        }
    }

    /// Declare the identifier field.
    pub fn id<T: 'static>(self, name: impl Into<String>) -> Self {
        self.declare(FieldDeclaration::of::<T>(name, FieldRole::Identifier))
    }

    /// Declare an indexed field whose engine type follows its host type.
    pub fn field<T: 'static>(self, name: impl Into<String>) -> Self {
        self.declare(FieldDeclaration::of::<T>(
            name,
            FieldRole::Indexed { keyword: false },
        ))
    }

    /// Declare an indexed field stored as an exact keyword.
    pub fn keyword<T: 'static>(self, name: impl Into<String>) -> Self {
        self.declare(FieldDeclaration::of::<T>(
            name,
            FieldRole::Indexed { keyword: true },
        ))
    }

    pub fn declare(mut self, declaration: FieldDeclaration) -> Self {
        self.declarations.push(declaration);
        self
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn declarations(&self) -> &[FieldDeclaration] {
        &self.declarations
    }
}

/// A validated document schema.
///
/// Holds the identifier field name and the engine type of every indexed
/// field, and converts records to and from documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mapping {
    type_name: String,
    id_field: String,
    fields: BTreeMap<String, FieldType>,
}

impl Mapping {
    /// Validate a schema.
    ///
    /// Fails when the schema has no identifier, when the identifier is not a
    /// `String`, when a name is declared both as identifier and as indexed
    /// field, or when a field's host type has no engine type.
    pub fn new(schema: &DocumentSchema) -> Result<Self> {
        let type_name = schema.type_name();
        if type_name.is_empty() {
            return Err(SearchError::invalid_argument(
                "document type name must not be empty",
            ));
        }

        let mut id_field: Option<&FieldDeclaration> = None;
        let mut fields = BTreeMap::new();

        for decl in schema.declarations() {
            match decl.role {
                FieldRole::Identifier => {
                    if decl.type_id != TypeId::of::<String>() {
                        return Err(SearchError::InvalidIdentifierType {
                            type_name: type_name.to_string(),
                            field: decl.name.clone(),
                            host_type: decl.host_type.to_string(),
                        });
                    }
                    id_field = Some(decl);
                }
                FieldRole::Indexed { keyword } => {
                    let field_type = if keyword {
                        FieldType::Keyword
                    } else {
                        FieldType::for_host_type(decl.type_id).ok_or_else(|| {
                            SearchError::UnsupportedFieldType {
                                type_name: type_name.to_string(),
                                field: decl.name.clone(),
                                host_type: decl.host_type.to_string(),
                            }
                        })?
                    };
                    fields.insert(decl.name.clone(), field_type);
                }
            }
        }

        let id_field = id_field
            .ok_or_else(|| SearchError::MissingIdentifierField(type_name.to_string()))?;
        if fields.contains_key(&id_field.name) {
            return Err(SearchError::DuplicateIdentifierAndField {
                type_name: type_name.to_string(),
                field: id_field.name.clone(),
            });
        }

        Ok(Mapping {
            type_name: type_name.to_string(),
            id_field: id_field.name.clone(),
            fields,
        })
    }

    /// Build the mapping of a [`Searchable`] type.
    pub fn for_type<T: Searchable>() -> Result<Self> {
        Self::new(&T::schema())
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn id_field(&self) -> &str {
        &self.id_field
    }

    /// Indexed fields and their engine types, ordered by name.
    pub fn fields(&self) -> &BTreeMap<String, FieldType> {
        &self.fields
    }

    pub fn field_type(&self, name: &str) -> Option<FieldType> {
        self.fields.get(name).copied()
    }

    /// The schema source sent to the engine:
    /// `{"properties": {"<field>": {"type": "<type>"}}}`.
    pub fn schema_source(&self) -> Value {
        let properties: serde_json::Map<String, Value> = self
            .fields
            .iter()
            .map(|(name, field_type)| (name.clone(), json!({ "type": field_type.as_str() })))
            .collect();
        json!({ "properties": properties })
    }

    /// Convert a record into a document.
    ///
    /// Only declared fields are copied; a declared field missing from the
    /// serialized record is stored as `null`.
    pub fn map_from<T: Serialize>(&self, record: &T) -> Result<Document> {
        let value = serde_json::to_value(record)?;
        let Value::Object(mut object) = value else {
            return Err(SearchError::mapping(format!(
                "{} must serialize to an object",
                self.type_name
            )));
        };

        let id = match object.remove(&self.id_field) {
            Some(Value::String(id)) => id,
            Some(other) => {
                return Err(SearchError::mapping(format!(
                    "identifier {}.{} must serialize to a string, found: {other}",
                    self.type_name, self.id_field
                )));
            }
            None => {
                return Err(SearchError::mapping(format!(
                    "identifier {}.{} is missing from the record",
                    self.type_name, self.id_field
                )));
            }
        };

        let fields: FieldMap = self
            .fields
            .keys()
            .map(|name| (name.clone(), object.remove(name).unwrap_or(Value::Null)))
            .collect();

        Ok(Document::with_fields(id, fields))
    }

    /// Rebuild a record from its identifier and stored field values.
    ///
    /// Undeclared fields in `fields` are ignored.
    pub fn map_to<T: DeserializeOwned>(&self, id: &str, fields: &FieldMap) -> Result<T> {
        let mut object: FieldMap = self
            .fields
            .keys()
            .map(|name| (name.clone(), fields.get(name).cloned().unwrap_or(Value::Null)))
            .collect();
        object.insert(self.id_field.clone(), Value::String(id.to_string()));

        serde_json::from_value(Value::Object(object)).map_err(|e| {
            SearchError::mapping(format!(
                "cannot rebuild {}@{id} from stored fields: {e}",
                self.type_name
            ))
        })
    }
}
