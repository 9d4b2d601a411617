use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Field values of a document, keyed by field name.
pub type FieldMap = serde_json::Map<String, Value>;

/// A document as the search engine sees it: an identifier plus its
/// indexed field values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Unique identifier within the document type.
    pub id: String,

    /// Field data.
    pub fields: FieldMap,
}

impl Document {
    /// Create a new document with no fields.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fields: FieldMap::new(),
        }
    }

    /// Create a document from an existing field map.
    pub fn with_fields(id: impl Into<String>, fields: FieldMap) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    /// Add a field to the document.
    pub fn add_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Get a reference to a field's value.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Get a field's value as text, if it is a string.
    pub fn get_text(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(Value::as_str)
    }

    /// Check if the document has a field.
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Get all field names.
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.keys().map(|s| s.as_str()).collect()
    }

    /// Get the number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the document is empty.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Split into identifier and field map.
    pub fn into_parts(self) -> (String, FieldMap) {
        (self.id, self.fields)
    }
}
