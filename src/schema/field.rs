//! Field types and field declarations.

use std::any::{TypeId, type_name};
use std::collections::HashMap;
use std::fmt;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

/// Engine-side type of an indexed field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Analyzed full text.
    Text,
    /// Exact, non-analyzed string.
    Keyword,
    Integer,
    Long,
    Boolean,
    Float,
    Double,
}

lazy_static! {
    /// Host types accepted for indexed fields. `Option<T>` maps like `T`.
    static ref HOST_TYPES: HashMap<TypeId, FieldType> = {
        let mut map = HashMap::new();
        map.insert(TypeId::of::<String>(), FieldType::Text);
        map.insert(TypeId::of::<Option<String>>(), FieldType::Text);
        map.insert(TypeId::of::<i32>(), FieldType::Integer);
        map.insert(TypeId::of::<Option<i32>>(), FieldType::Integer);
        map.insert(TypeId::of::<i64>(), FieldType::Long);
        map.insert(TypeId::of::<Option<i64>>(), FieldType::Long);
        map.insert(TypeId::of::<bool>(), FieldType::Boolean);
        map.insert(TypeId::of::<Option<bool>>(), FieldType::Boolean);
        map.insert(TypeId::of::<f32>(), FieldType::Float);
        map.insert(TypeId::of::<Option<f32>>(), FieldType::Float);
        map.insert(TypeId::of::<f64>(), FieldType::Double);
        map.insert(TypeId::of::<Option<f64>>(), FieldType::Double);
        map
    };
}

impl FieldType {
    /// Look up the field type for a host type.
    pub fn for_host_type(type_id: TypeId) -> Option<FieldType> {
        HOST_TYPES.get(&type_id).copied()
    }

    /// The type name used in schema sources.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Keyword => "keyword",
            FieldType::Integer => "integer",
            FieldType::Long => "long",
            FieldType::Boolean => "boolean",
            FieldType::Float => "float",
            FieldType::Double => "double",
        }
    }

    /// Returns true for string-valued field types.
    pub fn is_textual(&self) -> bool {
        matches!(self, FieldType::Text | FieldType::Keyword)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a declared field is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRole {
    /// The document identifier. Must be a `String`.
    Identifier,
    /// An indexed field. Keyword fields are indexed as `keyword` regardless
    /// of their host type.
    Indexed { keyword: bool },
}

/// One entry of a [`DocumentSchema`](super::DocumentSchema).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDeclaration {
    pub name: String,
    pub role: FieldRole,
    /// Host type of the record field.
    pub type_id: TypeId,
    /// Host type name, for error messages only.
    pub host_type: &'static str,
}

impl FieldDeclaration {
    pub fn of<T: 'static>(name: impl Into<String>, role: FieldRole) -> Self {
        FieldDeclaration {
            name: name.into(),
            role,
            type_id: TypeId::of::<T>(),
            host_type: type_name::<T>(),
        }
    }

    pub fn is_identifier(&self) -> bool {
        self.role == FieldRole::Identifier
    }
}
