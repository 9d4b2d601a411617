//! Searchable document mapping.
//!
//! Each record type declares its identifier and indexed fields once, through
//! a [`DocumentSchema`]. The declaration is validated into a [`Mapping`]
//! when the type is registered, so misdeclared types fail at startup.
//!
//! # Examples
//!
//! ```
//! use serde::{Deserialize, Serialize};
//! use searchable::schema::{DocumentSchema, Mapping, Searchable};
//!
//! #[derive(Serialize, Deserialize)]
//! struct Note {
//!     id: String,
//!     body: String,
//! }
//!
//! impl Searchable for Note {
//!     fn schema() -> DocumentSchema {
//!         DocumentSchema::new("note").id::<String>("id").field::<String>("body")
//!     }
//! }
//!
//! let mapping = Mapping::for_type::<Note>().unwrap();
//! assert_eq!(mapping.type_name(), "note");
//! ```

pub mod field;
pub mod mapping;

// Re-exports
pub use field::{FieldDeclaration, FieldRole, FieldType};
pub use mapping::{DocumentSchema, Mapping, Searchable};
