// Models module - contains FieldType, CollectionSchema, DatabaseMetadata, SchemaDiff and enums

pub mod collection;
pub mod enums;
pub mod field_type;
pub mod metadata;
pub mod relationship;
pub mod schema_diff;

pub use collection::CollectionSchema;
pub use enums::{Cardinality, ChangeType, MergeStrategy};
pub use field_type::FieldType;
pub use metadata::DatabaseMetadata;
pub use relationship::{RelationshipCandidate, RelationshipEdge};
pub use schema_diff::{CollectionChanges, FieldChange, SchemaDiff};
