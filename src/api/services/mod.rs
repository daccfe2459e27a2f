//! Services module - schema inference, relationship resolution and comparison.

pub mod collection_analyzer;
pub mod comparison_service;
pub mod field_analyzer;
pub mod introspection_service;
pub mod name_resolver;

// Re-export for convenience
pub use collection_analyzer::CollectionAnalyzer;
pub use comparison_service::{diff_metadata, ComparisonService, DatabaseComparison};
pub use field_analyzer::{analyze_field, FieldAnalyzer};
pub use introspection_service::{IntrospectionOptions, IntrospectionService};
pub use name_resolver::{
    ChainedNameResolver, MappingNameResolver, NameResolver, SuffixNameResolver,
};
