use super::collection::CollectionSchema;
use super::relationship::RelationshipEdge;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Introspection result for a whole database: one schema per collection.
///
/// Serializes as a plain JSON array.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DatabaseMetadata {
    pub collections: Vec<CollectionSchema>,
}

impl DatabaseMetadata {
    pub fn new(collections: Vec<CollectionSchema>) -> Self {
        Self { collections }
    }

    pub fn get_collection(&self, name: &str) -> Option<&CollectionSchema> {
        self.collections.iter().find(|c| c.name == name)
    }

    pub fn collection_names(&self) -> Vec<String> {
        self.collections.iter().map(|c| c.name.clone()).collect()
    }

    /// Distinct resolved edges across all collections, sorted.
    pub fn resolved_edges(&self) -> BTreeSet<RelationshipEdge> {
        self.collections
            .iter()
            .flat_map(|c| c.relationships.iter())
            .filter_map(|r| r.edge())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }
}
