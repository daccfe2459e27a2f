use super::field_type::FieldType;
use super::relationship::RelationshipCandidate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Schema inferred for one collection from a document sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionSchema {
    pub name: String,
    /// Top-level fields in order of first observation.
    #[serde(default)]
    pub schema: IndexMap<String, FieldType>,
    #[serde(default)]
    pub relationships: Vec<RelationshipCandidate>,
}

impl CollectionSchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            schema: IndexMap::new(),
            relationships: Vec::new(),
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldType> {
        self.schema.get(name)
    }

    pub fn resolved_relationships(&self) -> impl Iterator<Item = &RelationshipCandidate> {
        self.relationships.iter().filter(|r| r.is_resolved())
    }
}
