use super::enums::Cardinality;
use serde::{Deserialize, Serialize};

/// A field suspected of referencing documents in another collection.
///
/// `to` stays `None` until the introspector matches the field name against
/// the known collection names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipCandidate {
    pub from: String,
    pub field: String,
    #[serde(rename = "type")]
    pub cardinality: Cardinality,
    /// Projected type name of the field, e.g. `ObjectId[]`.
    pub through: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
}

impl RelationshipCandidate {
    pub fn new(from: &str, field: &str, cardinality: Cardinality, through: String) -> Self {
        Self {
            from: from.to_string(),
            field: field.to_string(),
            cardinality,
            through,
            to: None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.to.is_some()
    }

    /// Edge key for resolved candidates; `None` while unresolved.
    pub fn edge(&self) -> Option<RelationshipEdge> {
        self.to.as_ref().map(|to| RelationshipEdge {
            from: self.from.clone(),
            to: to.clone(),
            field: self.field.clone(),
        })
    }
}

/// A resolved `from -> to` edge, identified by the referencing field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RelationshipEdge {
    pub from: String,
    pub to: String,
    pub field: String,
}
