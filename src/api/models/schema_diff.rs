use super::enums::ChangeType;
use super::relationship::RelationshipEdge;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldChange {
    #[serde(rename = "type")]
    pub change_type: ChangeType,
    pub field: String,
    pub details: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionChanges {
    pub collection: String,
    pub changes: Vec<FieldChange>,
}

/// Differences between two introspected databases, first to second.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaDiff {
    pub collections_added: Vec<String>,
    pub collections_removed: Vec<String>,
    pub collections_modified: Vec<CollectionChanges>,
    #[serde(default)]
    pub relationships_added: Vec<RelationshipEdge>,
    #[serde(default)]
    pub relationships_removed: Vec<RelationshipEdge>,
}

impl SchemaDiff {
    /// True when neither collections nor fields nor edges differ.
    pub fn is_empty(&self) -> bool {
        self.collections_added.is_empty()
            && self.collections_removed.is_empty()
            && self.collections_modified.is_empty()
            && self.relationships_added.is_empty()
            && self.relationships_removed.is_empty()
    }

    pub fn changes_for(&self, collection: &str) -> Option<&[FieldChange]> {
        self.collections_modified
            .iter()
            .find(|c| c.collection == collection)
            .map(|c| c.changes.as_slice())
    }
}
