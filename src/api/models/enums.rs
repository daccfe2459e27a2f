use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Cardinality of a reference field as seen from the referencing collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cardinality {
    One,
    Many,
}

impl Cardinality {
    /// Mermaid crow's-foot arrow for this cardinality.
    pub fn as_mermaid(&self) -> &'static str {
        match self {
            Cardinality::One => "o--||",
            Cardinality::Many => "}o--||",
        }
    }
}

/// How observations of the same field across sampled documents are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum MergeStrategy {
    /// The first observed type wins; later shapes are ignored.
    #[default]
    FirstSeen,
    /// Every distinct shape is kept and reported as a union.
    Union,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    Added,
    Removed,
    Modified,
}
