//! Collection analyzer: merges sampled documents into a collection schema.

use super::field_analyzer::FieldAnalyzer;
use crate::models::{Cardinality, CollectionSchema, FieldType, MergeStrategy, RelationshipCandidate};
use crate::storage::{DocumentStore, IntrospectionError};
use mongodb::bson::Document;
use tracing::debug;

/// Default number of documents drawn per collection.
pub const DEFAULT_SAMPLE_SIZE: u32 = 100;

#[derive(Debug, Clone, Copy, Default)]
pub struct CollectionAnalyzer {
    field_analyzer: FieldAnalyzer,
    strategy: MergeStrategy,
}

impl CollectionAnalyzer {
    pub fn new(field_analyzer: FieldAnalyzer, strategy: MergeStrategy) -> Self {
        Self {
            field_analyzer,
            strategy,
        }
    }

    /// Sample `sample_size` documents from `collection` and build its schema.
    ///
    /// Against MongoDB the sample is random, so two calls on a collection with
    /// heterogeneous documents may return different schemas.
    pub async fn analyze_collection(
        &self,
        store: &dyn DocumentStore,
        collection: &str,
        sample_size: u32,
    ) -> Result<CollectionSchema, IntrospectionError> {
        let documents = store.sample(collection, sample_size).await?;
        debug!(
            "[Introspect] Analyzing {} sampled documents from {}",
            documents.len(),
            collection
        );
        Ok(self.analyze_documents(collection, &documents))
    }

    /// Merge already-fetched documents into a schema.
    pub fn analyze_documents(&self, collection: &str, documents: &[Document]) -> CollectionSchema {
        let mut schema = CollectionSchema::new(collection);

        for document in documents {
            for (field, value) in document {
                let observed = self.field_analyzer.analyze(value);

                match schema.schema.get_mut(field) {
                    Some(existing) => {
                        if self.strategy == MergeStrategy::Union {
                            merge_union(existing, observed);
                        }
                    }
                    None => {
                        if let Some(candidate) = relationship_candidate(collection, field, &observed) {
                            schema.relationships.push(candidate);
                        }
                        schema.schema.insert(field.clone(), observed);
                    }
                }
            }
        }

        schema
    }
}

/// Apply the reference heuristic to a top-level field.
///
/// A field qualifies when it holds an ObjectId, an array of ObjectIds, or its
/// name ends in `Id`/`_id`. The document's own `_id` never qualifies.
pub fn relationship_candidate(
    collection: &str,
    field: &str,
    field_type: &FieldType,
) -> Option<RelationshipCandidate> {
    if field == "_id" {
        return None;
    }

    let named_like_reference = field.ends_with("Id") || field.ends_with("_id");
    if !(field_type.is_object_id() || field_type.is_reference_array() || named_like_reference) {
        return None;
    }

    let cardinality = if field_type.is_array() {
        Cardinality::Many
    } else {
        Cardinality::One
    };

    Some(RelationshipCandidate::new(
        collection,
        field,
        cardinality,
        field_type.type_name(),
    ))
}

fn merge_union(existing: &mut FieldType, observed: FieldType) {
    match existing {
        FieldType::Union { variants } => {
            if !variants.contains(&observed) {
                variants.push(observed);
            }
        }
        current if *current != observed => {
            let first = std::mem::replace(current, FieldType::Null);
            *current = FieldType::Union {
                variants: vec![first, observed],
            };
        }
        _ => {}
    }
}
