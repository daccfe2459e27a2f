//! Schema comparison between two databases.

use super::introspection_service::{IntrospectionOptions, IntrospectionService};
use crate::models::{ChangeType, CollectionChanges, CollectionSchema, DatabaseMetadata, FieldChange, SchemaDiff};
use crate::storage::IntrospectionError;
use serde::Serialize;
use std::collections::HashSet;
use tracing::info;

/// Both introspection results plus the diff between them.
#[derive(Debug, Clone, Serialize)]
pub struct DatabaseComparison {
    pub before: DatabaseMetadata,
    pub after: DatabaseMetadata,
    pub diff: SchemaDiff,
}

/// Service comparing the schemas of two databases.
#[derive(Clone)]
pub struct ComparisonService {
    introspection: IntrospectionService,
}

impl ComparisonService {
    pub fn new(introspection: IntrospectionService) -> Self {
        Self { introspection }
    }

    /// Introspect both targets concurrently and diff them, first to second.
    ///
    /// Both introspections always run to completion so each one closes its
    /// own connection; the first error, in argument order, is returned.
    pub async fn compare_databases(
        &self,
        (uri1, db1): (&str, &str),
        (uri2, db2): (&str, &str),
        options: &IntrospectionOptions,
    ) -> Result<DatabaseComparison, IntrospectionError> {
        let (before, after) = tokio::join!(
            self.introspection.introspect_database(uri1, db1, options),
            self.introspection.introspect_database(uri2, db2, options),
        );
        let (before, after) = (before?, after?);

        let diff = diff_metadata(&before, &after);
        info!(
            "[Compare] {} vs {}: {} added, {} removed, {} modified collections",
            db1,
            db2,
            diff.collections_added.len(),
            diff.collections_removed.len(),
            diff.collections_modified.len()
        );

        Ok(DatabaseComparison {
            before,
            after,
            diff,
        })
    }
}

/// Compute collection-, field- and edge-level differences.
///
/// Field types are compared structurally: `int` becoming `long` is a
/// modification even though both are numeric.
pub fn diff_metadata(before: &DatabaseMetadata, after: &DatabaseMetadata) -> SchemaDiff {
    let mut diff = SchemaDiff::default();

    for collection in &after.collections {
        match before.get_collection(&collection.name) {
            None => diff.collections_added.push(collection.name.clone()),
            Some(previous) => {
                let changes = diff_fields(previous, collection);
                if !changes.is_empty() {
                    diff.collections_modified.push(CollectionChanges {
                        collection: collection.name.clone(),
                        changes,
                    });
                }
            }
        }
    }

    diff.collections_removed = before
        .collections
        .iter()
        .filter(|c| after.get_collection(&c.name).is_none())
        .map(|c| c.name.clone())
        .collect();

    let before_edges = before.resolved_edges();
    let after_edges = after.resolved_edges();
    diff.relationships_added = after_edges.difference(&before_edges).cloned().collect();
    diff.relationships_removed = before_edges.difference(&after_edges).cloned().collect();

    diff
}

fn diff_fields(before: &CollectionSchema, after: &CollectionSchema) -> Vec<FieldChange> {
    let mut changes = Vec::new();
    let mut seen = HashSet::new();

    for (field, after_type) in &after.schema {
        seen.insert(field.as_str());
        match before.schema.get(field) {
            None => changes.push(FieldChange {
                change_type: ChangeType::Added,
                field: field.clone(),
                details: format!("type: {}", after_type.type_name()),
            }),
            Some(before_type) if before_type != after_type => changes.push(FieldChange {
                change_type: ChangeType::Modified,
                field: field.clone(),
                details: format!("{} -> {}", before_type.type_name(), after_type.type_name()),
            }),
            Some(_) => {}
        }
    }

    for (field, before_type) in &before.schema {
        if !seen.contains(field.as_str()) {
            changes.push(FieldChange {
                change_type: ChangeType::Removed,
                field: field.clone(),
                details: format!("type: {}", before_type.type_name()),
            });
        }
    }

    changes
}
