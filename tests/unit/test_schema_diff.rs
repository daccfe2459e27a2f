//! Unit tests for schema comparison.

#[cfg(test)]
mod tests {
    use schema_diagram_api::models::{
        Cardinality, ChangeType, CollectionSchema, DatabaseMetadata, FieldType,
        RelationshipCandidate, RelationshipEdge,
    };
    use schema_diagram_api::services::diff_metadata;
    use serde_json::json;

    fn collection(name: &str, fields: &[(&str, FieldType)]) -> CollectionSchema {
        let mut schema = CollectionSchema::new(name);
        for (field, field_type) in fields {
            schema.schema.insert(field.to_string(), field_type.clone());
        }
        schema
    }

    #[test]
    fn test_added_field() {
        let before = DatabaseMetadata::new(vec![collection(
            "users",
            &[("name", FieldType::primitive("string"))],
        )]);
        let after = DatabaseMetadata::new(vec![collection(
            "users",
            &[
                ("name", FieldType::primitive("string")),
                ("age", FieldType::primitive("number")),
            ],
        )]);

        let diff = diff_metadata(&before, &after);

        assert!(diff.collections_added.is_empty());
        assert!(diff.collections_removed.is_empty());
        assert_eq!(diff.collections_modified.len(), 1);
        let changes = diff.changes_for("users").unwrap();
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].change_type, ChangeType::Added);
        assert_eq!(changes[0].field, "age");
        assert_eq!(changes[0].details, "type: number");
    }

    #[test]
    fn test_self_diff_is_empty() {
        let metadata = DatabaseMetadata::new(vec![
            collection("users", &[("name", FieldType::primitive("string"))]),
            collection(
                "orders",
                &[("items", FieldType::array_of(FieldType::object_id()))],
            ),
        ]);

        let diff = diff_metadata(&metadata, &metadata);

        assert!(diff.is_empty());
    }

    #[test]
    fn test_numeric_width_change_is_modification() {
        let before = DatabaseMetadata::new(vec![collection(
            "events",
            &[("count", FieldType::primitive("int"))],
        )]);
        let after = DatabaseMetadata::new(vec![collection(
            "events",
            &[("count", FieldType::primitive("long"))],
        )]);

        let diff = diff_metadata(&before, &after);

        let changes = diff.changes_for("events").unwrap();
        assert_eq!(changes[0].change_type, ChangeType::Modified);
        assert_eq!(changes[0].details, "int -> long");
    }

    #[test]
    fn test_removed_field() {
        let before = DatabaseMetadata::new(vec![collection(
            "users",
            &[
                ("name", FieldType::primitive("string")),
                ("legacy", FieldType::primitive("boolean")),
            ],
        )]);
        let after = DatabaseMetadata::new(vec![collection(
            "users",
            &[("name", FieldType::primitive("string"))],
        )]);

        let diff = diff_metadata(&before, &after);

        let changes = diff.changes_for("users").unwrap();
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].change_type, ChangeType::Removed);
        assert_eq!(changes[0].field, "legacy");
        assert_eq!(changes[0].details, "type: boolean");
    }

    #[test]
    fn test_collections_added_and_removed() {
        let before = DatabaseMetadata::new(vec![
            collection("users", &[]),
            collection("sessions", &[]),
        ]);
        let after = DatabaseMetadata::new(vec![
            collection("users", &[]),
            collection("audit", &[]),
            collection("tokens", &[]),
        ]);

        let diff = diff_metadata(&before, &after);

        assert_eq!(diff.collections_added, vec!["audit", "tokens"]);
        assert_eq!(diff.collections_removed, vec!["sessions"]);
        assert!(diff.collections_modified.is_empty());
    }

    #[test]
    fn test_field_order_is_not_a_change() {
        let before = DatabaseMetadata::new(vec![collection(
            "users",
            &[
                ("a", FieldType::primitive("string")),
                ("b", FieldType::primitive("int")),
            ],
        )]);
        let after = DatabaseMetadata::new(vec![collection(
            "users",
            &[
                ("b", FieldType::primitive("int")),
                ("a", FieldType::primitive("string")),
            ],
        )]);

        assert!(diff_metadata(&before, &after).is_empty());
    }

    #[test]
    fn test_relationship_edges_diff() {
        let mut orders = collection("orders", &[("userId", FieldType::object_id())]);
        let mut candidate =
            RelationshipCandidate::new("orders", "userId", Cardinality::One, "ObjectId".to_string());
        candidate.to = Some("users".to_string());
        orders.relationships.push(candidate);

        let before = DatabaseMetadata::new(vec![
            collection("orders", &[("userId", FieldType::object_id())]),
            collection("users", &[]),
        ]);
        let after = DatabaseMetadata::new(vec![orders, collection("users", &[])]);

        let diff = diff_metadata(&before, &after);

        assert_eq!(
            diff.relationships_added,
            vec![RelationshipEdge {
                from: "orders".to_string(),
                to: "users".to_string(),
                field: "userId".to_string(),
            }]
        );
        assert!(diff.relationships_removed.is_empty());
        assert!(diff.collections_modified.is_empty());
    }

    #[test]
    fn test_diff_serialization_shape() {
        let before = DatabaseMetadata::new(vec![collection("users", &[])]);
        let after = DatabaseMetadata::new(vec![collection(
            "users",
            &[("age", FieldType::primitive("int"))],
        )]);

        let value = serde_json::to_value(diff_metadata(&before, &after)).unwrap();

        assert_eq!(
            value,
            json!({
                "collectionsAdded": [],
                "collectionsRemoved": [],
                "collectionsModified": [{
                    "collection": "users",
                    "changes": [{"type": "added", "field": "age", "details": "type: int"}]
                }],
                "relationshipsAdded": [],
                "relationshipsRemoved": []
            })
        );
    }
}
