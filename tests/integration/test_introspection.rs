//! Integration tests for database introspection and comparison over the
//! in-memory document store.

use mongodb::bson::{doc, oid::ObjectId};
use schema_diagram_api::export::MermaidExporter;
use schema_diagram_api::models::{Cardinality, FieldType};
use schema_diagram_api::services::{
    ComparisonService, IntrospectionOptions, IntrospectionService, MappingNameResolver,
};
use schema_diagram_api::storage::{InMemoryConnector, IntrospectionError};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

const SHOP: &str = "mem://shop";

fn shop_connector() -> InMemoryConnector {
    let alice = ObjectId::new();
    InMemoryConnector::new()
        .with_collection(SHOP, "shop", "users", vec![doc! { "_id": alice, "name": "Alice" }])
        .with_collection(
            SHOP,
            "shop",
            "orders",
            vec![
                doc! { "_id": ObjectId::new(), "userId": alice, "total": 12.5 },
                doc! { "_id": ObjectId::new(), "userId": alice, "total": 3.0, "note": "gift" },
            ],
        )
}

fn plural_options() -> IntrospectionOptions {
    IntrospectionOptions {
        pluralize: true,
        ..Default::default()
    }
}

#[tokio::test]
async fn test_introspect_users_and_orders() {
    let connector = Arc::new(shop_connector());
    let service = IntrospectionService::new(connector.clone());

    let metadata = service
        .introspect_database(SHOP, "shop", &plural_options())
        .await
        .unwrap();

    assert_eq!(metadata.collection_names(), vec!["orders", "users"]);

    let orders = metadata.get_collection("orders").unwrap();
    assert_eq!(orders.field("userId"), Some(&FieldType::object_id()));
    assert_eq!(orders.field("total"), Some(&FieldType::primitive("number")));
    assert_eq!(orders.field("note"), Some(&FieldType::primitive("string")));
    assert_eq!(orders.relationships.len(), 1);
    assert_eq!(orders.relationships[0].to.as_deref(), Some("users"));
    assert_eq!(orders.relationships[0].cardinality, Cardinality::One);

    let users = metadata.get_collection("users").unwrap();
    assert!(users.relationships.is_empty());

    let diagram = MermaidExporter::export_database(&metadata);
    assert!(diagram.contains("    \"orders\" o--|| \"users\" : \"userId\"\n"));

    assert_eq!(connector.opened_connections(), 1);
    assert_eq!(connector.closed_connections(), 1);
}

#[tokio::test]
async fn test_exact_name_match_by_default() {
    let connector = Arc::new(shop_connector());
    let service = IntrospectionService::new(connector);

    let metadata = service
        .introspect_database(SHOP, "shop", &IntrospectionOptions::default())
        .await
        .unwrap();

    // `userId` strips to `user`, which is not `users` without plural matching.
    let orders = metadata.get_collection("orders").unwrap();
    assert_eq!(orders.relationships.len(), 1);
    assert_eq!(orders.relationships[0].to, None);
    assert!(metadata.resolved_edges().is_empty());
}

#[tokio::test]
async fn test_explicit_references_take_precedence() {
    let connector = Arc::new(shop_connector());
    let service = IntrospectionService::new(connector);
    let options = IntrospectionOptions {
        references: HashMap::from([("userId".to_string(), "users".to_string())]),
        ..Default::default()
    };

    let metadata = service
        .introspect_database(SHOP, "shop", &options)
        .await
        .unwrap();

    let orders = metadata.get_collection("orders").unwrap();
    assert_eq!(orders.relationships[0].to.as_deref(), Some("users"));
}

#[tokio::test]
async fn test_custom_resolver_overrides_options() {
    let connector = Arc::new(shop_connector());
    let resolver = MappingNameResolver::new(HashMap::from([(
        "userId".to_string(),
        "users".to_string(),
    )]));
    let service = IntrospectionService::new(connector).with_resolver(Arc::new(resolver));

    let metadata = service
        .introspect_database(SHOP, "shop", &IntrospectionOptions::default())
        .await
        .unwrap();

    assert_eq!(metadata.resolved_edges().len(), 1);
}

#[tokio::test]
async fn test_introspection_is_repeatable() {
    let connector = Arc::new(shop_connector());
    let service = IntrospectionService::new(connector);

    let first = service
        .introspect_database(SHOP, "shop", &plural_options())
        .await
        .unwrap();
    let second = service
        .introspect_database(SHOP, "shop", &plural_options())
        .await
        .unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_empty_collection_has_empty_schema() {
    let connector = Arc::new(InMemoryConnector::new().with_collection(SHOP, "shop", "drafts", vec![]));
    let service = IntrospectionService::new(connector);

    let metadata = service
        .introspect_database(SHOP, "shop", &IntrospectionOptions::default())
        .await
        .unwrap();

    let drafts = metadata.get_collection("drafts").unwrap();
    assert!(drafts.schema.is_empty());
    assert!(drafts.relationships.is_empty());
}

#[tokio::test]
async fn test_unknown_database_is_empty() {
    let connector = Arc::new(shop_connector());
    let service = IntrospectionService::new(connector);

    let metadata = service
        .introspect_database(SHOP, "missing", &IntrospectionOptions::default())
        .await
        .unwrap();

    assert!(metadata.is_empty());
    assert_eq!(MermaidExporter::export_database(&metadata), "erDiagram\n");
}

#[tokio::test]
async fn test_sample_size_limits_documents() {
    let connector = Arc::new(shop_connector());
    let service = IntrospectionService::new(connector);
    let options = IntrospectionOptions {
        sample_size: 1,
        ..Default::default()
    };

    let metadata = service
        .introspect_database(SHOP, "shop", &options)
        .await
        .unwrap();

    // `note` only appears in the second order document.
    assert_eq!(metadata.get_collection("orders").unwrap().field("note"), None);
}

#[tokio::test]
async fn test_unreachable_server_is_connection_error() {
    let connector = Arc::new(shop_connector());
    let service = IntrospectionService::new(connector.clone());

    let result = service
        .introspect_database("mem://elsewhere", "shop", &IntrospectionOptions::default())
        .await;

    assert!(matches!(result, Err(IntrospectionError::Connection(_))));
    assert_eq!(connector.opened_connections(), 0);
}

#[tokio::test]
async fn test_failed_sampling_closes_connection() {
    let connector = Arc::new(shop_connector().with_failing_collection(SHOP, "shop", "broken"));
    let service = IntrospectionService::new(connector.clone());

    let result = service
        .introspect_database(SHOP, "shop", &IntrospectionOptions::default())
        .await;

    match result {
        Err(IntrospectionError::Query { collection, .. }) => assert_eq!(collection, "broken"),
        other => panic!("expected query error, got {:?}", other),
    }
    assert_eq!(connector.opened_connections(), 1);
    assert_eq!(connector.closed_connections(), connector.opened_connections());
}

#[tokio::test]
async fn test_failed_compare_closes_both_connections() {
    let connector = Arc::new(
        InMemoryConnector::new()
            .with_failing_collection(SHOP, "bad", "broken")
            .with_collection(SHOP, "good", "a", vec![doc! { "n": 1 }])
            .with_collection(SHOP, "good", "b", vec![doc! { "n": 2 }])
            .with_collection(SHOP, "good", "c", vec![doc! { "n": 3 }])
            .with_latency(Duration::from_millis(50)),
    );
    let service = ComparisonService::new(IntrospectionService::new(connector.clone()));
    let options = IntrospectionOptions {
        concurrency: 1,
        ..Default::default()
    };

    let result = service
        .compare_databases((SHOP, "bad"), (SHOP, "good"), &options)
        .await;

    assert!(matches!(result, Err(IntrospectionError::Query { .. })));
    assert_eq!(connector.opened_connections(), 2);
    assert_eq!(connector.closed_connections(), connector.opened_connections());
}

#[tokio::test]
async fn test_operation_timeout_closes_connection() {
    let connector = Arc::new(shop_connector().with_latency(Duration::from_millis(500)));
    let service = IntrospectionService::new(connector.clone());
    let options = IntrospectionOptions {
        operation_timeout: Duration::from_millis(50),
        ..Default::default()
    };

    let result = service.introspect_database(SHOP, "shop", &options).await;

    assert!(matches!(result, Err(IntrospectionError::Timeout { .. })));
    assert_eq!(connector.opened_connections(), 1);
    assert_eq!(connector.closed_connections(), 1);
}

#[tokio::test]
async fn test_invalid_options_are_rejected_before_connecting() {
    let connector = Arc::new(shop_connector());
    let service = IntrospectionService::new(connector.clone());
    let options = IntrospectionOptions {
        concurrency: 0,
        ..Default::default()
    };

    let result = service.introspect_database(SHOP, "shop", &options).await;

    assert!(matches!(result, Err(IntrospectionError::InvalidOptions(_))));
    assert_eq!(connector.opened_connections(), 0);
}

#[tokio::test]
async fn test_compare_same_database_is_empty() {
    let connector = Arc::new(shop_connector());
    let service = ComparisonService::new(IntrospectionService::new(connector.clone()));

    let comparison = service
        .compare_databases((SHOP, "shop"), (SHOP, "shop"), &plural_options())
        .await
        .unwrap();

    assert!(comparison.diff.is_empty());
    assert_eq!(comparison.before, comparison.after);
    assert_eq!(connector.closed_connections(), 2);
}

#[tokio::test]
async fn test_compare_staging_with_production() {
    let connector = Arc::new(
        shop_connector()
            .with_collection(SHOP, "staging", "users", vec![doc! { "_id": ObjectId::new(), "name": 1 }])
            .with_collection(SHOP, "staging", "coupons", vec![doc! { "code": "X" }]),
    );
    let service = ComparisonService::new(IntrospectionService::new(connector));

    let comparison = service
        .compare_databases((SHOP, "shop"), (SHOP, "staging"), &IntrospectionOptions::default())
        .await
        .unwrap();

    assert_eq!(comparison.diff.collections_added, vec!["coupons"]);
    assert_eq!(comparison.diff.collections_removed, vec!["orders"]);
    let changes = comparison.diff.changes_for("users").unwrap();
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].field, "name");
    assert_eq!(changes[0].details, "string -> int");
}
