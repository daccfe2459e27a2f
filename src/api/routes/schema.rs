//! Schema introspection routes.
//!
//! A single POST endpoint dispatches on the `action` field of the body:
//! - `introspect`: sample one database, return metadata and its diagram
//! - `compare`: diff two databases, return the diff and an annotated diagram
//! - `focus`: diagram of one collection and its direct neighbours

use axum::{
    extract::{rejection::JsonRejection, State},
    response::Json,
    routing::post,
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{info, warn};
use utoipa::ToSchema;

use super::app_state::AppState;
use super::error::ApiError;
use crate::export::MermaidExporter;
use crate::models::MergeStrategy;
use crate::services::IntrospectionOptions;

/// Create the schema router
pub fn schema_router() -> Router<AppState> {
    Router::new().route("/schema", post(handle_schema_request))
}

/// Request body for POST /schema
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SchemaRequest {
    /// One of `introspect`, `compare`, `focus`
    pub action: Option<String>,
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub db_name: Option<String>,
    #[serde(default)]
    pub options: Option<RequestOptions>,
    #[serde(default)]
    pub uri1: Option<String>,
    #[serde(default)]
    pub db1: Option<String>,
    #[serde(default)]
    pub uri2: Option<String>,
    #[serde(default)]
    pub db2: Option<String>,
    #[serde(default)]
    pub collection: Option<String>,
}

/// Per-request overrides of the configured introspection defaults
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RequestOptions {
    pub sample_size: Option<u32>,
    pub merge_strategy: Option<MergeStrategy>,
    pub pluralize: Option<bool>,
    /// Explicit field name -> collection name mapping
    pub references: Option<HashMap<String, String>>,
    pub concurrency: Option<usize>,
    pub query_timeout_ms: Option<u64>,
    pub operation_timeout_ms: Option<u64>,
    pub max_depth: Option<usize>,
}

impl RequestOptions {
    /// Overlay these options on `defaults`.
    pub fn apply(self, defaults: &IntrospectionOptions) -> IntrospectionOptions {
        let mut options = defaults.clone();
        if let Some(sample_size) = self.sample_size {
            options.sample_size = sample_size;
        }
        if let Some(strategy) = self.merge_strategy {
            options.merge_strategy = strategy;
        }
        if let Some(pluralize) = self.pluralize {
            options.pluralize = pluralize;
        }
        if let Some(references) = self.references {
            options.references = references;
        }
        if let Some(concurrency) = self.concurrency {
            options.concurrency = concurrency;
        }
        if let Some(ms) = self.query_timeout_ms {
            options.query_timeout = Duration::from_millis(ms);
        }
        if let Some(ms) = self.operation_timeout_ms {
            options.operation_timeout = Duration::from_millis(ms);
        }
        if let Some(max_depth) = self.max_depth {
            options.max_depth = max_depth;
        }
        options
    }
}

/// POST /schema - Introspect, compare or focus on MongoDB schemas
#[utoipa::path(
    post,
    path = "/schema",
    tag = "Schema",
    request_body = SchemaRequest,
    responses(
        (status = 200, description = "Metadata and Mermaid diagram", body = Object),
        (status = 400, description = "Bad request - missing parameters or invalid action"),
        (status = 404, description = "Focus collection not found"),
        (status = 500, description = "Introspection failed")
    )
)]
pub async fn handle_schema_request(
    State(state): State<AppState>,
    payload: Result<Json<SchemaRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        warn!("[Schema] Malformed request body: {}", rejection.body_text());
        ApiError::bad_request(format!("Invalid request body: {}", rejection.body_text()))
    })?;

    let action = request.action.clone().unwrap_or_default();
    match action.as_str() {
        "introspect" => introspect(&state, request).await,
        "compare" => compare(&state, request).await,
        "focus" => focus(&state, request).await,
        "" => Err(ApiError::bad_request("Missing required parameter: action")),
        other => {
            warn!("[Schema] Invalid action: {}", other);
            Err(ApiError::bad_request(format!(
                "Invalid action '{}'; expected introspect, compare or focus",
                other
            )))
        }
    }
}

async fn introspect(state: &AppState, request: SchemaRequest) -> Result<Json<Value>, ApiError> {
    let [uri, db_name] = required([("uri", &request.uri), ("dbName", &request.db_name)])?;
    let options = request
        .options
        .unwrap_or_default()
        .apply(&state.defaults);

    info!("[Schema] introspect {}", db_name);
    let metadata = state
        .introspection
        .introspect_database(uri, db_name, &options)
        .await?;
    let mermaid_code = MermaidExporter::export_database(&metadata);

    Ok(Json(json!({
        "metadata": metadata,
        "mermaidCode": mermaid_code,
    })))
}

async fn compare(state: &AppState, request: SchemaRequest) -> Result<Json<Value>, ApiError> {
    let [uri1, db1, uri2, db2] = required([
        ("uri1", &request.uri1),
        ("db1", &request.db1),
        ("uri2", &request.uri2),
        ("db2", &request.db2),
    ])?;
    let options = request
        .options
        .unwrap_or_default()
        .apply(&state.defaults);

    info!("[Schema] compare {} with {}", db1, db2);
    let comparison = state
        .comparison
        .compare_databases((uri1, db1), (uri2, db2), &options)
        .await?;
    let mermaid_code = MermaidExporter::export_comparison(&comparison.before, &comparison.after);

    Ok(Json(json!({
        "comparison": comparison.diff,
        "mermaidCode": mermaid_code,
    })))
}

async fn focus(state: &AppState, request: SchemaRequest) -> Result<Json<Value>, ApiError> {
    let [uri, db_name, collection] = required([
        ("uri", &request.uri),
        ("dbName", &request.db_name),
        ("collection", &request.collection),
    ])?;
    let options = request
        .options
        .unwrap_or_default()
        .apply(&state.defaults);

    info!("[Schema] focus {} in {}", collection, db_name);
    let metadata = state
        .introspection
        .introspect_database(uri, db_name, &options)
        .await?;

    let mermaid_code = MermaidExporter::export_focused(&metadata, collection).ok_or_else(|| {
        ApiError::not_found(format!(
            "Collection '{}' not found in database '{}'",
            collection, db_name
        ))
    })?;

    Ok(Json(json!({ "mermaidCode": mermaid_code })))
}

/// Extract required string parameters, reporting every missing one at once.
///
/// Blank strings count as missing.
fn required<'a, const N: usize>(
    params: [(&str, &'a Option<String>); N],
) -> Result<[&'a str; N], ApiError> {
    let missing: Vec<&str> = params
        .iter()
        .filter(|(_, value)| value.as_deref().is_none_or(|v| v.trim().is_empty()))
        .map(|(name, _)| *name)
        .collect();

    if !missing.is_empty() {
        warn!("[Schema] Missing parameters: {}", missing.join(", "));
        return Err(ApiError::bad_request(format!(
            "Missing required parameters: {}",
            missing.join(", ")
        )));
    }

    Ok(params.map(|(_, value)| value.as_deref().unwrap_or_default()))
}
