//! Health check route.

use axum::response::Json;
use serde_json::{json, Value};

/// GET /health - Liveness probe
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is running", body = Object)
    )
)]
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "schema-diagram-api",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
