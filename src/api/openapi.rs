//! OpenAPI specification definition.
//!
//! Aggregates all route handlers and schemas for OpenAPI documentation generation.

use utoipa::{Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health::health_check,
        crate::routes::schema::handle_schema_request,
        crate::routes::openapi::serve_openapi_json,
    ),
    components(schemas(
        crate::routes::schema::SchemaRequest,
        crate::routes::schema::RequestOptions,
        crate::models::MergeStrategy,
    )),
    modifiers(&VersionAddon),
    tags(
        (name = "Health", description = "Service health"),
        (name = "Schema", description = "MongoDB schema introspection and Mermaid diagrams"),
        (name = "OpenAPI", description = "OpenAPI specification"),
    ),
    info(
        title = "Schema Diagram API",
        description = "Samples MongoDB collections, infers schemas and relationships, and renders Mermaid ER diagrams",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "http://localhost:8081/api/v1", description = "Local development server")
    )
)]
pub struct ApiDoc;

struct VersionAddon;

impl Modify for VersionAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        // Keep the documented version in step with Cargo.toml
        openapi.info.version = env!("CARGO_PKG_VERSION").to_string();
    }
}
