//! API routes module - organizes all route handlers.

pub mod app_state;
pub mod error;
pub mod health;
pub mod openapi;
pub mod schema;

use axum::{routing::get, Router};
use tower_http::catch_panic::CatchPanicLayer;

pub use app_state::AppState;
pub use error::ApiError;

/// Create the API router combining all route modules
///
/// State is applied by callers (see [`create_app`]).
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .merge(schema::schema_router())
        // OpenAPI documentation endpoints
        .merge(openapi::openapi_router())
}

/// Build the full application: root health check plus the API under /api/v1.
///
/// Panics inside handlers are turned into 500 responses.
pub fn create_app(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api/v1", create_api_router())
        .with_state(app_state)
        .layer(CatchPanicLayer::custom(panic_response))
}

fn panic_response(
    _panic: Box<dyn std::any::Any + Send + 'static>,
) -> axum::response::Response {
    use axum::response::IntoResponse;

    tracing::error!("[Schema] Handler panicked");
    ApiError::internal("Internal server error").into_response()
}
