// API module: models, services, storage connectors and HTTP routes
pub mod api;

// Re-export api modules at crate root (so routes can use crate::services, crate::models)
pub use api::config;
pub use api::middleware;
pub use api::models;
pub use api::routes;
pub use api::services;
pub use api::storage;

// Export module for diagram exporters
pub mod export;

// Graph utilities over resolved relationships
pub mod graph;
