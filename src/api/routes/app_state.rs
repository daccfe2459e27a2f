//! Application state management.
//!
//! Defines the AppState struct shared by all route handlers. There is no
//! mutable state: every request opens and closes its own connections.

use crate::config::AppConfig;
use crate::services::{ComparisonService, IntrospectionOptions, IntrospectionService};
use crate::storage::{MongoConnector, StoreConnector};
use std::sync::Arc;

/// Application state shared across all route handlers.
#[derive(Clone)]
pub struct AppState {
    /// Single-database introspection
    pub introspection: IntrospectionService,
    /// Two-database comparison
    pub comparison: ComparisonService,
    /// Options applied when a request does not override them
    pub defaults: IntrospectionOptions,
}

impl AppState {
    /// Create application state over the given connector.
    pub fn new(connector: Arc<dyn StoreConnector>, defaults: IntrospectionOptions) -> Self {
        let introspection = IntrospectionService::new(connector);
        Self {
            comparison: ComparisonService::new(introspection.clone()),
            introspection,
            defaults,
        }
    }

    /// Create application state backed by MongoDB.
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            Arc::new(MongoConnector::new()),
            config.introspection.clone(),
        )
    }
}
