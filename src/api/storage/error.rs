//! Error types for document store access and introspection.

use serde::Serialize;
use thiserror::Error;

/// Introspection errors.
///
/// Every failure in the sampling pipeline collapses into one of these; no
/// partial metadata is ever returned alongside them.
#[derive(Error, Debug, Clone, Serialize)]
#[serde(tag = "type", content = "details", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IntrospectionError {
    /// Cannot reach, parse or authenticate against the target database
    #[error("Connection error: {0}")]
    Connection(String),
    /// Listing or sampling failed after the connection was established
    #[error("Query failed on {collection}: {message}")]
    Query { collection: String, message: String },
    /// Operation exceeded its configured timeout
    #[error("{operation} timed out after {millis}ms")]
    Timeout { operation: String, millis: u64 },
    /// Caller supplied options that cannot be honoured
    #[error("Invalid options: {0}")]
    InvalidOptions(String),
}

impl IntrospectionError {
    pub fn query(collection: &str, err: impl std::fmt::Display) -> Self {
        IntrospectionError::Query {
            collection: collection.to_string(),
            message: err.to_string(),
        }
    }

    /// Whether the error was caused by the caller rather than the backend.
    pub fn is_client_error(&self) -> bool {
        matches!(self, IntrospectionError::InvalidOptions(_))
    }
}
