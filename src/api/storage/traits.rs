//! Document store trait definitions.
//!
//! The introspection pipeline only needs two queries from a store: list the
//! collections and draw a sample from one of them. Connections are opened per
//! request through a [`StoreConnector`] and released with [`DocumentStore::close`].

use super::IntrospectionError;
use mongodb::bson::Document;
use std::time::Duration;

/// Connection settings passed to a connector.
#[derive(Clone, Debug)]
pub struct ConnectOptions {
    /// Applied to server selection, connect and each sampling query
    pub query_timeout: Duration,
    /// Upper bound for the whole connect call, including the liveness check.
    /// Connectors enforce it themselves so a half-open client is shut down
    /// rather than dropped.
    pub connect_timeout: Duration,
}

impl Default for ConnectOptions {
    fn default() -> Self {
        Self {
            query_timeout: Duration::from_secs(10),
            connect_timeout: Duration::from_secs(60),
        }
    }
}

/// An open connection to one database.
#[async_trait::async_trait]
pub trait DocumentStore: Send + Sync {
    /// List user collection names (system collections excluded)
    async fn list_collections(&self) -> Result<Vec<String>, IntrospectionError>;

    /// Draw up to `size` documents from a collection
    async fn sample(
        &self,
        collection: &str,
        size: u32,
    ) -> Result<Vec<Document>, IntrospectionError>;

    /// Release the connection
    async fn close(self: Box<Self>);
}

/// Opens [`DocumentStore`] connections from caller-supplied parameters.
#[async_trait::async_trait]
pub trait StoreConnector: Send + Sync {
    async fn connect(
        &self,
        uri: &str,
        db_name: &str,
        options: &ConnectOptions,
    ) -> Result<Box<dyn DocumentStore>, IntrospectionError>;
}
