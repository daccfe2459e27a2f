//! In-memory document store.
//!
//! Serves fixed documents keyed by connection URI and database name. Sampling
//! is deterministic (first N documents), unlike `$sample` on a live server.

use super::traits::{ConnectOptions, DocumentStore, StoreConnector};
use super::IntrospectionError;
use indexmap::IndexMap;
use mongodb::bson::Document;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone, Debug, Default)]
struct MemoryDatabase {
    collections: IndexMap<String, Vec<Document>>,
    failing: HashSet<String>,
}

/// Connector over fixture databases.
#[derive(Clone, Debug, Default)]
pub struct InMemoryConnector {
    servers: HashMap<String, HashMap<String, MemoryDatabase>>,
    latency: Option<Duration>,
    opened: Arc<AtomicUsize>,
    closed: Arc<AtomicUsize>,
}

impl InMemoryConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a collection and its documents under `uri`/`db_name`.
    pub fn with_collection(
        mut self,
        uri: &str,
        db_name: &str,
        collection: &str,
        documents: Vec<Document>,
    ) -> Self {
        self.database_mut(uri, db_name)
            .collections
            .insert(collection.to_string(), documents);
        self
    }

    /// Register a collection whose sampling query always fails.
    pub fn with_failing_collection(mut self, uri: &str, db_name: &str, collection: &str) -> Self {
        let database = self.database_mut(uri, db_name);
        database
            .collections
            .insert(collection.to_string(), Vec::new());
        database.failing.insert(collection.to_string());
        self
    }

    /// Delay every sampling query by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn opened_connections(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    pub fn closed_connections(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }

    fn database_mut(&mut self, uri: &str, db_name: &str) -> &mut MemoryDatabase {
        self.servers
            .entry(uri.to_string())
            .or_default()
            .entry(db_name.to_string())
            .or_default()
    }
}

#[async_trait::async_trait]
impl StoreConnector for InMemoryConnector {
    async fn connect(
        &self,
        uri: &str,
        db_name: &str,
        _options: &ConnectOptions,
    ) -> Result<Box<dyn DocumentStore>, IntrospectionError> {
        let server = self
            .servers
            .get(uri)
            .ok_or_else(|| IntrospectionError::Connection(format!("No server at {}", uri)))?;

        // Like MongoDB, an unknown database on a reachable server is just empty.
        let database = server.get(db_name).cloned().unwrap_or_default();
        self.opened.fetch_add(1, Ordering::SeqCst);

        Ok(Box::new(MemoryStore {
            database,
            latency: self.latency,
            closed: self.closed.clone(),
        }))
    }
}

struct MemoryStore {
    database: MemoryDatabase,
    latency: Option<Duration>,
    closed: Arc<AtomicUsize>,
}

#[async_trait::async_trait]
impl DocumentStore for MemoryStore {
    async fn list_collections(&self) -> Result<Vec<String>, IntrospectionError> {
        let mut names: Vec<String> = self.database.collections.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    async fn sample(
        &self,
        collection: &str,
        size: u32,
    ) -> Result<Vec<Document>, IntrospectionError> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if self.database.failing.contains(collection) {
            return Err(IntrospectionError::query(collection, "sampling failed"));
        }

        let documents = self
            .database
            .collections
            .get(collection)
            .ok_or_else(|| IntrospectionError::query(collection, "collection not found"))?;
        Ok(documents.iter().take(size as usize).cloned().collect())
    }

    async fn close(self: Box<Self>) {
        self.closed.fetch_add(1, Ordering::SeqCst);
    }
}
