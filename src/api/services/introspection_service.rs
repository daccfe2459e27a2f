//! Database introspection service.
//!
//! Connects to a database, samples every collection, and resolves
//! relationship candidates against the collection names found.

use super::collection_analyzer::{CollectionAnalyzer, DEFAULT_SAMPLE_SIZE};
use super::field_analyzer::{FieldAnalyzer, DEFAULT_MAX_DEPTH};
use super::name_resolver::{ChainedNameResolver, MappingNameResolver, NameResolver, SuffixNameResolver};
use crate::models::{CollectionSchema, DatabaseMetadata, MergeStrategy};
use crate::storage::{redact_uri, ConnectOptions, DocumentStore, IntrospectionError, StoreConnector};
use futures_util::stream::{self, StreamExt, TryStreamExt};
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Tunables for a single introspection run.
#[derive(Debug, Clone, PartialEq)]
pub struct IntrospectionOptions {
    pub sample_size: u32,
    pub merge_strategy: MergeStrategy,
    /// Let the default resolver accept plural collection names.
    pub pluralize: bool,
    /// Explicit field -> collection mapping, consulted before heuristics.
    pub references: HashMap<String, String>,
    /// Maximum number of collections sampled at once.
    pub concurrency: usize,
    pub query_timeout: Duration,
    pub operation_timeout: Duration,
    pub max_depth: usize,
}

impl Default for IntrospectionOptions {
    fn default() -> Self {
        Self {
            sample_size: DEFAULT_SAMPLE_SIZE,
            merge_strategy: MergeStrategy::FirstSeen,
            pluralize: false,
            references: HashMap::new(),
            concurrency: 4,
            query_timeout: Duration::from_secs(10),
            operation_timeout: Duration::from_secs(60),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl IntrospectionOptions {
    pub fn validate(&self) -> Result<(), IntrospectionError> {
        if self.sample_size == 0 {
            return Err(IntrospectionError::InvalidOptions(
                "sampleSize must be at least 1".to_string(),
            ));
        }
        if self.concurrency == 0 {
            return Err(IntrospectionError::InvalidOptions(
                "concurrency must be at least 1".to_string(),
            ));
        }
        if self.query_timeout.is_zero() || self.operation_timeout.is_zero() {
            return Err(IntrospectionError::InvalidOptions(
                "timeouts must be greater than zero".to_string(),
            ));
        }
        if self.max_depth == 0 {
            return Err(IntrospectionError::InvalidOptions(
                "maxDepth must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Resolver implied by these options: explicit mapping first, then suffixes.
    pub fn name_resolver(&self) -> Arc<dyn NameResolver> {
        let suffix = if self.pluralize {
            SuffixNameResolver::with_plurals()
        } else {
            SuffixNameResolver::new()
        };

        if self.references.is_empty() {
            return Arc::new(suffix);
        }

        Arc::new(ChainedNameResolver::new(vec![
            Arc::new(MappingNameResolver::new(self.references.clone())),
            Arc::new(suffix),
        ]))
    }

    fn collection_analyzer(&self) -> CollectionAnalyzer {
        CollectionAnalyzer::new(FieldAnalyzer::new(self.max_depth), self.merge_strategy)
    }

    fn connect_options(&self) -> ConnectOptions {
        ConnectOptions {
            query_timeout: self.query_timeout,
            connect_timeout: self.operation_timeout,
        }
    }
}

/// Service that turns a connection target into [`DatabaseMetadata`].
#[derive(Clone)]
pub struct IntrospectionService {
    connector: Arc<dyn StoreConnector>,
    resolver: Option<Arc<dyn NameResolver>>,
}

impl IntrospectionService {
    pub fn new(connector: Arc<dyn StoreConnector>) -> Self {
        Self {
            connector,
            resolver: None,
        }
    }

    /// Use `resolver` instead of the one derived from request options.
    pub fn with_resolver(mut self, resolver: Arc<dyn NameResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Introspect `db_name` at `uri`.
    ///
    /// The connection is closed on every exit path. Connecting and sampling
    /// each run under `operation_timeout`; the connector enforces the connect
    /// limit so it can shut down a client it already created.
    pub async fn introspect_database(
        &self,
        uri: &str,
        db_name: &str,
        options: &IntrospectionOptions,
    ) -> Result<DatabaseMetadata, IntrospectionError> {
        options.validate()?;
        info!(
            "[Introspect] Introspecting {} on {} (sample size {})",
            db_name,
            redact_uri(uri),
            options.sample_size
        );

        let store = self
            .connector
            .connect(uri, db_name, &options.connect_options())
            .await?;

        let sampled = with_timeout(
            "introspection",
            options.operation_timeout,
            sample_collections(store.as_ref(), options),
        )
        .await;
        store.close().await;

        let mut collections = match sampled {
            Ok(collections) => collections,
            Err(e) => {
                warn!("[Introspect] Introspection of {} failed: {}", db_name, e);
                return Err(e);
            }
        };

        let resolver = self
            .resolver
            .clone()
            .unwrap_or_else(|| options.name_resolver());
        resolve_relationships(&mut collections, resolver.as_ref());

        let metadata = DatabaseMetadata::new(collections);
        info!(
            "[Introspect] Finished {}: {} collections, {} resolved relationships",
            db_name,
            metadata.collections.len(),
            metadata.resolved_edges().len()
        );
        Ok(metadata)
    }
}

async fn sample_collections(
    store: &dyn DocumentStore,
    options: &IntrospectionOptions,
) -> Result<Vec<CollectionSchema>, IntrospectionError> {
    let names = store.list_collections().await?;
    let analyzer = options.collection_analyzer();

    // `buffered` keeps results in listing order while sampling concurrently.
    stream::iter(names)
        .map(|name| async move {
            analyzer
                .analyze_collection(store, &name, options.sample_size)
                .await
        })
        .buffered(options.concurrency)
        .try_collect()
        .await
}

/// Fill in `to` for every candidate the resolver can match.
pub fn resolve_relationships(collections: &mut [CollectionSchema], resolver: &dyn NameResolver) {
    let names: Vec<String> = collections.iter().map(|c| c.name.clone()).collect();

    for candidate in collections
        .iter_mut()
        .flat_map(|c| c.relationships.iter_mut())
    {
        candidate.to = resolver.resolve(&candidate.field, &names);
    }
}

async fn with_timeout<T>(
    operation: &str,
    limit: Duration,
    future: impl Future<Output = Result<T, IntrospectionError>>,
) -> Result<T, IntrospectionError> {
    tokio::time::timeout(limit, future)
        .await
        .map_err(|_| IntrospectionError::Timeout {
            operation: operation.to_string(),
            millis: limit.as_millis() as u64,
        })?
}
