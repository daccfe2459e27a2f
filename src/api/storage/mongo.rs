//! MongoDB document store backed by the official driver.

use super::traits::{ConnectOptions, DocumentStore, StoreConnector};
use super::IntrospectionError;
use futures_util::TryStreamExt;
use mongodb::bson::{doc, Document};
use mongodb::options::{AggregateOptions, ClientOptions};
use mongodb::{Client, Database};
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

const APP_NAME: &str = "schema-diagram-api";

/// Connector that opens a fresh driver client per request.
#[derive(Clone, Debug, Default)]
pub struct MongoConnector;

impl MongoConnector {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl StoreConnector for MongoConnector {
    async fn connect(
        &self,
        uri: &str,
        db_name: &str,
        options: &ConnectOptions,
    ) -> Result<Box<dyn DocumentStore>, IntrospectionError> {
        let timed_out = || IntrospectionError::Timeout {
            operation: "connect".to_string(),
            millis: options.connect_timeout.as_millis() as u64,
        };

        // Parsing may resolve SRV records; no client exists yet to release.
        let mut client_options =
            tokio::time::timeout(options.connect_timeout, ClientOptions::parse(uri))
                .await
                .map_err(|_| timed_out())?
                .map_err(|e| IntrospectionError::Connection(e.to_string()))?;

        client_options.app_name = Some(APP_NAME.to_string());
        client_options.server_selection_timeout = Some(options.query_timeout);
        client_options.connect_timeout = Some(options.query_timeout);

        let client = Client::with_options(client_options)
            .map_err(|e| IntrospectionError::Connection(e.to_string()))?;
        let database = client.database(db_name);

        // The driver connects lazily; ping so unreachable hosts and bad
        // credentials surface here instead of in the first sampling query.
        let ping = tokio::time::timeout(
            options.connect_timeout,
            database.run_command(doc! { "ping": 1 }, None),
        )
        .await;
        let failure = match ping {
            Ok(Ok(_)) => None,
            Ok(Err(e)) => Some(IntrospectionError::Connection(e.to_string())),
            Err(_) => Some(timed_out()),
        };
        if let Some(err) = failure {
            drop(database);
            client.shutdown().await;
            warn!("[Mongo] Connect to {} failed: {}", redact_uri(uri), err);
            return Err(err);
        }

        info!(
            "[Mongo] Connected to {} (database {})",
            redact_uri(uri),
            db_name
        );

        Ok(Box::new(MongoStore {
            client,
            database,
            query_timeout: options.query_timeout,
        }))
    }
}

/// One open driver client scoped to a single database.
pub struct MongoStore {
    client: Client,
    database: Database,
    query_timeout: Duration,
}

#[async_trait::async_trait]
impl DocumentStore for MongoStore {
    async fn list_collections(&self) -> Result<Vec<String>, IntrospectionError> {
        let mut names: Vec<String> = self
            .database
            .list_collection_names(None)
            .await
            .map_err(|e| IntrospectionError::query(self.database.name(), e))?
            .into_iter()
            .filter(|name| !name.starts_with("system."))
            .collect();
        names.sort();
        Ok(names)
    }

    async fn sample(
        &self,
        collection: &str,
        size: u32,
    ) -> Result<Vec<Document>, IntrospectionError> {
        // $sample picks documents pseudo-randomly; repeated calls may differ.
        let pipeline = vec![doc! { "$sample": { "size": i64::from(size) } }];
        let options = AggregateOptions::builder()
            .max_time(self.query_timeout)
            .build();

        let cursor = self
            .database
            .collection::<Document>(collection)
            .aggregate(pipeline, options)
            .await
            .map_err(|e| IntrospectionError::query(collection, e))?;

        let documents: Vec<Document> = cursor
            .try_collect()
            .await
            .map_err(|e| IntrospectionError::query(collection, e))?;

        debug!(
            "[Mongo] Sampled {} documents from {}",
            documents.len(),
            collection
        );
        Ok(documents)
    }

    async fn close(self: Box<Self>) {
        let MongoStore {
            client, database, ..
        } = *self;
        let name = database.name().to_string();
        drop(database);
        client.shutdown().await;
        debug!("[Mongo] Closed connection for database {}", name);
    }
}

/// Mask the password component of a connection string for logging.
pub fn redact_uri(uri: &str) -> String {
    match Url::parse(uri) {
        Ok(mut url) => {
            if url.password().is_some() {
                let _ = url.set_password(Some("****"));
            }
            url.to_string()
        }
        Err(_) => "<unparseable uri>".to_string(),
    }
}
