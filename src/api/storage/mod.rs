//! Storage module for the API.
//!
//! Provides document store connectors for MongoDB and in-memory fixtures.

pub mod error;
pub mod traits;

// Document store implementations
pub mod memory;
pub mod mongo;

pub use error::IntrospectionError;
pub use memory::InMemoryConnector;
pub use mongo::{redact_uri, MongoConnector};
pub use traits::{ConnectOptions, DocumentStore, StoreConnector};
