//! The document service seam.
//!
//! Everything that talks to the database goes through [`DocumentService`], so
//! hosts plug in a real client and tests plug in an in-memory double.

mod cache;
mod types;

pub use cache::ServiceCache;
pub use types::{
    collection_uri, database_uri, Collection, CollectionRequest, Database,
    PartitionKeyDefinition, ThroughputOptions,
};

use std::future::Future;

use thiserror::Error;

use crate::options::ConnectionString;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ServiceError {
    #[error("resource not found: {0}")]
    NotFound(String),
    #[error("service unavailable: {0}")]
    Unavailable(String),
}

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;

/// Operations the binding layer needs from the document database.
///
/// Implementations must be safe to share between bindings.
pub trait DocumentService: Send + Sync {
    /// Returns the database, or `None` when it doesn't exist.
    fn read_database(&self, id: &str) -> impl Future<Output = ServiceResult<Option<Database>>> + Send;

    /// Returns the collection, or `None` when it (or its database) doesn't exist.
    fn read_collection(
        &self,
        database_uri: &str,
        id: &str,
    ) -> impl Future<Output = ServiceResult<Option<Collection>>> + Send;

    /// Creates the database unless it exists; returns it either way.
    fn create_database_if_absent(
        &self,
        id: &str,
    ) -> impl Future<Output = ServiceResult<Database>> + Send;

    /// Creates the collection unless it exists; returns it either way.
    ///
    /// An existing collection is returned as-is, even when its definition
    /// differs from `collection`.
    fn create_collection_if_absent(
        &self,
        database_uri: &str,
        collection: &CollectionRequest,
        throughput: Option<ThroughputOptions>,
    ) -> impl Future<Output = ServiceResult<Collection>> + Send;
}

/// Builds a service for a connection string.
pub trait ServiceFactory: Send + Sync {
    type Service: DocumentService;

    fn create(&self, connection: &ConnectionString) -> ServiceResult<Self::Service>;
}
