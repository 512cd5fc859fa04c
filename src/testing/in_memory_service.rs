use std::{
    collections::HashMap,
    future::Future,
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc, RwLock,
    },
};

use crate::{
    options::ConnectionString,
    service::{
        collection_uri, Collection, CollectionRequest, Database, DocumentService,
        PartitionKeyDefinition, ServiceError, ServiceFactory, ServiceResult, ThroughputOptions,
    },
};

/// A call received by [`InMemoryDocumentService`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceCall {
    ReadDatabase {
        id: String,
    },
    ReadCollection {
        database_uri: String,
        id: String,
    },
    CreateDatabase {
        id: String,
    },
    CreateCollection {
        database_uri: String,
        request: CollectionRequest,
        throughput: Option<ThroughputOptions>,
    },
}

impl ServiceCall {
    pub fn is_create(&self) -> bool {
        matches!(
            self,
            ServiceCall::CreateDatabase { .. } | ServiceCall::CreateCollection { .. }
        )
    }
}

#[derive(Debug, Default)]
struct State {
    databases: HashMap<String, Database>,
    // keyed by collection uri
    collections: HashMap<String, Collection>,
    calls: Vec<ServiceCall>,
}

/// In-memory document service for testing
#[derive(Clone, Debug, Default)]
pub struct InMemoryDocumentService {
    state: Arc<RwLock<State>>,
    should_fail: Arc<AtomicBool>,
}

impl InMemoryDocumentService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an existing database
    pub fn add_database(&self, id: &str) {
        let database = Database::new(id);
        self.state
            .write()
            .expect("service state lock poisoned")
            .databases
            .insert(database.uri.clone(), database);
    }

    /// Seed an existing collection (and its database)
    pub fn add_collection(&self, database: &str, id: &str, partition_key_paths: &[&str]) {
        self.add_database(database);
        let collection = Collection {
            id: id.to_string(),
            uri: collection_uri(database, id),
            partition_key: PartitionKeyDefinition {
                paths: partition_key_paths.iter().map(|p| p.to_string()).collect(),
            },
        };
        self.state
            .write()
            .expect("service state lock poisoned")
            .collections
            .insert(collection.uri.clone(), collection);
    }

    /// Set whether operations should fail
    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail.store(should_fail, Ordering::SeqCst);
    }

    /// Every call received so far, in order
    pub fn calls(&self) -> Vec<ServiceCall> {
        self.state
            .read()
            .expect("service state lock poisoned")
            .calls
            .clone()
    }

    pub fn create_calls(&self) -> Vec<ServiceCall> {
        self.calls().into_iter().filter(ServiceCall::is_create).collect()
    }

    pub fn collection(&self, database: &str, id: &str) -> Option<Collection> {
        self.state
            .read()
            .expect("service state lock poisoned")
            .collections
            .get(&collection_uri(database, id))
            .cloned()
    }

    fn record<T>(
        &self,
        call: ServiceCall,
        op: impl FnOnce(&mut State) -> ServiceResult<T>,
    ) -> ServiceResult<T> {
        let mut state = self
            .state
            .write()
            .map_err(|_| ServiceError::Unavailable("service state lock poisoned".into()))?;
        state.calls.push(call);
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(ServiceError::Unavailable("mock failure".into()));
        }
        op(&mut state)
    }
}

impl DocumentService for InMemoryDocumentService {
    fn read_database(&self, id: &str) -> impl Future<Output = ServiceResult<Option<Database>>> + Send {
        let uri = Database::new(id).uri;
        let result = self.record(ServiceCall::ReadDatabase { id: id.to_string() }, |state| {
            Ok(state.databases.get(&uri).cloned())
        });
        async move { result }
    }

    fn read_collection(
        &self,
        database_uri: &str,
        id: &str,
    ) -> impl Future<Output = ServiceResult<Option<Collection>>> + Send {
        let uri = format!("{database_uri}/colls/{id}");
        let call = ServiceCall::ReadCollection {
            database_uri: database_uri.to_string(),
            id: id.to_string(),
        };
        let result = self.record(call, |state| Ok(state.collections.get(&uri).cloned()));
        async move { result }
    }

    fn create_database_if_absent(
        &self,
        id: &str,
    ) -> impl Future<Output = ServiceResult<Database>> + Send {
        let result = self.record(ServiceCall::CreateDatabase { id: id.to_string() }, |state| {
            let database = Database::new(id);
            Ok(state
                .databases
                .entry(database.uri.clone())
                .or_insert(database)
                .clone())
        });
        async move { result }
    }

    fn create_collection_if_absent(
        &self,
        database_uri: &str,
        collection: &CollectionRequest,
        throughput: Option<ThroughputOptions>,
    ) -> impl Future<Output = ServiceResult<Collection>> + Send {
        let call = ServiceCall::CreateCollection {
            database_uri: database_uri.to_string(),
            request: collection.clone(),
            throughput,
        };
        let result = self.record(call, |state| {
            if !state.databases.contains_key(database_uri) {
                return Err(ServiceError::NotFound(database_uri.to_string()));
            }
            let uri = format!("{database_uri}/colls/{}", collection.id);
            let created = Collection {
                id: collection.id.clone(),
                uri: uri.clone(),
                partition_key: collection.partition_key.clone(),
            };
            Ok(state.collections.entry(uri).or_insert(created).clone())
        });
        async move { result }
    }
}

/// Factory handing out a fresh [`InMemoryDocumentService`] per connection.
#[derive(Debug, Default)]
pub struct InMemoryServiceFactory {
    created: AtomicUsize,
    should_fail: AtomicBool,
}

impl InMemoryServiceFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of services created so far
    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail.store(should_fail, Ordering::SeqCst);
    }
}

impl ServiceFactory for InMemoryServiceFactory {
    type Service = InMemoryDocumentService;

    fn create(&self, connection: &ConnectionString) -> ServiceResult<Self::Service> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(ServiceError::Unavailable(format!(
                "cannot reach {}",
                connection.endpoint()
            )));
        }
        self.created.fetch_add(1, Ordering::SeqCst);
        Ok(InMemoryDocumentService::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::database_uri;

    #[tokio::test]
    async fn test_create_database_is_idempotent() {
        let service = InMemoryDocumentService::new();

        let first = service.create_database_if_absent("ItemDB").await.unwrap();
        let second = service.create_database_if_absent("ItemDB").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(service.create_calls().len(), 2);
    }

    #[tokio::test]
    async fn test_existing_collection_returned_unchanged() {
        let service = InMemoryDocumentService::new();
        service.add_collection("ItemDB", "ItemCollection", &["/other"]);

        let request = CollectionRequest::new("ItemCollection", vec!["/pk".into()]);
        let collection = service
            .create_collection_if_absent(&database_uri("ItemDB"), &request, None)
            .await
            .unwrap();

        assert_eq!(collection.partition_key.paths, vec!["/other".to_string()]);
    }

    #[tokio::test]
    async fn test_create_collection_requires_database() {
        let service = InMemoryDocumentService::new();
        let request = CollectionRequest::new("ItemCollection", vec![]);

        let result = service
            .create_collection_if_absent(&database_uri("ItemDB"), &request, None)
            .await;

        assert_eq!(result, Err(ServiceError::NotFound("dbs/ItemDB".into())));
    }

    #[tokio::test]
    async fn test_failure_injection_still_records() {
        let service = InMemoryDocumentService::new();
        service.set_should_fail(true);

        assert!(service.read_database("ItemDB").await.is_err());
        assert_eq!(
            service.calls(),
            vec![ServiceCall::ReadDatabase {
                id: "ItemDB".into()
            }]
        );
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let service = InMemoryDocumentService::new();
        let clone = service.clone();
        service.add_database("ItemDB");

        assert!(clone.read_database("ItemDB").await.unwrap().is_some());
    }
}
