use std::{
    collections::HashMap,
    fmt,
    sync::{Arc, RwLock},
};

use super::{ServiceError, ServiceFactory};
use crate::options::ConnectionString;

/// Shares one service per connection string across bindings.
pub struct ServiceCache<F: ServiceFactory> {
    factory: F,
    services: RwLock<HashMap<ConnectionString, Arc<F::Service>>>,
}

impl<F: ServiceFactory> ServiceCache<F> {
    pub fn new(factory: F) -> Self {
        Self {
            factory,
            services: RwLock::new(HashMap::new()),
        }
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    /// Returns the cached service for `connection`, creating it on first use.
    pub fn get_or_create(
        &self,
        connection: &ConnectionString,
    ) -> Result<Arc<F::Service>, ServiceError> {
        {
            let services = self
                .services
                .read()
                .map_err(|_| ServiceError::Unavailable("service cache lock poisoned".into()))?;
            if let Some(service) = services.get(connection) {
                return Ok(Arc::clone(service));
            }
        }

        let mut services = self
            .services
            .write()
            .map_err(|_| ServiceError::Unavailable("service cache lock poisoned".into()))?;
        // Another caller may have created it between the two locks.
        if let Some(service) = services.get(connection) {
            return Ok(Arc::clone(service));
        }

        tracing::debug!(endpoint = connection.endpoint(), "creating document service");
        let service = Arc::new(self.factory.create(connection)?);
        services.insert(connection.clone(), Arc::clone(&service));
        Ok(service)
    }

    pub fn len(&self) -> usize {
        self.services.read().map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<F: ServiceFactory> fmt::Debug for ServiceCache<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceCache")
            .field("services", &self.len())
            .finish_non_exhaustive()
    }
}
