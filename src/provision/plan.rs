//! Pure planning of what provisioning should ask the service for.

use std::fmt;

use crate::binding::BindingAttribute;
use crate::service::{collection_uri, CollectionRequest, ThroughputOptions};

/// What provisioning will do for a binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProvisionPlan {
    /// Database and collection must already exist; nothing is created.
    UseExisting {
        database: String,
        collection: String,
    },
    /// Create the database and collection when absent.
    CreateIfAbsent {
        database: String,
        collection: CollectionRequest,
        throughput: Option<ThroughputOptions>,
    },
}

impl ProvisionPlan {
    pub fn for_attribute(attribute: &BindingAttribute) -> Self {
        let database = attribute.database_name().to_string();
        if !attribute.create_if_not_exists() {
            return ProvisionPlan::UseExisting {
                database,
                collection: attribute.collection_name().to_string(),
            };
        }

        ProvisionPlan::CreateIfAbsent {
            database,
            collection: CollectionRequest::new(
                attribute.collection_name(),
                attribute.partition_key_paths(),
            ),
            throughput: attribute.collection_throughput().map(ThroughputOptions::new),
        }
    }

    pub fn database(&self) -> &str {
        match self {
            ProvisionPlan::UseExisting { database, .. }
            | ProvisionPlan::CreateIfAbsent { database, .. } => database,
        }
    }

    pub fn collection_uri(&self) -> String {
        match self {
            ProvisionPlan::UseExisting {
                database,
                collection,
            } => collection_uri(database, collection),
            ProvisionPlan::CreateIfAbsent {
                database,
                collection,
                ..
            } => collection_uri(database, &collection.id),
        }
    }

    pub fn creates(&self) -> bool {
        matches!(self, ProvisionPlan::CreateIfAbsent { .. })
    }
}

impl fmt::Display for ProvisionPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProvisionPlan::UseExisting { .. } => {
                write!(f, "= use existing {}", self.collection_uri())
            }
            ProvisionPlan::CreateIfAbsent {
                collection,
                throughput,
                ..
            } => {
                write!(
                    f,
                    "+ ensure {} (partition key {:?}",
                    self.collection_uri(),
                    collection.partition_key.paths
                )?;
                match throughput {
                    Some(t) => write!(f, ", throughput {})", t.offer_throughput),
                    None => f.write_str(")"),
                }
            }
        }
    }
}
