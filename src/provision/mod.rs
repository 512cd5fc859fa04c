//! Collection provisioning.
//!
//! Planning is pure ([`ProvisionPlan::for_attribute`]); [`execute`] carries a
//! plan out against a [`DocumentService`]:
//!
//! - `UseExisting`: read the database and collection, fail with
//!   [`Error::NotFound`] if either is missing. Never creates anything.
//! - `CreateIfAbsent`: create the database if absent, then the collection
//!   with the planned partition key paths and throughput. If the collection
//!   already existed with different partition key paths, fail with
//!   [`Error::Conflict`].

mod plan;

pub use plan::ProvisionPlan;

use tracing::{debug, info, instrument, warn};

use crate::error::{Error, ResourceKind};
use crate::service::{Collection, DocumentService};

#[instrument(skip_all, fields(database = plan.database(), creates = plan.creates()))]
pub async fn execute<S: DocumentService>(
    service: &S,
    plan: &ProvisionPlan,
) -> Result<Collection, Error> {
    debug!(%plan, "executing provision plan");
    match plan {
        ProvisionPlan::UseExisting {
            database,
            collection,
        } => {
            let db = service
                .read_database(database)
                .await?
                .ok_or_else(|| Error::NotFound {
                    kind: ResourceKind::Database,
                    id: database.clone(),
                })?;
            let found = service
                .read_collection(&db.uri, collection)
                .await?
                .ok_or_else(|| Error::NotFound {
                    kind: ResourceKind::Collection,
                    id: collection.clone(),
                })?;
            debug!(collection = %found.uri, "using existing collection");
            Ok(found)
        }
        ProvisionPlan::CreateIfAbsent {
            database,
            collection,
            throughput,
        } => {
            let db = service.create_database_if_absent(database).await?;
            let created = service
                .create_collection_if_absent(&db.uri, collection, *throughput)
                .await?;

            if created.partition_key.paths != collection.partition_key.paths {
                warn!(
                    collection = %created.uri,
                    "existing collection has a different partition key"
                );
                return Err(Error::Conflict {
                    collection: created.uri,
                    expected: collection.partition_key.paths.clone(),
                    actual: created.partition_key.paths,
                });
            }

            info!(collection = %created.uri, "collection ready");
            Ok(created)
        }
    }
}
