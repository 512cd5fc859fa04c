use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

/// Returns `dbs/<database>`.
pub fn database_uri(database: &str) -> String {
    format!("dbs/{database}")
}

/// Returns `dbs/<database>/colls/<collection>`.
pub fn collection_uri(database: &str, collection: &str) -> String {
    format!("dbs/{database}/colls/{collection}")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Database {
    pub id: String,
    pub uri: String,
}

impl Database {
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        let uri = database_uri(&id);
        Self { id, uri }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionKeyDefinition {
    pub paths: Vec<String>,
}

/// An existing collection as reported by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    pub id: String,
    pub uri: String,
    pub partition_key: PartitionKeyDefinition,
}

/// Body of a create-collection request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionRequest {
    pub id: String,
    pub partition_key: PartitionKeyDefinition,
}

impl CollectionRequest {
    pub fn new(id: impl Into<String>, partition_key_paths: Vec<String>) -> Self {
        Self {
            id: id.into(),
            partition_key: PartitionKeyDefinition {
                paths: partition_key_paths,
            },
        }
    }
}

/// Throughput sent alongside a create-collection request.
///
/// Only ever constructed with a non-zero value; "no throughput" is the
/// absence of this type, not a zero inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThroughputOptions {
    pub offer_throughput: NonZeroU32,
}

impl ThroughputOptions {
    pub fn new(offer_throughput: NonZeroU32) -> Self {
        Self { offer_throughput }
    }
}
