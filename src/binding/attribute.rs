use std::num::NonZeroU32;

use serde::{Deserialize, Deserializer, Serialize};

use crate::Error;

/// Declarative description of the database, collection and provisioning
/// settings a binding targets.
///
/// Built once per binding declaration and never mutated afterwards; the
/// `with_*` methods consume and return the value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BindingAttribute {
    database_name: String,
    collection_name: String,
    #[serde(default)]
    create_if_not_exists: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    partition_key_path: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_throughput",
        skip_serializing_if = "Option::is_none"
    )]
    collection_throughput: Option<NonZeroU32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    connection: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sql_query: Option<String>,
}

impl BindingAttribute {
    pub fn new(database_name: impl Into<String>, collection_name: impl Into<String>) -> Self {
        Self {
            database_name: database_name.into(),
            collection_name: collection_name.into(),
            create_if_not_exists: false,
            partition_key_path: None,
            collection_throughput: None,
            connection: None,
            id: None,
            sql_query: None,
        }
    }

    #[must_use]
    pub fn with_create_if_not_exists(mut self, create: bool) -> Self {
        self.create_if_not_exists = create;
        self
    }

    #[must_use]
    pub fn with_partition_key_path(mut self, path: impl Into<String>) -> Self {
        self.partition_key_path = Some(path.into());
        self
    }

    /// Requests `throughput` when the collection is created. Zero means
    /// "no throughput requested" and leaves the value unset.
    #[must_use]
    pub fn with_collection_throughput(mut self, throughput: u32) -> Self {
        self.collection_throughput = NonZeroU32::new(throughput);
        self
    }

    /// Names the connection string setting (`ConnectionStrings:<name>`) to use
    /// instead of the host default.
    #[must_use]
    pub fn with_connection(mut self, name: impl Into<String>) -> Self {
        self.connection = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn with_sql_query(mut self, query: impl Into<String>) -> Self {
        self.sql_query = Some(query.into());
        self
    }

    pub fn database_name(&self) -> &str {
        &self.database_name
    }

    pub fn collection_name(&self) -> &str {
        &self.collection_name
    }

    pub fn create_if_not_exists(&self) -> bool {
        self.create_if_not_exists
    }

    pub fn partition_key_path(&self) -> Option<&str> {
        self.partition_key_path.as_deref()
    }

    /// Partition key paths in the form collection definitions use: one entry
    /// when a path is set, none otherwise.
    pub fn partition_key_paths(&self) -> Vec<String> {
        self.partition_key_path.iter().cloned().collect()
    }

    pub fn collection_throughput(&self) -> Option<NonZeroU32> {
        self.collection_throughput
    }

    pub fn connection(&self) -> Option<&str> {
        self.connection.as_deref()
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn sql_query(&self) -> Option<&str> {
        self.sql_query.as_deref()
    }

    /// Structural checks only; nothing here talks to the service.
    pub fn validate(&self) -> Result<(), Error> {
        if self.database_name.trim().is_empty() {
            return Err(Error::InvalidAttribute("database name is empty".into()));
        }
        if self.collection_name.trim().is_empty() {
            return Err(Error::InvalidAttribute("collection name is empty".into()));
        }
        if let Some(path) = &self.partition_key_path {
            if !path.starts_with('/') || path.len() < 2 {
                return Err(Error::InvalidAttribute(format!(
                    "partition key path '{path}' must start with '/' and name a field"
                )));
            }
        }
        if matches!(&self.connection, Some(name) if name.trim().is_empty()) {
            return Err(Error::InvalidAttribute("connection name is empty".into()));
        }
        if self.id.is_some() && self.sql_query.is_some() {
            return Err(Error::InvalidAttribute(
                "id and sql query cannot both be set".into(),
            ));
        }
        Ok(())
    }
}

fn deserialize_throughput<'de, D>(deserializer: D) -> Result<Option<NonZeroU32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<u32>::deserialize(deserializer)?.and_then(NonZeroU32::new))
}
