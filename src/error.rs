use std::fmt;

use crate::binding::ParameterShape;
use crate::config::ConfigError;
use crate::service::ServiceError;
use thiserror::Error;

/// Kind of resource a [`Error::NotFound`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Database,
    Collection,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::Database => f.write_str("database"),
            ResourceKind::Collection => f.write_str("collection"),
        }
    }
}

/// Top-level error type for the docbind library.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("document service error: {0}")]
    Service(#[from] ServiceError),

    #[error("{kind} '{id}' does not exist and createIfNotExists is false")]
    NotFound { kind: ResourceKind, id: String },

    #[error(
        "collection '{collection}' exists with partition key {actual:?}, expected {expected:?}"
    )]
    Conflict {
        collection: String,
        expected: Vec<String>,
        actual: Vec<String>,
    },

    #[error("binding context requires an attribute")]
    MissingAttribute,

    #[error("invalid binding attribute: {0}")]
    InvalidAttribute(String),

    #[error("parameter '{parameter}' has unsupported shape: {shape}")]
    UnsupportedShape {
        parameter: String,
        shape: ParameterShape,
    },
}
