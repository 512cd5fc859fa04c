use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("required settings file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("failed to read settings file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse settings file '{path}': {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("failed to deserialize section '{section}': {source}")]
    DeserializeError {
        section: String,
        source: toml::de::Error,
    },

    #[error("circular reference detected in settings")]
    CircularReference,

    #[error("referenced key not found: {0}")]
    ReferenceNotFound(String),

    #[error("invalid reference key: {0}")]
    InvalidReferenceKey(String),

    #[error("cannot reference non-scalar value: {0}")]
    NonScalarReference(String),

    #[error("unclosed reference (missing '}}')")]
    UnclosedReference,

    #[error("no connection string configured; set '{key}' or supply one explicitly")]
    MissingConnectionString { key: String },

    #[error("invalid connection string for '{key}': {reason}")]
    InvalidConnectionString { key: String, reason: String },
}
