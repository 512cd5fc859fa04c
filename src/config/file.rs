//! TOML file settings provider.

use std::path::{Path, PathBuf};

use super::source::{ConfigEntry, ConfigProvider};
use super::ConfigError;

/// A settings provider that loads a TOML file.
///
/// Top-level tables map onto the first key segment, so
///
/// ```toml
/// [ConnectionStrings]
/// DocumentDB = "AccountEndpoint=https://localhost:8081/;AccountKey=..."
/// ```
///
/// is visible as `ConnectionStrings:DocumentDB`.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    required: bool,
}

impl FileSource {
    /// If `required` is true, loading fails when the file doesn't exist.
    pub fn new(path: impl AsRef<Path>, required: bool) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            required,
        }
    }
}

impl ConfigProvider for FileSource {
    fn entries(&self) -> Result<Vec<ConfigEntry>, ConfigError> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => {
                let table = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
                    path: self.path.clone(),
                    source: e,
                })?;
                Ok(vec![ConfigEntry::root(table)])
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                if self.required {
                    Err(ConfigError::FileNotFound(self.path.clone()))
                } else {
                    tracing::debug!(path = %self.path.display(), "optional settings file missing");
                    Ok(vec![])
                }
            }
            Err(e) => Err(ConfigError::ReadError {
                path: self.path.clone(),
                source: e,
            }),
        }
    }
}
