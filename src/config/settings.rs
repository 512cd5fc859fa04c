use std::collections::HashMap;

use serde::de::DeserializeOwned;

use super::builder::SettingsBuilder;
use super::resolve::{find, scalar_to_string};
use super::source::split_key;
use super::ConfigError;

/// Section under which connection strings are registered.
pub const CONNECTION_STRINGS_SECTION: &str = "ConnectionStrings";

/// Returns the settings key for a named connection string.
pub fn connection_string_key(name: &str) -> String {
    format!("{CONNECTION_STRINGS_SECTION}:{name}")
}

/// Read-only key/value view over host configuration.
///
/// Keys are colon-separated paths; implementations compare them
/// case-insensitively.
pub trait ConfigurationSource: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    /// Looks up `ConnectionStrings:<name>`.
    fn connection_string(&self, name: &str) -> Option<String> {
        self.get(&connection_string_key(name))
    }
}

impl ConfigurationSource for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key)
            .or_else(|| {
                self.iter()
                    .find(|(k, _)| k.eq_ignore_ascii_case(key))
                    .map(|(_, v)| v)
            })
            .cloned()
    }
}

/// Merged settings produced by [`SettingsBuilder`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Settings {
    root: toml::Table,
}

impl Settings {
    pub fn builder() -> SettingsBuilder {
        SettingsBuilder::new()
    }

    pub(crate) fn from_table(root: toml::Table) -> Self {
        Self { root }
    }

    /// Deserializes the section at `key` into `T`.
    ///
    /// Returns `Ok(None)` when the section is absent. Field names are matched
    /// in lowercase, so `snake_case` fields line up with any spelling of the
    /// settings keys that differs only in case.
    pub fn section<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, ConfigError> {
        let Some(value) = find(&self.root, &split_key(key)) else {
            return Ok(None);
        };
        value
            .clone()
            .try_into()
            .map(Some)
            .map_err(|source| ConfigError::DeserializeError {
                section: key.to_string(),
                source,
            })
    }
}

impl ConfigurationSource for Settings {
    fn get(&self, key: &str) -> Option<String> {
        find(&self.root, &split_key(key)).and_then(scalar_to_string)
    }
}
