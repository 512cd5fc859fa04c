use toml::Value;

use super::source::{ConfigEntry, ConfigProvider};
use super::ConfigError;

/// Reads `PREFIX<sep>Section<sep>Key` environment variables as `Section:Key`.
///
/// Values are kept verbatim as strings, the same as [`MemorySource`]
/// entries, so `0123` stays `0123`. Typed non-string settings belong in a
/// TOML file.
///
/// [`MemorySource`]: super::MemorySource
#[derive(Debug, Clone)]
pub struct EnvSource {
    prefix: String,
    separator: String,
}

impl EnvSource {
    pub fn new(prefix: impl Into<String>, separator: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            separator: separator.into(),
        }
    }

    fn collect<I>(&self, vars: I) -> Vec<ConfigEntry>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        if self.separator.is_empty() {
            return Vec::new();
        }

        let prefix_with_sep = format!("{}{}", self.prefix, self.separator);
        vars.into_iter()
            .filter_map(|(key, value)| {
                let path_str = key.strip_prefix(&prefix_with_sep)?;
                if path_str.is_empty() {
                    return None;
                }
                let path = path_str
                    .split(self.separator.as_str())
                    .map(str::to_lowercase)
                    .collect();
                Some(ConfigEntry::at_path(path, Value::String(value)))
            })
            .collect()
    }
}

impl ConfigProvider for EnvSource {
    fn entries(&self) -> Result<Vec<ConfigEntry>, ConfigError> {
        Ok(self.collect(std::env::vars()))
    }
}
