use toml::Value;

use super::source::{ConfigEntry, ConfigProvider};
use super::ConfigError;

/// In-memory key/value provider, for host-supplied settings and tests.
///
/// ```
/// use docbind::config::MemorySource;
///
/// let source = MemorySource::new()
///     .with("ConnectionStrings:DocumentDB", "AccountEndpoint=https://localhost:8081/");
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    values: Vec<(String, String)>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.push((key.into(), value.into()));
        self
    }
}

impl<K, V> FromIterator<(K, V)> for MemorySource
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl ConfigProvider for MemorySource {
    fn entries(&self) -> Result<Vec<ConfigEntry>, ConfigError> {
        self.values
            .iter()
            .map(|(key, value)| {
                let entry = ConfigEntry::at_key(key, Value::String(value.clone()));
                if entry.path.iter().any(String::is_empty) {
                    return Err(ConfigError::InvalidReferenceKey(key.clone()));
                }
                Ok(entry)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entries_keep_registration_order() {
        let source: MemorySource = [("A:B", "1"), ("a:b", "2")].into_iter().collect();
        let entries = source.entries().unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].value.as_str(), Some("2"));
    }

    #[test]
    fn test_rejects_empty_segments() {
        let source = MemorySource::new().with("ConnectionStrings::Main", "x");

        assert!(matches!(
            source.entries(),
            Err(ConfigError::InvalidReferenceKey(_))
        ));
    }
}
