use std::path::Path;

use super::env::EnvSource;
use super::file::FileSource;
use super::resolve::{resolve_references, unescape};
use super::settings::Settings;
use super::source::{merge_at_path, ConfigProvider};
use super::ConfigError;

/// Builder for layering settings providers into a [`Settings`] store.
///
/// Providers are merged in registration order, with later providers
/// overriding earlier ones. Nested sections merge recursively; other values
/// (including arrays) are replaced entirely.
///
/// ## Variable References
///
/// String values can reference other settings using `${Section:Key}` syntax:
///
/// ```toml
/// [Account]
/// Endpoint = "https://localhost:8081/"
///
/// [ConnectionStrings]
/// DocumentDB = "AccountEndpoint=${Account:Endpoint};AccountKey=..."
/// ```
///
/// Use `$$` to escape a literal `$`.
///
/// ## Example
///
/// ```no_run
/// use docbind::config::{ConfigurationSource, MemorySource, Settings};
///
/// let settings = Settings::builder()
///     .with_file("settings/default.toml", true)
///     .with_env("DOCBIND", "__")
///     .with_source(MemorySource::new().with("DocumentDB:connection_name", "Primary"))
///     .build()?;
///
/// let conn = settings.connection_string("Primary");
/// # Ok::<(), docbind::ConfigError>(())
/// ```
#[derive(Debug, Default)]
#[must_use = "builders do nothing until .build() is called"]
pub struct SettingsBuilder {
    providers: Vec<Box<dyn ConfigProvider>>,
}

impl SettingsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a TOML file. Missing optional files are skipped.
    pub fn with_file(self, path: impl AsRef<Path>, required: bool) -> Self {
        self.with_source(FileSource::new(path, required))
    }

    /// Adds environment variables starting with `prefix` followed by `separator`.
    ///
    /// With prefix `DOCBIND` and separator `__`, the variable
    /// `DOCBIND__ConnectionStrings__DocumentDB` supplies
    /// `ConnectionStrings:DocumentDB`.
    pub fn with_env(self, prefix: impl Into<String>, separator: impl Into<String>) -> Self {
        self.with_source(EnvSource::new(prefix, separator))
    }

    /// Adds an arbitrary provider.
    pub fn with_source(mut self, provider: impl ConfigProvider + 'static) -> Self {
        self.providers.push(Box::new(provider));
        self
    }

    /// Loads every provider, merges them, and expands references.
    pub fn build(self) -> Result<Settings, ConfigError> {
        let mut merged = toml::Table::new();

        for provider in &self.providers {
            for entry in provider.entries()? {
                merge_at_path(&mut merged, &entry.path, entry.value);
            }
        }

        resolve_references(&mut merged)?;
        unescape(&mut merged);

        tracing::debug!(
            providers = self.providers.len(),
            sections = merged.len(),
            "settings loaded"
        );
        Ok(Settings::from_table(merged))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigurationSource, MemorySource};
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_later_providers_override_earlier() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[ConnectionStrings]").unwrap();
        writeln!(file, "DocumentDB = \"AccountEndpoint=from-file\"").unwrap();
        writeln!(file, "Other = \"AccountEndpoint=other\"").unwrap();

        let settings = SettingsBuilder::new()
            .with_file(file.path(), true)
            .with_source(
                MemorySource::new().with("connectionstrings:documentdb", "AccountEndpoint=memory"),
            )
            .build()
            .unwrap();

        assert_eq!(
            settings.get("ConnectionStrings:DocumentDB").as_deref(),
            Some("AccountEndpoint=memory")
        );
        assert_eq!(
            settings.get("ConnectionStrings:Other").as_deref(),
            Some("AccountEndpoint=other")
        );
    }

    #[test]
    fn test_references_span_providers() {
        let settings = SettingsBuilder::new()
            .with_source(MemorySource::new().with("Account:Endpoint", "https://a/"))
            .with_source(
                MemorySource::new().with("ConnectionStrings:Main", "AccountEndpoint=${Account:Endpoint}"),
            )
            .build()
            .unwrap();

        assert_eq!(
            settings.connection_string("Main").as_deref(),
            Some("AccountEndpoint=https://a/")
        );
    }

    #[test]
    fn test_missing_required_file_fails() {
        let result = SettingsBuilder::new()
            .with_file("/nonexistent/settings.toml", true)
            .build();

        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_empty_builder_yields_empty_settings() {
        let settings = SettingsBuilder::new().build().unwrap();

        assert_eq!(settings.get("ConnectionStrings:DocumentDB"), None);
    }
}
