//! Connection options and their resolution.
//!
//! A connection string can come from two tiers: an explicit override supplied
//! by the consumer, or a default registered under `ConnectionStrings:<name>`.
//! The override always wins. When neither tier has a value the result is an
//! unset [`ConnectionConfig`], which only fails once something tries to use it.

mod connection;

pub use connection::{ConnectionConfig, ConnectionOrigin, ConnectionString};

use serde::Deserialize;

use crate::config::{connection_string_key, ConfigError, ConfigurationSource, Settings};

/// Connection name used when nothing else is configured.
pub const DEFAULT_CONNECTION_NAME: &str = "DocumentDB";

/// Settings section [`DocumentDbOptions`] is read from.
pub const OPTIONS_SECTION: &str = "DocumentDB";

/// Key an explicit [`DocumentDbOptions::connection_string`] is reported under.
pub const CONNECTION_STRING_OPTION_KEY: &str = "DocumentDB:connection_string";

/// Host-level options for the document binding extension.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DocumentDbOptions {
    /// Explicit connection string; takes precedence over any setting.
    pub connection_string: Option<String>,
    /// Name looked up under `ConnectionStrings:` for the default.
    pub connection_name: String,
}

impl Default for DocumentDbOptions {
    fn default() -> Self {
        Self {
            connection_string: None,
            connection_name: DEFAULT_CONNECTION_NAME.to_string(),
        }
    }
}

impl DocumentDbOptions {
    /// Reads the `DocumentDB` section, falling back to defaults when absent.
    pub fn from_settings(settings: &Settings) -> Result<Self, ConfigError> {
        Ok(settings.section(OPTIONS_SECTION)?.unwrap_or_default())
    }

    #[must_use]
    pub fn with_connection_string(mut self, connection_string: impl Into<String>) -> Self {
        self.connection_string = Some(connection_string.into());
        self
    }

    #[must_use]
    pub fn with_connection_name(mut self, name: impl Into<String>) -> Self {
        self.connection_name = name.into();
        self
    }

    pub fn resolver(&self) -> OptionsResolver {
        OptionsResolver::new(&self.connection_name).with_override_key(CONNECTION_STRING_OPTION_KEY)
    }
}

/// Resolves connection strings for one connection name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionsResolver {
    setting_key: String,
    override_key: Option<String>,
}

impl Default for OptionsResolver {
    fn default() -> Self {
        Self::new(DEFAULT_CONNECTION_NAME)
    }
}

impl OptionsResolver {
    pub fn new(connection_name: &str) -> Self {
        Self {
            setting_key: connection_string_key(connection_name),
            override_key: None,
        }
    }

    /// Names the setting overrides come from, so a malformed override is
    /// reported under it rather than under the default's key.
    #[must_use]
    pub fn with_override_key(mut self, key: impl Into<String>) -> Self {
        self.override_key = Some(key.into());
        self
    }

    pub fn setting_key(&self) -> &str {
        &self.setting_key
    }

    /// Picks the override if present, else the default, else nothing.
    ///
    /// Empty and whitespace-only strings count as absent.
    pub fn resolve(
        &self,
        default_connection_string: Option<&str>,
        override_connection_string: Option<&str>,
    ) -> ConnectionConfig {
        let resolved = present(override_connection_string)
            .map(|value| (value.to_string(), ConnectionOrigin::Override))
            .or_else(|| {
                present(default_connection_string)
                    .map(|value| (value.to_string(), ConnectionOrigin::Default))
            });

        let config = ConnectionConfig::new(self.setting_key.clone(), resolved)
            .with_override_key(self.override_key.clone());

        match config.origin() {
            Some(origin) => {
                tracing::debug!(key = config.source_key(), %origin, "connection string resolved")
            }
            None => tracing::debug!(key = %self.setting_key, "no connection string configured"),
        }

        config
    }

    /// Like [`resolve`](Self::resolve), reading the default from `source`.
    pub fn resolve_from(
        &self,
        source: &(impl ConfigurationSource + ?Sized),
        override_connection_string: Option<&str>,
    ) -> ConnectionConfig {
        let default = source.get(&self.setting_key);
        self.resolve(default.as_deref(), override_connection_string)
    }
}

/// Resolves with the default connection name.
pub fn resolve(
    default_connection_string: Option<&str>,
    override_connection_string: Option<&str>,
) -> ConnectionConfig {
    OptionsResolver::default().resolve(default_connection_string, override_connection_string)
}

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
