use std::fmt;

use crate::config::ConfigError;

/// Which configuration tier supplied a connection string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionOrigin {
    /// Supplied explicitly by the consumer; always wins.
    Override,
    /// Read from `ConnectionStrings:<name>`.
    Default,
}

impl fmt::Display for ConnectionOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionOrigin::Override => f.write_str("override"),
            ConnectionOrigin::Default => f.write_str("default"),
        }
    }
}

/// Outcome of connection resolution.
///
/// An unset config is a valid value; it only fails when [`require`](Self::require)
/// is called on first use.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    setting_key: String,
    override_key: Option<String>,
    resolved: Option<(String, ConnectionOrigin)>,
}

impl ConnectionConfig {
    pub(crate) fn new(setting_key: String, resolved: Option<(String, ConnectionOrigin)>) -> Self {
        Self {
            setting_key,
            override_key: None,
            resolved,
        }
    }

    /// Names where an override came from, for error reporting.
    pub(crate) fn with_override_key(mut self, key: Option<String>) -> Self {
        self.override_key = key;
        self
    }

    /// The settings key the default was looked up under.
    pub fn setting_key(&self) -> &str {
        &self.setting_key
    }

    /// The key that supplied the resolved value.
    ///
    /// This is the override's key when the override won and its key is
    /// known, and [`setting_key`](Self::setting_key) otherwise.
    pub fn source_key(&self) -> &str {
        match (self.origin(), &self.override_key) {
            (Some(ConnectionOrigin::Override), Some(key)) => key.as_str(),
            _ => self.setting_key.as_str(),
        }
    }

    pub fn is_set(&self) -> bool {
        self.resolved.is_some()
    }

    pub fn connection_string(&self) -> Option<&str> {
        self.resolved.as_ref().map(|(value, _)| value.as_str())
    }

    pub fn origin(&self) -> Option<ConnectionOrigin> {
        self.resolved.as_ref().map(|(_, origin)| *origin)
    }

    /// Parses the resolved connection string for use.
    ///
    /// Fails with [`ConfigError::MissingConnectionString`] when nothing was
    /// resolved, naming the settings key that would have supplied a default.
    /// A malformed value is reported under [`source_key`](Self::source_key).
    pub fn require(&self) -> Result<ConnectionString, ConfigError> {
        let (value, _) = self
            .resolved
            .as_ref()
            .ok_or_else(|| ConfigError::MissingConnectionString {
                key: self.setting_key.clone(),
            })?;
        ConnectionString::parse(value).map_err(|reason| ConfigError::InvalidConnectionString {
            key: self.source_key().to_string(),
            reason,
        })
    }
}

// Connection strings carry account keys.
impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("setting_key", &self.setting_key)
            .field("source_key", &self.source_key())
            .field("origin", &self.origin())
            .finish()
    }
}

/// A parsed `AccountEndpoint=...;AccountKey=...` connection string.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ConnectionString {
    raw: String,
    endpoint: String,
    account_key: Option<String>,
}

impl ConnectionString {
    const ENDPOINT: &'static str = "AccountEndpoint";
    const ACCOUNT_KEY: &'static str = "AccountKey";

    /// Parses `;`-separated `Key=Value` pairs. Key names are case-insensitive
    /// and unknown keys are ignored; `AccountEndpoint` is required.
    pub fn parse(raw: &str) -> Result<Self, String> {
        let mut endpoint = None;
        let mut account_key = None;

        let segments = raw.split(';').map(str::trim).filter(|s| !s.is_empty());
        for (index, segment) in segments.enumerate() {
            let (key, value) = segment
                .split_once('=')
                .ok_or_else(|| format!("segment {} has no '='", index + 1))?;
            let (key, value) = (key.trim(), value.trim());
            if key.eq_ignore_ascii_case(Self::ENDPOINT) {
                endpoint = Some(value.to_string());
            } else if key.eq_ignore_ascii_case(Self::ACCOUNT_KEY) {
                account_key = Some(value.to_string());
            }
        }

        let endpoint = endpoint
            .filter(|e| !e.is_empty())
            .ok_or_else(|| format!("missing {}", Self::ENDPOINT))?;

        Ok(Self {
            raw: raw.to_string(),
            endpoint,
            account_key: account_key.filter(|k| !k.is_empty()),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn account_key(&self) -> Option<&str> {
        self.account_key.as_deref()
    }
}

impl fmt::Debug for ConnectionString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionString")
            .field("endpoint", &self.endpoint)
            .field("account_key", &self.account_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
