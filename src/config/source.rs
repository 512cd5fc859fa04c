//! Provider abstraction and the merge rules shared by every layer.

use toml::{Table, Value};

use super::ConfigError;

/// Separator between segments of a settings key (`ConnectionStrings:Main`).
pub const KEY_DELIMITER: char = ':';

/// A value contributed by a provider, rooted at `path`.
///
/// An empty path means the value is a whole table merged at the root.
#[derive(Debug, Clone)]
pub struct ConfigEntry {
    pub path: Vec<String>,
    pub value: Value,
}

impl ConfigEntry {
    pub fn root(table: Table) -> Self {
        Self {
            path: Vec::new(),
            value: Value::Table(table),
        }
    }

    pub fn at_path(path: Vec<String>, value: Value) -> Self {
        Self { path, value }
    }

    /// Builds an entry from a colon-separated key such as `ConnectionStrings:Main`.
    pub fn at_key(key: &str, value: Value) -> Self {
        Self::at_path(split_key(key), value)
    }
}

/// One layer of the settings pipeline.
pub trait ConfigProvider: Send + Sync + std::fmt::Debug {
    fn entries(&self) -> Result<Vec<ConfigEntry>, ConfigError>;
}

/// Splits a settings key into normalized (lowercased, trimmed) segments.
///
/// Empty segments are kept so callers can reject malformed keys.
pub fn split_key(key: &str) -> Vec<String> {
    key.split(KEY_DELIMITER)
        .map(|segment| segment.trim().to_lowercase())
        .collect()
}

pub fn merge_at_path(table: &mut Table, path: &[String], value: Value) {
    let Some((first, rest)) = path.split_first() else {
        if let Value::Table(overlay) = value {
            deep_merge(table, overlay);
        }
        return;
    };

    if rest.is_empty() {
        match (table.get_mut(first), value) {
            (Some(Value::Table(base)), Value::Table(overlay)) => {
                deep_merge(base, normalize_table(overlay));
            }
            (_, value) => {
                table.insert(first.clone(), normalize_value(value));
            }
        }
        return;
    }

    if !matches!(table.get(first), Some(Value::Table(_))) {
        table.insert(first.clone(), Value::Table(Table::new()));
    }

    if let Some(Value::Table(nested)) = table.get_mut(first) {
        merge_at_path(nested, rest, value);
    }
}

/// Merges `overlay` into `base`. Tables merge recursively, everything else
/// (including arrays) is replaced. Keys are lowercased on the way in so
/// lookups are case-insensitive.
fn deep_merge(base: &mut Table, overlay: Table) {
    for (key, value) in overlay {
        let key = key.to_lowercase();
        match (base.get_mut(&key), value) {
            (Some(Value::Table(base_table)), Value::Table(overlay_table)) => {
                deep_merge(base_table, overlay_table);
            }
            (_, value) => {
                base.insert(key, normalize_value(value));
            }
        }
    }
}

fn normalize_table(table: Table) -> Table {
    table
        .into_iter()
        .map(|(key, value)| (key.to_lowercase(), normalize_value(value)))
        .collect()
}

fn normalize_value(value: Value) -> Value {
    match value {
        Value::Table(table) => Value::Table(normalize_table(table)),
        Value::Array(items) => Value::Array(items.into_iter().map(normalize_value).collect()),
        other => other,
    }
}
