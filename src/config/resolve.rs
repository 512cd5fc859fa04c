//! Expansion of `${Section:Key}` references between settings values.
//!
//! `$$` produces a literal `$`.

use toml::{Table, Value};

use super::source::split_key;
use super::ConfigError;

/// Expands every reference in `table` until a fixed point is reached.
pub fn resolve_references(table: &mut Table) -> Result<(), ConfigError> {
    const MAX_ITERATIONS: usize = 100;

    for _ in 0..MAX_ITERATIONS {
        let snapshot = table.clone();
        if resolve_table(table, &snapshot)? == 0 {
            return Ok(());
        }
    }

    Err(ConfigError::CircularReference)
}

fn resolve_table(table: &mut Table, root: &Table) -> Result<usize, ConfigError> {
    let mut count = 0;
    for (_key, value) in table.iter_mut() {
        count += resolve_value(value, root)?;
    }
    Ok(count)
}

fn resolve_value(value: &mut Value, root: &Table) -> Result<usize, ConfigError> {
    match value {
        Value::String(s) => resolve_string(s, root),
        Value::Table(t) => resolve_table(t, root),
        Value::Array(items) => {
            let mut count = 0;
            for item in items.iter_mut() {
                count += resolve_value(item, root)?;
            }
            Ok(count)
        }
        _ => Ok(0),
    }
}

fn resolve_string(s: &mut String, root: &Table) -> Result<usize, ConfigError> {
    if !s.contains('$') {
        return Ok(0);
    }

    let mut result = String::with_capacity(s.len());
    let mut substitutions = 0;
    let mut rest = s.as_str();

    while let Some(pos) = rest.find('$') {
        result.push_str(&rest[..pos]);
        let tail = &rest[pos + 1..];
        if let Some(after) = tail.strip_prefix('$') {
            // Keep the escape intact until the final pass so a later pass
            // doesn't treat the produced `${` as a reference.
            result.push_str("$$");
            rest = after;
        } else if let Some(body) = tail.strip_prefix('{') {
            let end = body.find('}').ok_or(ConfigError::UnclosedReference)?;
            let key = &body[..end];
            result.push_str(&lookup(root, key)?);
            substitutions += 1;
            rest = &body[end + 1..];
        } else {
            result.push('$');
            rest = tail;
        }
    }
    result.push_str(rest);

    *s = result;
    Ok(substitutions)
}

/// Collapses `$$` escapes once every reference has been expanded.
pub fn unescape(table: &mut Table) {
    for (_key, value) in table.iter_mut() {
        unescape_value(value);
    }
}

fn unescape_value(value: &mut Value) {
    match value {
        Value::String(s) if s.contains("$$") => *s = s.replace("$$", "$"),
        Value::Table(t) => unescape(t),
        Value::Array(items) => items.iter_mut().for_each(unescape_value),
        _ => {}
    }
}

/// Looks up a colon-separated key and renders the scalar found there.
pub fn lookup(root: &Table, key: &str) -> Result<String, ConfigError> {
    let path = split_key(key);
    if path.iter().any(String::is_empty) {
        return Err(ConfigError::InvalidReferenceKey(key.to_string()));
    }

    let value = find(root, &path).ok_or_else(|| ConfigError::ReferenceNotFound(key.to_string()))?;
    scalar_to_string(value).ok_or_else(|| ConfigError::NonScalarReference(key.to_string()))
}

pub(crate) fn find<'a>(root: &'a Table, path: &[String]) -> Option<&'a Value> {
    let (first, rest) = path.split_first()?;
    rest.iter()
        .try_fold(root.get(first)?, |current, segment| current.as_table()?.get(segment))
}

pub(crate) fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Integer(i) => Some(i.to_string()),
        Value::Float(f) => Some(f.to_string()),
        Value::Boolean(b) => Some(b.to_string()),
        Value::Datetime(dt) => Some(dt.to_string()),
        Value::Array(_) | Value::Table(_) => None,
    }
}
