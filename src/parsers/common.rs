//! Shared helpers used by every C5 dialect parser.

use serde_json::{Map, Value};

use crate::errors::{ManifestError, Result};

/// Require that `value` is a JSON object, under the given dialect name.
pub fn require_object<'a>(
    value: &'a Value,
    dialect: &'static str,
) -> Result<&'a Map<String, Value>> {
    use serde::de::Error as _;
    value.as_object().ok_or_else(|| ManifestError::ParseError {
        dialect,
        details: serde_json::Error::custom("manifest root was not a JSON object"),
    })
}

/// Pull a string field out of a JSON object, if present and a string.
pub fn take_str(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key).and_then(Value::as_str).map(str::to_string)
}

/// Everything in `obj` whose key isn't in `consumed` is forward-compat
/// passthrough (spec.md §9).
pub fn extras(obj: &Map<String, Value>, consumed: &[&str]) -> Map<String, Value> {
    obj.iter()
        .filter(|(key, _)| !consumed.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// True when `url` looks like an absolute HTTP(S) link rather than a clone
/// URL, i.e. it has no `.git` suffix.
pub fn looks_like_homepage(url: &str) -> bool {
    (url.starts_with("http://") || url.starts_with("https://")) && !url.ends_with(".git")
}
