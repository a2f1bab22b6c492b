//! C5: the five dialect parsers, each building a [`NormalizedManifest`] from
//! its own surface syntax while sharing C2 (properties grammar), C3 (field
//! normalizers), and C4 (example walker / manifest-declared example
//! overrides).

mod common;
mod library_json;
mod library_properties;
mod module_json;
mod package_json;
mod platform_json;

use camino::Utf8Path;
use serde_json::Value;

use crate::errors::{ManifestError, Result};
use crate::{Author, Dialect, NormalizedManifest};

/// Parse manifest text for the given dialect, applying the manifest's own
/// `examples` field override (if present) against `dir` when parsing from a
/// directory.
pub fn parse(
    dialect: Dialect,
    text: &str,
    remote_url: Option<&str>,
    dir: Option<&Utf8Path>,
) -> Result<NormalizedManifest> {
    let mut manifest = match dialect {
        Dialect::LibraryJson => {
            let value = parse_json(dialect, text)?;
            let manifest = library_json::parse(&value, remote_url)?;
            (manifest, value)
        }
        Dialect::ModuleJson => {
            let value = parse_json(dialect, text)?;
            let manifest = module_json::parse(&value)?;
            (manifest, value)
        }
        Dialect::PlatformJson => {
            let value = parse_json(dialect, text)?;
            let manifest = platform_json::parse(&value)?;
            (manifest, value)
        }
        Dialect::PackageJson => {
            let value = parse_json(dialect, text)?;
            let manifest = package_json::parse(&value)?;
            (manifest, value)
        }
        Dialect::LibraryProperties => {
            let map = crate::properties::parse(text);
            let manifest = library_properties::parse(map, remote_url)?;
            (manifest, Value::Null)
        }
    };

    if let Some(examples_value) = manifest.1.get("examples") {
        let root = dir.unwrap_or_else(|| Utf8Path::new("."));
        if let Some(examples) = crate::examples::from_manifest_value(examples_value, root) {
            manifest.0.examples = examples;
        }
    }

    Ok(manifest.0)
}

fn parse_json(dialect: Dialect, text: &str) -> Result<Value> {
    serde_json::from_str(text).map_err(|details| ManifestError::ParseError {
        dialect: dialect.name(),
        details,
    })
}

/// Normalize an `authors` JSON value (scalar object or array of objects) into
/// a list of [`Author`] records, plus any array elements that weren't
/// objects at all (spec.md §4.6: a scalar `authors` element, e.g. a bare
/// string, is a validation error rather than something to decompose or
/// silently drop). Shared by the dialects whose `authors` field is already
/// structured (unlike the free-text `author` line the properties and yotta
/// dialects decompose instead).
pub(crate) fn parse_authors_field(value: &Value) -> (Vec<Author>, Vec<Value>) {
    match value {
        Value::Array(items) => {
            let mut authors = Vec::new();
            let mut invalid = Vec::new();
            for item in items {
                if item.is_object() {
                    if let Ok(author) = serde_json::from_value(item.clone()) {
                        authors.push(author);
                    }
                } else {
                    invalid.push(item.clone());
                }
            }
            (authors, invalid)
        }
        Value::Object(_) => (
            serde_json::from_value(value.clone())
                .map(|author| vec![author])
                .unwrap_or_default(),
            Vec::new(),
        ),
        _ => (Vec::new(), Vec::new()),
    }
}
