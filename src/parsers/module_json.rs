//! MODULE_JSON: the yotta-style manifest convention, spec.md §4.5.

use serde_json::Value;

use super::common::{extras, require_object, take_str};
use crate::errors::Result;
use crate::normalize::{decompose_author_line, keyword_normalize};
use crate::{Export, NormalizedManifest};

const DEFAULT_EXPORT_EXCLUDE: &[&str] = &["tests", "test", "*.doxyfile", "*.pdf"];

const CONSUMED: &[&str] = &[
    "name",
    "version",
    "description",
    "homepage",
    "keywords",
    "author",
    "licenses",
    "repository",
    "platforms",
    "frameworks",
    "export",
];

pub fn parse(value: &Value) -> Result<NormalizedManifest> {
    let obj = require_object(value, "module.json")?;

    let mut manifest = NormalizedManifest {
        name: take_str(obj, "name"),
        version: take_str(obj, "version"),
        description: take_str(obj, "description"),
        homepage: take_str(obj, "homepage"),
        ..Default::default()
    };

    if let Some(keywords) = obj.get("keywords") {
        manifest.keywords = keyword_normalize(keywords, &[',']);
    }

    if let Some(author) = obj.get("author").and_then(Value::as_str) {
        manifest.authors = decompose_author_line(author);
    }

    manifest.license = first_license_type(obj.get("licenses"));

    if let Some(repo_value) = obj.get("repository") {
        manifest.repository = serde_json::from_value(repo_value.clone()).ok();
    }

    manifest.platforms = obj
        .get("platforms")
        .map(|v| crate::normalize::normalize_platforms(v))
        .unwrap_or_else(|| vec!["*".to_string()]);

    manifest.frameworks = obj
        .get("frameworks")
        .map(|v| crate::normalize::split_list(v, &[',']))
        .filter(|list| !list.is_empty())
        .unwrap_or_else(|| vec!["mbed".to_string()]);

    manifest.export = obj
        .get("export")
        .map(|export_value| Export {
            exclude: export_value
                .get("exclude")
                .map(|v| crate::normalize::split_list(v, &[',']))
                .unwrap_or_default(),
            include: export_value
                .get("include")
                .map(|v| crate::normalize::split_list(v, &[',']))
                .unwrap_or_default(),
        })
        .unwrap_or_else(|| Export {
            exclude: DEFAULT_EXPORT_EXCLUDE.iter().map(|s| s.to_string()).collect(),
            include: Vec::new(),
        });

    manifest.extras = extras(obj, CONSUMED);

    Ok(manifest)
}

fn first_license_type(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Array(items) => items
            .first()
            .and_then(|entry| entry.get("type"))
            .and_then(Value::as_str)
            .map(str::to_string),
        Value::Object(entry) => entry.get("type").and_then(Value::as_str).map(str::to_string),
        Value::String(s) => Some(s.clone()),
        _ => None,
    }
}
