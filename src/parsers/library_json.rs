//! LIBRARY_JSON: the in-house manifest convention, spec.md §4.5.

use serde_json::Value;

use super::common::{extras, looks_like_homepage, require_object, take_str};
use crate::errors::Result;
use crate::normalize::{keyword_normalize, normalize_platforms, split_list};
use crate::{Export, NormalizedManifest};

const CONSUMED: &[&str] = &[
    "name",
    "version",
    "description",
    "homepage",
    "url",
    "license",
    "keywords",
    "platforms",
    "frameworks",
    "authors",
    "repository",
    "export",
    "exclude",
    "include",
    "examples",
    "build",
];

pub fn parse(value: &Value, remote_url: Option<&str>) -> Result<NormalizedManifest> {
    let obj = require_object(value, "library.json")?;

    let mut manifest = NormalizedManifest {
        name: take_str(obj, "name"),
        version: take_str(obj, "version"),
        description: take_str(obj, "description"),
        license: take_str(obj, "license"),
        ..Default::default()
    };

    if let Some(keywords) = obj.get("keywords") {
        manifest.keywords = keyword_normalize(keywords, &[',']);
    }
    if let Some(platforms) = obj.get("platforms") {
        manifest.platforms = normalize_platforms(platforms);
    }
    if let Some(frameworks) = obj.get("frameworks") {
        manifest.frameworks = split_list(frameworks, &[',']);
    }

    if let Some(authors_value) = obj.get("authors") {
        let (authors, invalid) = super::parse_authors_field(authors_value);
        manifest.authors = authors;
        manifest.invalid_authors = invalid;
    }

    let mut export = Export::default();
    if let Some(export_value) = obj.get("export") {
        if let Some(exclude) = export_value.get("exclude") {
            export.exclude = split_list(exclude, &[',']);
        }
        if let Some(include) = export_value.get("include") {
            export.include = split_list(include, &[',']);
        }
    }
    if let Some(exclude) = obj.get("exclude") {
        export.exclude = split_list(exclude, &[',']);
    }
    if let Some(include) = obj.get("include") {
        export.include = split_list(include, &[',']);
    }

    if let Some(repo_value) = obj.get("repository") {
        manifest.repository = serde_json::from_value(repo_value.clone()).ok();
    }

    let homepage = take_str(obj, "homepage").or_else(|| {
        obj.get("url").and_then(Value::as_str).and_then(|url| {
            if manifest.repository.is_none() && looks_like_homepage(url) {
                Some(url.to_string())
            } else {
                None
            }
        })
    });
    manifest.homepage = homepage;

    if manifest.repository.is_none() {
        if let Some(url) = obj.get("url").and_then(Value::as_str) {
            if !looks_like_homepage(url) {
                manifest.repository = Some(crate::repo::repository_from_url(url));
            }
        }
    }

    if manifest.repository.is_none() {
        if let Some(url) = remote_url {
            if let Some((repository, derived_export)) = crate::repo::derive_from_remote_url(url)? {
                manifest.repository = Some(repository);
                if export.include.is_empty() {
                    export.include = derived_export.include;
                }
            }
        }
    }

    manifest.export = export;

    if let Some(build) = obj.get("build") {
        manifest.set_passthrough("build", build.clone());
    }

    manifest.extras = extras(obj, CONSUMED);

    Ok(manifest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn legacy_url_and_platform_remap() {
        let value = json!({
            "name": "TestPackage",
            "keywords": "kw1, KW2, kw3",
            "platforms": ["atmelavr", "espressif"],
            "url": "http://old.url.format",
            "exclude": [".gitignore", "tests"],
            "include": "mylib",
            "customField": "Custom Value"
        });
        let manifest = parse(&value, None).unwrap();
        assert_eq!(manifest.platforms, vec!["atmelavr", "espressif8266"]);
        assert_eq!(manifest.keywords, vec!["kw1", "kw2", "kw3"]);
        assert_eq!(manifest.homepage.as_deref(), Some("http://old.url.format"));
        assert_eq!(manifest.export.exclude, vec![".gitignore", "tests"]);
        assert_eq!(manifest.export.include, vec!["mylib"]);
        assert_eq!(
            manifest.extras.get("customField").unwrap(),
            &json!("Custom Value")
        );
    }

    #[test]
    fn nested_export_object() {
        let value = json!({
            "keywords": ["sound", "audio", "music", "SD", "card", "playback"],
            "frameworks": "arduino",
            "platforms": "atmelavr",
            "export": {"exclude": "audio_samples"}
        });
        let manifest = parse(&value, None).unwrap();
        assert_eq!(
            manifest.keywords,
            vec!["sound", "audio", "music", "sd", "card", "playback"]
        );
        assert_eq!(manifest.frameworks, vec!["arduino"]);
        assert_eq!(manifest.platforms, vec!["atmelavr"]);
        assert_eq!(manifest.export.exclude, vec!["audio_samples"]);
    }

    #[test]
    fn scalar_author_element_is_captured_as_invalid() {
        let value = json!({
            "name": "MyPackage",
            "version": "1.0.0",
            "authors": ["bare string"]
        });
        let manifest = parse(&value, None).unwrap();
        assert!(manifest.authors.is_empty());
        assert_eq!(manifest.invalid_authors, vec![json!("bare string")]);
    }
}
