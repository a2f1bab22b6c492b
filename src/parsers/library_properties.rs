//! LIBRARY_PROPERTIES: the Arduino-style `.properties` manifest, spec.md §4.5.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::errors::Result;
use crate::normalize::{decompose_author, keyword_normalize, normalize_platforms};
use crate::repo::Forge;
use crate::{Author, Export, NormalizedManifest};

const DEFAULT_EXPORT_EXCLUDE: &[&str] =
    &["extras", "docs", "tests", "test", "*.doxyfile", "*.pdf"];

const CONSUMED: &[&str] = &[
    "name",
    "version",
    "sentence",
    "paragraph",
    "author",
    "maintainer",
    "category",
    "url",
    "architectures",
];

pub fn parse(map: BTreeMap<String, String>, remote_url: Option<&str>) -> Result<NormalizedManifest> {
    let mut manifest = NormalizedManifest {
        name: map.get("name").cloned(),
        version: map.get("version").cloned(),
        ..Default::default()
    };

    if let Some(sentence) = map.get("sentence") {
        manifest.description = Some(combine_description(sentence, map.get("paragraph")));
        manifest.set_passthrough("sentence", Value::String(sentence.clone()));
    }

    manifest.authors = combine_authors(
        map.get("author").map(String::as_str),
        map.get("maintainer").map(String::as_str),
    );

    manifest.platforms = map
        .get("architectures")
        .map(|raw| normalize_platforms(&Value::String(raw.clone())))
        .unwrap_or_else(|| vec!["*".to_string()]);

    manifest.keywords = map
        .get("category")
        .map(|raw| keyword_normalize(&Value::String(raw.clone()), &[',', '/', ' ']))
        .filter(|list| !list.is_empty())
        .unwrap_or_else(|| vec!["uncategorized".to_string()]);

    manifest.frameworks = vec!["arduino".to_string()];
    manifest.export = Export {
        exclude: DEFAULT_EXPORT_EXCLUDE.iter().map(|s| s.to_string()).collect(),
        include: Vec::new(),
    };

    if let Some(remote) = remote_url {
        if let Some((repository, derived_export)) = crate::repo::derive_from_remote_url(remote)? {
            manifest.repository = Some(repository);
            if !derived_export.include.is_empty() {
                manifest.export.include = derived_export.include;
            }
        }
    }

    if let Some(url) = map.get("url") {
        match crate::repo::detect_forge(url) {
            Ok(Forge::Other) | Err(_) => manifest.homepage = Some(url.clone()),
            Ok(_) => manifest.repository = Some(crate::repo::repository_from_url(url)),
        }
    }

    manifest.extras = map
        .iter()
        .filter(|(key, _)| !CONSUMED.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), Value::String(value.clone())))
        .collect();

    Ok(manifest)
}

/// `sentence`, then `". " + paragraph` if present, injecting the period only
/// when `sentence` lacks terminal punctuation (spec.md §4.5).
fn combine_description(sentence: &str, paragraph: Option<&String>) -> String {
    let Some(paragraph) = paragraph else {
        return sentence.to_string();
    };
    let needs_period = !sentence.trim_end().ends_with(['.', '!', '?']);
    let joiner = if needs_period { ". " } else { " " };
    format!("{sentence}{joiner}{paragraph}")
}

/// Merge the `author` and `maintainer` lines into one authors list.
///
/// When both decompose to the same name, they're the same person: the
/// maintainer flag (and any email/url `author` was missing) merges onto the
/// single resulting entry. Otherwise both entries are kept side by side —
/// even when `author` looks like unparsed prose (a credits paragraph with no
/// `<email>`/`(url)` token to anchor the decomposition on) — so that a
/// malformed `author` line still surfaces as an `authors` validation error
/// instead of silently vanishing (spec.md §4.6); `schema::validate` is what
/// strips it back out in lenient mode.
fn combine_authors(author_line: Option<&str>, maintainer_line: Option<&str>) -> Vec<Author> {
    let author = author_line.map(decompose_author);
    let maintainer = maintainer_line.map(decompose_author);

    match (author, maintainer) {
        (Some(mut author_entry), Some(mut maint_entry)) => {
            if author_entry.name == maint_entry.name {
                author_entry.maintainer = Some(true);
                if author_entry.email.is_none() {
                    author_entry.email = maint_entry.email.take();
                }
                if author_entry.url.is_none() {
                    author_entry.url = maint_entry.url.take();
                }
                vec![author_entry]
            } else {
                maint_entry.maintainer = Some(true);
                vec![author_entry, maint_entry]
            }
        }
        (Some(author_entry), None) => vec![author_entry],
        (None, Some(mut maint_entry)) => {
            maint_entry.maintainer = Some(true);
            vec![maint_entry]
        }
        (None, None) => Vec::new(),
    }
}
