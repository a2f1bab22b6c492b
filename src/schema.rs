//! C6: the schema validator. Two modes — strict and lenient — matching
//! spec.md §4.6's contract; shaped like `libforge-core`'s
//! `manifest::validate` (collect every violation before deciding what to do
//! with them) generalized from "report first failure" to "aggregate all,
//! then let the caller choose strict-fail vs lenient-coerce".

use std::collections::BTreeMap;
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::{ManifestError, NormalizedManifest, Result};

static NAME_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z0-9][\w\-. ]*$").unwrap());
static VERSION_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+\.\d+\.\d+(?:-[\w.]+)?(?:\+[\w.]+)?$").unwrap());
static KEYWORD_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9][a-z0-9 /+-]*$").unwrap());
static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap());

const KNOWN_REPO_KINDS: &[&str] = &["git", "hg", "svn"];

/// An author entry that looks like unparsed prose rather than a name: no
/// email, no URL, and more than a handful of words, the way a credits
/// paragraph decomposes when there's no `<email>`/`(url)` token to anchor on.
fn looks_unparsed(author: &crate::Author) -> bool {
    author.email.is_none() && author.url.is_none() && author.name.split_whitespace().count() > 5
}

/// A field-path-keyed validation error map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    by_field: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.by_field
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    /// True when no field carries an error.
    pub fn is_empty(&self) -> bool {
        self.by_field.is_empty()
    }

    /// Messages recorded against a given field path, if any.
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.by_field.get(field).map(Vec::as_slice)
    }

    /// Iterate over `(field_path, messages)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.by_field
            .iter()
            .map(|(field, messages)| (field.as_str(), messages.as_slice()))
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .by_field
            .iter()
            .map(|(field, messages)| format!("{field}: {}", messages.join(", ")))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Validate a normalized record against spec.md §4.6's per-field rules.
///
/// In lenient mode, offending fields are stripped or replaced in the
/// returned record; in strict mode the record is returned unmodified aside
/// from required-field checks, since a non-empty error map means the caller
/// should discard it anyway (see [`validate_strict`][]).
pub fn validate(mut record: NormalizedManifest, strict: bool) -> (NormalizedManifest, ValidationErrors) {
    let mut errors = ValidationErrors::default();

    match &record.name {
        Some(name) if !name.is_empty() && NAME_PATTERN.is_match(name) => {}
        Some(_) => errors.push("name", "does not match required pattern"),
        None if strict => errors.push("name", "Missing data for required field"),
        None => {}
    }

    match &record.version {
        Some(version) if VERSION_PATTERN.is_match(version) => {}
        Some(_) => errors.push("version", "Invalid semantic versioning format"),
        None if strict => errors.push("version", "Missing data for required field"),
        None => {}
    }

    let invalid_keywords: Vec<String> = record
        .keywords
        .iter()
        .filter(|kw| !KEYWORD_PATTERN.is_match(kw))
        .cloned()
        .collect();
    if !invalid_keywords.is_empty() {
        errors.push(
            "keywords",
            format!("does not match required pattern: {}", invalid_keywords.join(", ")),
        );
        if !strict {
            record.keywords.retain(|kw| KEYWORD_PATTERN.is_match(kw));
        }
    }

    for (index, author) in record.authors.iter_mut().enumerate() {
        if let Some(email) = &author.email {
            if !EMAIL_PATTERN.is_match(email) {
                errors.push("authors", format!("invalid email format at index {index}"));
                if !strict {
                    author.email = None;
                }
            }
        }
    }

    if !record.invalid_authors.is_empty() {
        errors.push("authors", "Invalid input type");
        record.invalid_authors.clear();
    }

    let has_unparsed_author = record.authors.iter().any(looks_unparsed);
    if has_unparsed_author {
        errors.push("authors", "author entry could not be parsed into a name");
        if !strict {
            record.authors.retain(|author| !looks_unparsed(author));
        }
    }

    if let Some(repository) = &record.repository {
        if !KNOWN_REPO_KINDS.contains(&repository.kind.as_str()) {
            errors.push("repository.type", "Invalid input type");
            if !strict {
                record.repository = None;
            }
        }
    }

    (record, errors)
}

/// Validate in strict mode and turn a non-empty error map into
/// `Err(ManifestError::Validation)`, for callers that want a `Result`
/// instead of inspecting the error map themselves.
pub fn validate_strict(record: NormalizedManifest) -> Result<NormalizedManifest> {
    let (record, errors) = validate(record, true);
    if errors.is_empty() {
        Ok(record)
    } else {
        Err(ManifestError::Validation(errors))
    }
}
