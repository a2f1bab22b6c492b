//! Dialect detection, normalization, and validation for embedded-package
//! manifests: an in-house JSON convention, a yotta-style JSON convention, a
//! properties-file convention, a platform/tool JSON descriptor, and a minimal
//! package descriptor all map onto one normalized, validated record.
//!
//! The main entry points are [`parse_from_bytes`][] and [`parse_from_dir`][],
//! followed by [`validate`][].

#![deny(missing_docs)]

use std::collections::BTreeMap;

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub mod dialect;
pub mod errors;
pub mod examples;
pub mod normalize;
pub mod parsers;
pub mod properties;
pub mod repo;
pub mod schema;

pub use dialect::Dialect;
pub use errors::{ManifestError, Result};
pub use schema::{validate, ValidationErrors};

/// A single author entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    /// Required display name
    pub name: String,
    /// Email address, if one was embedded or given explicitly
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Homepage/profile URL, if one was embedded or given explicitly
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Whether this author is also the maintainer of record
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maintainer: Option<bool>,
}

/// Source control pointer for a manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    /// Version control system in use
    #[serde(rename = "type")]
    pub kind: String,
    /// URL to the repository
    pub url: String,
    /// Branch or ref, if pinned
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
}

/// Governs which paths are packaged for distribution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Export {
    /// Glob patterns to include
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub include: Vec<String>,
    /// Glob patterns to exclude
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub exclude: Vec<String>,
}

impl Export {
    /// True if neither `include` nor `exclude` carry any patterns
    pub fn is_empty(&self) -> bool {
        self.include.is_empty() && self.exclude.is_empty()
    }
}

/// A discovered or declared example project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Example {
    /// Display name, derived from its path under `examples/` unless declared explicitly
    pub name: String,
    /// Repository-relative base directory, forward-slash separated
    pub base: String,
    /// Paths of files that belong to the example, relative to `base`
    pub files: Vec<String>,
}

/// A single dependency entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    /// Name of the depended-upon package
    pub name: String,
    /// Version constraint, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Restricts the dependency to these platforms
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub platforms: Vec<String>,
    /// Restricts the dependency to these frameworks
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub frameworks: Vec<String>,
    /// Restricts the dependency to these authors (fork pinning)
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub authors: Vec<String>,
}

/// The common normalized target every dialect parser maps onto.
///
/// Fields that aren't recognized by any dialect flow through untouched in
/// [`NormalizedManifest::extras`][], and fields a dialect parser owns but
/// chooses not to promote to a typed field (e.g. `library.properties`'s
/// `sentence`, or `platform.json`'s `frameworks_detail`) flow through in
/// [`NormalizedManifest::passthrough`][].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NormalizedManifest {
    /// Required identifier string
    pub name: Option<String>,
    /// Semantic-version string, required in strict mode
    pub version: Option<String>,
    /// Free text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Absolute URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
    /// SPDX-style identifier string
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    /// Lowercased, deduplicated, vocabulary-matching tokens
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub keywords: Vec<String>,
    /// Canonical platform identifiers, or `["*"]`
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub platforms: Vec<String>,
    /// Framework identifiers, or `["*"]`
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub frameworks: Vec<String>,
    /// Author records
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub authors: Vec<Author>,
    /// Repository pointer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository: Option<Repository>,
    /// Packaging include/exclude globs
    #[serde(skip_serializing_if = "Export::is_empty", default)]
    pub export: Export,
    /// Discovered or declared example projects
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub examples: Vec<Example>,
    /// Declared dependencies
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub dependencies: Vec<Dependency>,
    /// Host tags this manifest is restricted to, or `None` if the original
    /// value was `"*"`/`"all"`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<Vec<String>>,
    /// Dialect-owned fields that survive verbatim without becoming typed
    /// fields above (e.g. `sentence`, `frameworks_detail`, `packages`)
    #[serde(skip_serializing_if = "Map::is_empty", default)]
    pub passthrough: Map<String, Value>,
    /// Unknown top-level fields, preserved for forward compatibility
    #[serde(skip_serializing_if = "Map::is_empty", default)]
    pub extras: Map<String, Value>,
    /// Scalar elements found in a source `authors` list (e.g. a bare string
    /// instead of a record); never part of the serialized record, but read
    /// by [`crate::schema::validate`][] to raise the `Invalid input type`
    /// error spec.md §4.6 requires for that case.
    #[serde(skip)]
    pub(crate) invalid_authors: Vec<Value>,
}

impl NormalizedManifest {
    /// Start an empty record with just a name, for tests and builders.
    pub fn named(name: impl Into<String>) -> Self {
        NormalizedManifest {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    /// Insert a dialect-owned passthrough field.
    pub fn set_passthrough(&mut self, key: impl Into<String>, value: Value) {
        self.passthrough.insert(key.into(), value);
    }

    /// Insert an unrecognized top-level field for forward compatibility.
    pub fn set_extra(&mut self, key: impl Into<String>, value: Value) {
        self.extras.insert(key.into(), value);
    }
}

/// Parse a manifest from raw bytes given an explicit dialect tag.
///
/// `remote_url`, when given, is used to derive `repository`/`export` for
/// dialects that support it (see [`repo::derive_from_remote_url`][]), and can
/// influence [`dialect::detect_in_dir`][] when probing a directory instead.
pub fn parse_from_bytes(
    bytes: &[u8],
    dialect: Dialect,
    remote_url: Option<&str>,
) -> Result<NormalizedManifest> {
    use serde::de::Error as _;
    let text = std::str::from_utf8(bytes).map_err(|_| ManifestError::ParseError {
        dialect: dialect.name(),
        details: serde_json::Error::custom("manifest bytes were not valid UTF-8"),
    })?;
    parsers::parse(dialect, text, remote_url, None)
}

/// Detect the dialect of a package directory and parse its manifest.
///
/// If the directory contains an `examples/` subtree, it is walked per
/// [`examples::discover`][] and the result is merged into the parsed
/// manifest's `examples` field (unless the manifest already declares
/// `examples` as a list of records, in which case the declared value wins).
pub fn parse_from_dir(dir: &Utf8Path, remote_url: Option<&str>) -> Result<NormalizedManifest> {
    let (dialect, manifest_path) = dialect::detect_in_dir(dir, remote_url)?;
    let source = axoasset::SourceFile::load_local(&manifest_path)?;
    let mut manifest = parsers::parse(dialect, source.contents(), remote_url, Some(dir))?;

    if manifest.examples.is_empty() {
        let examples_dir = dir.join("examples");
        if examples_dir.is_dir() {
            manifest.examples = examples::discover(&examples_dir)?;
        }
    }

    Ok(manifest)
}

/// Path helpers shared by the dialect detector and the example walker: both
/// need to list a directory's immediate children without following symlinks
/// into directories, matching [`examples`][]'s "observed but not followed"
/// rule (spec.md §9).
pub(crate) fn read_dir_sorted(dir: &Utf8Path) -> std::io::Result<Vec<Utf8PathBuf>> {
    let mut entries: Vec<Utf8PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| Utf8PathBuf::from_path_buf(entry.path()).ok())
        .collect();
    entries.sort();
    Ok(entries)
}

/// Build a BTreeMap solely so dialect modules can produce deterministic
/// iteration order when flattening JSON objects (e.g. `platform.json`'s
/// `frameworks` map) without pulling in a second map type.
pub(crate) fn sorted_object(map: &Map<String, Value>) -> BTreeMap<&str, &Value> {
    map.iter().map(|(k, v)| (k.as_str(), v)).collect()
}
