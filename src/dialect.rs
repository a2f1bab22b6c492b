//! C1: dialect detection — picking the right manifest convention from an
//! explicit tag, a directory listing, or a remote URL.
//!
//! The probe order mirrors [`crate::rust::workspace_manifest`][] and
//! [`crate::javascript::workspace_manifest`][] from the teacher crate this
//! was generalized from: try one known filename after another and return the
//! first hit, except that here there are five dialects instead of two, and a
//! `remote_url` can promote a later candidate ahead of an earlier one.

use camino::{Utf8Path, Utf8PathBuf};
use tracing::debug;

use crate::errors::{ManifestError, Result};

/// One of the five recognized manifest conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    /// The in-house `library.json` convention
    LibraryJson,
    /// The yotta-style `module.json` convention
    ModuleJson,
    /// The Java-properties-style `library.properties` convention
    LibraryProperties,
    /// The platform/tool `platform.json` descriptor
    PlatformJson,
    /// The minimal `package.json` descriptor
    PackageJson,
}

/// Directory probe order: filename paired with its dialect, in the order
/// spec.md §4.1 says to check them.
const PROBE_ORDER: &[(&str, Dialect)] = &[
    ("library.json", Dialect::LibraryJson),
    ("library.properties", Dialect::LibraryProperties),
    ("module.json", Dialect::ModuleJson),
    ("package.json", Dialect::PackageJson),
    ("platform.json", Dialect::PlatformJson),
];

impl Dialect {
    /// The canonical manifest filename for this dialect.
    pub fn filename(&self) -> &'static str {
        match self {
            Dialect::LibraryJson => "library.json",
            Dialect::LibraryProperties => "library.properties",
            Dialect::ModuleJson => "module.json",
            Dialect::PackageJson => "package.json",
            Dialect::PlatformJson => "platform.json",
        }
    }

    /// A short name for this dialect, used in error messages.
    pub fn name(&self) -> &'static str {
        self.filename()
    }

    fn from_filename(name: &str) -> Option<Dialect> {
        PROBE_ORDER
            .iter()
            .find(|(candidate, _)| *candidate == name)
            .map(|(_, dialect)| *dialect)
    }
}

/// Pick the dialect and manifest path for a package directory.
///
/// Returns the first candidate filename (in [`PROBE_ORDER`][]) that exists in
/// `dir`, unless `remote_url`'s filename names a *later* candidate that also
/// exists, in which case the URL's filename wins. This lets a caller fetch a
/// specific manifest out of a multi-manifest repo by passing that manifest's
/// URL, without having to special-case every dialect at the call site.
pub fn detect_in_dir(
    dir: &Utf8Path,
    remote_url: Option<&str>,
) -> Result<(Dialect, Utf8PathBuf)> {
    let mut found: Vec<(Dialect, Utf8PathBuf)> = Vec::new();
    for (filename, dialect) in PROBE_ORDER {
        let candidate = dir.join(filename);
        debug!("probing for {} at {}", filename, candidate);
        if candidate.is_file() {
            found.push((*dialect, candidate));
        }
    }

    if let Some(url) = remote_url {
        if let Some(url_filename) = remote_url_filename(url) {
            if let Some(wanted) = Dialect::from_filename(url_filename) {
                if let Some(hit) = found.iter().find(|(dialect, _)| *dialect == wanted) {
                    debug!(
                        "remote_url filename {} overrides default probe order",
                        url_filename
                    );
                    return Ok(hit.clone());
                }
            }
        }
    }

    found
        .into_iter()
        .next()
        .ok_or_else(|| ManifestError::ManifestNotFound {
            dir: dir.to_owned(),
        })
}

fn remote_url_filename(url: &str) -> Option<&str> {
    url.rsplit('/').next().filter(|name| !name.is_empty())
}
