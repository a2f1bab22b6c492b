//! Errors!

use camino::Utf8PathBuf;
use miette::Diagnostic;
use thiserror::Error;

/// A Result returned by pkgmanifest
pub type Result<T> = std::result::Result<T, ManifestError>;

/// An Error/Diagnostic returned by pkgmanifest
#[derive(Debug, Error, Diagnostic)]
#[non_exhaustive]
pub enum ManifestError {
    /// axoasset returned an error reading or parsing a manifest file
    #[error(transparent)]
    #[diagnostic(transparent)]
    Axoasset(#[from] axoasset::AxoassetError),

    /// No known manifest filename was found in a directory
    #[error("no known manifest file found in {dir}")]
    #[diagnostic(help(
        "expected one of: library.json, library.properties, module.json, package.json, platform.json"
    ))]
    ManifestNotFound {
        /// The directory that was probed
        dir: Utf8PathBuf,
    },

    /// The raw bytes for a dialect couldn't be parsed as that dialect's syntax
    #[error("couldn't parse {dialect} manifest")]
    ParseError {
        /// Which dialect's parser was in use
        dialect: &'static str,
        /// The underlying JSON error
        #[source]
        details: serde_json::Error,
    },

    /// A field transform failed in a way that can't be degraded. C3 transformers
    /// are expected to degrade instead of failing; this is the escape hatch for
    /// the truly unrecoverable case spec.md calls out (an author line with
    /// embedded structural tokens that would corrupt the record if guessed at).
    #[error("couldn't normalize field '{field}': {reason}")]
    NormalizeError {
        /// Name of the field that failed to normalize
        field: String,
        /// Human-readable reason
        reason: String,
    },

    /// Validation failed in strict mode; carries the complete per-field diagnosis
    #[error("manifest failed validation")]
    #[diagnostic(help("see the attached error map for per-field details"))]
    Validation(#[from] crate::schema::ValidationErrors),

    /// An error occurred while walking a directory for example projects
    #[error("couldn't search for example files in {dir}")]
    ExampleWalk {
        /// The directory being walked
        dir: Utf8PathBuf,
        /// Underlying I/O error
        #[source]
        details: std::io::Error,
    },

    /// A repository or remote manifest URL couldn't be parsed
    #[error("couldn't parse repository URL '{url}'")]
    RepoUrlError {
        /// The URL that failed to parse
        url: String,
        /// Underlying parse error
        #[source]
        details: url::ParseError,
    },
}
