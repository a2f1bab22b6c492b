//! Repository URL handling, generalized from [`GithubRepo`][]-style parsing
//! in the teacher crate to the three forges and version-control kinds
//! spec.md §4.4 expects a manifest to point at.

use url::Url;

use crate::errors::{ManifestError, Result};
use crate::{Export, Repository};

/// A forge a repository URL can point at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Forge {
    /// github.com
    GitHub,
    /// gitlab.com
    GitLab,
    /// bitbucket.org
    Bitbucket,
    /// Any other host
    Other,
}

impl Forge {
    fn from_domain(domain: &str) -> Forge {
        match domain {
            "github.com" => Forge::GitHub,
            "gitlab.com" => Forge::GitLab,
            "bitbucket.org" => Forge::Bitbucket,
            _ => Forge::Other,
        }
    }
}

/// Identify which forge a URL points at.
pub fn detect_forge(url: &str) -> Result<Forge> {
    let parsed = Url::parse(url).map_err(|details| ManifestError::RepoUrlError {
        url: url.to_string(),
        details,
    })?;
    Ok(parsed
        .domain()
        .map(Forge::from_domain)
        .unwrap_or(Forge::Other))
}

/// Guess the version-control system behind a repository URL. Mercurial and
/// Subversion both announce themselves through a URL scheme prefix; anything
/// else defaults to git, the overwhelming majority case across every dialect.
pub fn infer_vcs_kind(url: &str) -> &'static str {
    if url.starts_with("hg+") || url.starts_with("mercurial+") {
        "hg"
    } else if url.starts_with("svn+") || url.starts_with("svn:") {
        "svn"
    } else {
        "git"
    }
}

/// Build a [`Repository`] pointer straight from a URL. The `.git` suffix, if
/// present, is kept verbatim rather than stripped: `library.properties`'s
/// `url` field round-trips through here and its existing tests expect the
/// literal input URL back (spec.md §4.3).
pub fn repository_from_url(url: &str) -> Repository {
    Repository {
        kind: infer_vcs_kind(url).to_string(),
        url: url.to_string(),
        branch: None,
    }
}

/// Derive a homepage URL from a repository URL by stripping a trailing
/// `.git` suffix. Used when a dialect has a repository but no distinct
/// homepage field of its own.
pub fn homepage_from_repository_url(url: &str) -> String {
    url.strip_suffix(".git").unwrap_or(url).to_string()
}

/// Resolve a `raw.githubusercontent.com/<owner>/<repo>/<branch>/<path...>`
/// remote manifest URL into the repository it was fetched from, plus an
/// `export.include` pattern covering the subdirectory the manifest lived in
/// (spec.md §4.4). Returns `None` for any URL that isn't on that host, or
/// that doesn't carry at least an owner and a repo segment.
pub fn derive_from_remote_url(remote_url: &str) -> Result<Option<(Repository, Export)>> {
    let parsed = Url::parse(remote_url).map_err(|details| ManifestError::RepoUrlError {
        url: remote_url.to_string(),
        details,
    })?;
    if parsed.domain() != Some("raw.githubusercontent.com") {
        return Ok(None);
    }
    let segments: Vec<&str> = parsed
        .path_segments()
        .map(|c| c.collect())
        .unwrap_or_default();
    // [owner, repo, branch, ...dirs, filename]
    if segments.len() < 3 {
        return Ok(None);
    }
    let owner = segments[0];
    let repo = segments[1];
    let repository = Repository {
        kind: "git".to_string(),
        url: format!("https://github.com/{owner}/{repo}"),
        branch: None,
    };
    let dirs = &segments[3..segments.len().saturating_sub(1)];
    let export = if dirs.is_empty() {
        Export::default()
    } else {
        Export {
            include: vec![dirs.join("/")],
            exclude: Vec::new(),
        }
    };
    Ok(Some((repository, export)))
}
