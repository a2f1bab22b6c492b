//! C3: field normalizers — pure functions shared by every dialect parser.
//!
//! Each transformer here degrades instead of failing outright (spec.md §7):
//! a malformed author line still produces *something*, and it's C6's job to
//! flag it, not C3's job to reject it.

use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::Author;

/// Split a scalar-or-list JSON value into a list of trimmed, non-empty
/// strings on the given separator characters.
///
/// If `value` is already a JSON array, its string elements pass through
/// unchanged (non-string elements are dropped rather than panicking, since
/// C3 never fails hard).
pub fn split_list(value: &Value, separators: &[char]) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(|item| item.as_str().map(str::trim).filter(|s| !s.is_empty()))
            .map(str::to_string)
            .collect(),
        Value::String(s) => s
            .split(|c: char| separators.contains(&c))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

/// Split-list, then lowercase, then dedupe preserving first occurrence.
pub fn keyword_normalize(value: &Value, separators: &[char]) -> Vec<String> {
    split_list(value, separators)
        .into_iter()
        .map(|item| item.to_lowercase())
        .unique()
        .collect()
}

static AT_LITERAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i) AT ").unwrap());

static AUTHOR_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<name>[^<(]*?)\s*(?:<(?P<email>[^>]*)>)?\s*(?:\((?P<url>[^)]*)\))?\s*$")
        .unwrap()
});

/// Decompose a single `NAME [<EMAIL>] [(URL)]` author line into an [`Author`].
///
/// The literal substring ` AT ` (case-insensitive, with surrounding spaces)
/// inside the email becomes `@`. A missing email or URL is simply omitted
/// from the result rather than causing a failure.
pub fn decompose_author(line: &str) -> Author {
    let Some(captures) = AUTHOR_LINE.captures(line.trim()) else {
        return Author {
            name: line.trim().to_string(),
            ..Default::default()
        };
    };

    let name = captures
        .name("name")
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| line.trim().to_string());

    let email = captures
        .name("email")
        .map(|m| m.as_str().trim())
        .filter(|s| !s.is_empty())
        .map(|raw| AT_LITERAL.replace_all(raw, "@").into_owned());

    let url = captures
        .name("url")
        .map(|m| m.as_str().trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    Author {
        name,
        email,
        url,
        maintainer: None,
    }
}

/// Decompose a raw author-line field (which may list multiple authors) into
/// a list of [`Author`] records.
///
/// Multiple authors in one line are only split on `,` when *no* line in the
/// field contains an email/URL bracket — once a `<` or `(` appears anywhere,
/// the whole value is treated as a single author line, since commas then
/// likely belong to free-form prose (spec.md §4.3).
pub fn decompose_author_line(raw: &str) -> Vec<Author> {
    if raw.contains('<') || raw.contains('(') {
        vec![decompose_author(raw)]
    } else {
        raw.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(decompose_author)
            .collect()
    }
}

/// Legacy platform aliases that must remap to their canonical identifiers.
pub const PLATFORM_ALIASES: &[(&str, &str)] = &[
    ("avr", "atmelavr"),
    ("sam", "atmelsam"),
    ("esp8266", "espressif8266"),
    ("esp32", "espressif32"),
    ("espressif", "espressif8266"),
];

/// Apply the platform alias table to a single identifier. Unknown aliases
/// pass through unchanged.
pub fn remap_platform(name: &str) -> String {
    PLATFORM_ALIASES
        .iter()
        .find(|(alias, _)| *alias == name)
        .map(|(_, canonical)| canonical.to_string())
        .unwrap_or_else(|| name.to_string())
}

/// Normalize a scalar-or-list platform/framework value: `"*"` collapses to
/// `["*"]` regardless of any other entries, otherwise split-list + remap is
/// applied to every entry.
pub fn normalize_platforms(value: &Value) -> Vec<String> {
    if matches!(value, Value::String(s) if s.trim() == "*") {
        return vec!["*".to_string()];
    }
    let items = split_list(value, &[',']);
    if items.iter().any(|item| item == "*") {
        return vec!["*".to_string()];
    }
    items.iter().map(|item| remap_platform(item)).collect()
}
