//! C2: the `library.properties` grammar — a flat, line-oriented key/value
//! text format borrowed from Java's `.properties` files.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;

static LINE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*([A-Za-z_][A-Za-z0-9_.]*)\s*=\s*(.*)$").unwrap());

/// Parse properties text into a flat string map.
///
/// Comment lines (`#...`) and blank lines are skipped. Trailing whitespace is
/// trimmed from values. Backslash-newline is *not* treated as a line
/// continuation, matching spec.md §4.2. Duplicate keys: last write wins.
pub fn parse(text: &str) -> BTreeMap<String, String> {
    let mut map = BTreeMap::new();
    for line in text.lines() {
        let trimmed = line.trim_start();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        if let Some(captures) = LINE_PATTERN.captures(line) {
            let key = captures[1].to_string();
            let value = captures[2].trim_end().to_string();
            map.insert(key, value);
        }
    }
    map
}
