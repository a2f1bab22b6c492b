//! PACKAGE_JSON: the minimal tool-package descriptor, spec.md §4.5.

use serde_json::Value;

use super::common::{extras, require_object, take_str};
use crate::errors::Result;
use crate::normalize::split_list;
use crate::NormalizedManifest;

const CONSUMED: &[&str] = &[
    "name",
    "version",
    "description",
    "homepage",
    "url",
    "system",
];

pub fn parse(value: &Value) -> Result<NormalizedManifest> {
    let obj = require_object(value, "package.json")?;

    let mut manifest = NormalizedManifest {
        name: take_str(obj, "name"),
        version: take_str(obj, "version"),
        description: take_str(obj, "description"),
        ..Default::default()
    };

    manifest.homepage = take_str(obj, "homepage").or_else(|| take_str(obj, "url"));

    manifest.system = obj.get("system").and_then(|value| match value {
        Value::String(s) if s.eq_ignore_ascii_case("*") || s.eq_ignore_ascii_case("all") => None,
        other => Some(split_list(other, &[','])),
    });

    manifest.extras = extras(obj, CONSUMED);

    Ok(manifest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn url_renames_to_homepage() {
        let value = json!({
            "name": "tool-scons",
            "description": "SCons software construction tool",
            "url": "http://www.scons.org",
            "version": "3.30101.0"
        });
        let manifest = parse(&value).unwrap();
        assert_eq!(manifest.homepage.as_deref(), Some("http://www.scons.org"));
    }

    #[test]
    fn system_star_or_all_drops_field() {
        let manifest = parse(&json!({"system": "*"})).unwrap();
        assert_eq!(manifest.system, None);

        let manifest = parse(&json!({"system": "all"})).unwrap();
        assert_eq!(manifest.system, None);

        let manifest = parse(&json!({"system": "darwin_x86_64"})).unwrap();
        assert_eq!(manifest.system, Some(vec!["darwin_x86_64".to_string()]));
    }
}
