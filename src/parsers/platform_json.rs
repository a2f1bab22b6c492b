//! PLATFORM_JSON: the platform/tool descriptor, spec.md §4.5.

use serde_json::Value;

use super::common::{extras, require_object, take_str};
use crate::errors::Result;
use crate::NormalizedManifest;

const CONSUMED: &[&str] = &[
    "name",
    "version",
    "description",
    "homepage",
    "url",
    "license",
    "repository",
    "frameworks",
    "engines",
    "packages",
];

pub fn parse(value: &Value) -> Result<NormalizedManifest> {
    let obj = require_object(value, "platform.json")?;

    let mut manifest = NormalizedManifest {
        name: take_str(obj, "name"),
        version: take_str(obj, "version"),
        description: take_str(obj, "description"),
        license: take_str(obj, "license"),
        ..Default::default()
    };

    manifest.homepage = take_str(obj, "homepage").or_else(|| take_str(obj, "url"));

    if let Some(repo_value) = obj.get("repository") {
        manifest.repository = serde_json::from_value(repo_value.clone()).ok();
    }

    if let Some(Value::Object(frameworks)) = obj.get("frameworks") {
        manifest.frameworks = frameworks.keys().cloned().collect();
        manifest.set_passthrough("frameworks_detail", Value::Object(frameworks.clone()));
    }

    if let Some(engines) = obj.get("engines") {
        manifest.set_passthrough("engines", engines.clone());
    }
    if let Some(packages) = obj.get("packages") {
        manifest.set_passthrough("packages", packages.clone());
    }

    manifest.extras = extras(obj, CONSUMED);

    Ok(manifest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn frameworks_map_flattens_to_name_list_with_detail_passthrough() {
        let value = json!({
            "name": "atmelavr",
            "title": "Atmel AVR",
            "homepage": "http://platformio.org/platforms/atmelavr",
            "url": "http://www.atmel.com/products/microcontrollers/avr/default.aspx",
            "license": "Apache-2.0",
            "engines": {"platformio": "<5"},
            "repository": {"type": "git", "url": "https://github.com/platformio/platform-atmelavr.git"},
            "version": "1.15.0",
            "frameworks": {
                "arduino": {"package": "framework-arduinoavr"},
                "simba": {"package": "framework-simba"}
            },
            "packages": {"toolchain-atmelavr": {"type": "toolchain"}}
        });
        let manifest = parse(&value).unwrap();
        let mut frameworks = manifest.frameworks.clone();
        frameworks.sort();
        assert_eq!(frameworks, vec!["arduino", "simba"]);
        assert_eq!(
            manifest.homepage.as_deref(),
            Some("http://platformio.org/platforms/atmelavr")
        );
        assert!(manifest.passthrough.contains_key("frameworks_detail"));
        assert!(manifest.passthrough.contains_key("engines"));
        assert!(manifest.passthrough.contains_key("packages"));
        assert_eq!(
            manifest.extras.get("title").unwrap(),
            &json!("Atmel AVR")
        );
    }
}
