//! End-to-end scenarios from spec.md §8, exercised through the public API
//! only, in the style of `axoproject::tests` and
//! `libforge-core/tests/integration_flow.rs`.

use std::fs;

use camino::Utf8PathBuf;
use pkgmanifest::{parse_from_bytes, parse_from_dir, validate, Dialect};

fn tempdir() -> (tempfile::TempDir, Utf8PathBuf) {
    let tmp = tempfile::tempdir().unwrap();
    let root = Utf8PathBuf::from_path_buf(tmp.path().to_owned()).unwrap();
    (tmp, root)
}

#[test]
fn library_json_legacy_url_and_platform_remap() {
    let contents = br#"{
        "name": "TestPackage",
        "keywords": "kw1, KW2, kw3",
        "platforms": ["atmelavr", "espressif"],
        "url": "http://old.url.format",
        "exclude": [".gitignore", "tests"],
        "include": "mylib",
        "customField": "Custom Value"
    }"#;
    let manifest = parse_from_bytes(contents, Dialect::LibraryJson, None).unwrap();
    assert_eq!(manifest.platforms, vec!["atmelavr", "espressif8266"]);
    assert_eq!(manifest.keywords, vec!["kw1", "kw2", "kw3"]);
    assert_eq!(manifest.homepage.as_deref(), Some("http://old.url.format"));
    assert_eq!(manifest.export.exclude, vec![".gitignore", "tests"]);
    assert_eq!(manifest.export.include, vec!["mylib"]);
    assert_eq!(
        manifest.extras.get("customField").unwrap(),
        &serde_json::json!("Custom Value")
    );
}

#[test]
fn module_json_defaults_and_license_extraction() {
    let contents = br#"{
        "author": "Name Surname <name@surname.com>",
        "name": "YottaLibrary",
        "version": "1.2.3",
        "licenses": [{"type": "Apache-2.0", "url": "https://spdx.org/licenses/Apache-2.0"}]
    }"#;
    let manifest = parse_from_bytes(contents, Dialect::ModuleJson, None).unwrap();
    assert_eq!(manifest.platforms, vec!["*"]);
    assert_eq!(manifest.frameworks, vec!["mbed"]);
    assert_eq!(
        manifest.export.exclude,
        vec!["tests", "test", "*.doxyfile", "*.pdf"]
    );
    assert_eq!(manifest.authors.len(), 1);
    assert_eq!(manifest.authors[0].name, "Name Surname");
    assert_eq!(manifest.authors[0].email.as_deref(), Some("name@surname.com"));
    assert_eq!(manifest.license.as_deref(), Some("Apache-2.0"));
}

#[test]
fn library_properties_with_remote_url() {
    let contents = b"name=TestPackage\nversion=1.2.3\narchitectures=avr, esp32\n";
    let manifest = parse_from_bytes(
        contents,
        Dialect::LibraryProperties,
        Some("https://raw.githubusercontent.com/u/r/master/libraries/TestPackage/library.properties"),
    )
    .unwrap();
    assert_eq!(manifest.platforms, vec!["atmelavr", "espressif32"]);
    assert_eq!(manifest.frameworks, vec!["arduino"]);
    assert_eq!(manifest.keywords, vec!["uncategorized"]);
    let repository = manifest.repository.unwrap();
    assert_eq!(repository.kind, "git");
    assert_eq!(repository.url, "https://github.com/u/r");
    assert_eq!(manifest.export.include, vec!["libraries/TestPackage"]);
}

#[test]
fn broken_authors_field_is_flagged_by_lenient_validation() {
    let contents = b"name=Mozzi\nversion=1.0.3\nauthor=Tim Barrass and contributors as documented in source, and at https://github.com/sensorium/Mozzi/graphs/contributors\nmaintainer=Tim Barrass <faveflave@gmail.com>\n";
    let manifest = parse_from_bytes(contents, Dialect::LibraryProperties, None).unwrap();
    assert_eq!(manifest.authors.len(), 2);

    let (validated, errors) = validate(manifest, false);
    assert!(errors.get("authors").is_some());
    assert_eq!(validated.authors.len(), 1);
    assert_eq!(validated.authors[0].name, "Tim Barrass");
    assert_eq!(validated.authors[0].maintainer, Some(true));
    assert_eq!(validated.authors[0].email.as_deref(), Some("faveflave@gmail.com"));
}

#[test]
fn example_discovery_across_project_sketch_custom_and_root_styles() {
    let (_tmp, root) = tempdir();
    let write = |rel: &str, contents: &str| {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    };

    write("library.json", r#"{"name":"pkg","version":"1.0.0"}"#);
    write("examples/PlatformIO/hello/platformio.ini", "");
    write("examples/PlatformIO/hello/include/main.h", "");
    write("examples/PlatformIO/hello/src/main.cpp", "");
    write("examples/1. General/SomeSketchIno/SomeSketchIno.ino", "");
    write("examples/demo/demo.cpp", "");
    write("examples/demo/demo.h", "");
    write("examples/demo/util.h", "");
    write("examples/root.c", "");
    write("examples/invalid-example/hello.json", "");

    let manifest = parse_from_dir(&root, None).unwrap();
    let names: std::collections::HashSet<_> =
        manifest.examples.iter().map(|e| e.name.as_str()).collect();
    assert!(names.contains("PlatformIO/hello"));
    assert!(names.contains("1_General/SomeSketchIno"));
    assert!(names.contains("demo"));
    assert!(names.contains("Examples"));
    assert!(!names.iter().any(|n| n.contains("invalid-example")));
    assert_eq!(manifest.examples.len(), 4);
}

#[test]
fn package_json_system_filter() {
    let star = parse_from_bytes(br#"{"system":"*"}"#, Dialect::PackageJson, None).unwrap();
    assert_eq!(star.system, None);

    let all = parse_from_bytes(br#"{"system":"all"}"#, Dialect::PackageJson, None).unwrap();
    assert_eq!(all.system, None);

    let darwin =
        parse_from_bytes(br#"{"system":"darwin_x86_64"}"#, Dialect::PackageJson, None).unwrap();
    assert_eq!(darwin.system, Some(vec!["darwin_x86_64".to_string()]));
}

#[test]
fn schema_strictness_messages() {
    let missing_version = pkgmanifest::NormalizedManifest::named("MyPackage");
    let (_, errors) = validate(missing_version, true);
    assert!(errors
        .get("version")
        .unwrap()
        .iter()
        .any(|m| m.contains("Missing data for required field")));

    let mut broken_version = pkgmanifest::NormalizedManifest::named("MyPackage");
    broken_version.version = Some("broken".to_string());
    let (_, errors) = validate(broken_version, true);
    assert!(errors
        .get("version")
        .unwrap()
        .iter()
        .any(|m| m.contains("Invalid semantic versioning format")));

    let scalar_authors = parse_from_bytes(
        br#"{"name": "MyPackage", "version": "1.0.0", "authors": ["bare string"]}"#,
        Dialect::LibraryJson,
        None,
    )
    .unwrap();
    let (_, errors) = validate(scalar_authors, true);
    assert!(errors
        .get("authors")
        .unwrap()
        .iter()
        .any(|m| m.contains("Invalid input type")));
}

#[test]
fn dialect_detection_prefers_explicit_remote_url_filename() {
    let (_tmp, root) = tempdir();
    fs::write(root.join("library.json"), r#"{"name": "library.json"}"#).unwrap();
    fs::write(root.join("library.properties"), "name=library.properties\n").unwrap();

    let manifest = parse_from_dir(&root, None).unwrap();
    assert_eq!(manifest.name.as_deref(), Some("library.json"));

    let manifest =
        parse_from_dir(&root, Some("http://localhost/library.properties")).unwrap();
    assert_eq!(manifest.name.as_deref(), Some("library.properties"));
}
