//! C4: the example walker. Classifies the subtrees under a package's
//! `examples/` directory into runnable demonstration projects.
//!
//! No single teacher module does this; the directory-walk shape (read,
//! classify by name, accumulate, recurse where useful) is grounded on
//! `axoproject::find_auto_includes`, and the recursive-descent-into-leaf-only
//! policy mirrors how `libforge-pack` walks a package tree for packaging.

use std::collections::BTreeMap;

use camino::{Utf8Path, Utf8PathBuf};
use glob::glob;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::errors::{ManifestError, Result};
use crate::Example;

const PROJECT_MARKERS: &[&str] = &["platformio.ini", "sketch.yaml", "CMakeLists.txt"];
const SKETCH_EXTENSIONS: &[&str] = &["ino", "pde"];
const SOURCE_EXTENSIONS: &[&str] = &[
    "c", "cpp", "cc", "cxx", "h", "hpp", "hxx", "ino", "pde", "S", "s", "asm",
];

static DOT_SPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\. ").unwrap());
static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

fn sanitize_segment(segment: &str) -> String {
    let step = DOT_SPACE.replace_all(segment, "_");
    WHITESPACE_RUN.replace_all(&step, "_").into_owned()
}

fn derive_name(parts: &[String]) -> String {
    parts
        .iter()
        .map(|part| sanitize_segment(part))
        .collect::<Vec<_>>()
        .join("/")
}

fn is_dotfile(name: &str) -> bool {
    name.starts_with('.')
}

fn has_extension(name: &str, extensions: &[&str]) -> bool {
    Utf8Path::new(name)
        .extension()
        .map(|ext| extensions.contains(&ext))
        .unwrap_or(false)
}

fn is_symlink(path: &Utf8Path) -> bool {
    std::fs::symlink_metadata(path)
        .map(|meta| meta.file_type().is_symlink())
        .unwrap_or(false)
}

/// Walk `examples_dir` (the package's `examples/` subdirectory) and emit
/// example records per spec.md §4.4's project/sketch/custom/root-leftover
/// rules. `examples_dir`'s parent is the package root; example `base` paths
/// are reported relative to it.
pub fn discover(examples_dir: &Utf8Path) -> Result<Vec<Example>> {
    let mut found = Vec::new();
    let mut root_leftovers = Vec::new();

    for entry in read_dir_sorted(examples_dir)? {
        let name = entry.file_name().unwrap_or_default();
        if is_symlink(&entry) {
            debug!("skipping symlink {}", entry);
            continue;
        }
        if entry.is_dir() {
            classify_subtree(examples_dir, &entry, &[name.to_string()], &mut found)?;
        } else if entry.is_file() && !is_dotfile(name) && has_extension(name, SOURCE_EXTENSIONS) {
            root_leftovers.push(name.to_string());
        }
    }

    if !root_leftovers.is_empty() {
        info!("grouping {} root-level example files", root_leftovers.len());
        found.push(Example {
            name: "Examples".to_string(),
            base: "examples".to_string(),
            files: root_leftovers,
        });
    }

    Ok(found)
}

fn classify_subtree(
    examples_root: &Utf8Path,
    dir: &Utf8Path,
    name_parts: &[String],
    found: &mut Vec<Example>,
) -> Result<()> {
    let dir_name = dir.file_name().unwrap_or_default();
    let children = read_dir_sorted(dir)?;

    let has_project_marker = children.iter().any(|child| {
        child.is_file() && PROJECT_MARKERS.contains(&child.file_name().unwrap_or_default())
    });
    if has_project_marker {
        let base = format!("examples/{}", name_parts.join("/"));
        let mut files = Vec::new();
        for child in &children {
            if is_symlink(child) || !child.is_file() {
                continue;
            }
            let child_name = child.file_name().unwrap_or_default();
            if is_dotfile(child_name) {
                continue;
            }
            files.push(child_name.to_string());
        }
        for nested in ["include", "src"] {
            let nested_dir = dir.join(nested);
            if nested_dir.is_dir() {
                for entry in WalkDir::new(&nested_dir)
                    .into_iter()
                    .filter_map(|e| e.ok())
                    .filter(|e| e.file_type().is_file())
                {
                    if let Ok(path) = Utf8PathBuf::from_path_buf(entry.into_path()) {
                        if let Ok(rel) = path.strip_prefix(dir) {
                            files.push(rel.as_str().to_string());
                        }
                    }
                }
            }
        }
        info!("classified {} as project-style example", dir);
        found.push(Example {
            name: derive_name(name_parts),
            base,
            files,
        });
        return Ok(());
    }

    let sketch_match = children.iter().find(|child| {
        child.is_file()
            && child.file_stem() == Some(dir_name)
            && has_extension(child.file_name().unwrap_or_default(), SKETCH_EXTENSIONS)
    });
    if let Some(sketch_file) = sketch_match {
        info!("classified {} as sketch-style example", dir);
        found.push(Example {
            name: derive_name(name_parts),
            base: format!("examples/{}", name_parts.join("/")),
            files: vec![sketch_file.file_name().unwrap_or_default().to_string()],
        });
        return Ok(());
    }

    let custom_files: Vec<String> = children
        .iter()
        .filter(|child| {
            child.is_file()
                && !is_symlink(child)
                && has_extension(child.file_name().unwrap_or_default(), SOURCE_EXTENSIONS)
        })
        .map(|child| child.file_name().unwrap_or_default().to_string())
        .collect();
    if !custom_files.is_empty() {
        info!("classified {} as custom-style example", dir);
        found.push(Example {
            name: derive_name(name_parts),
            base: format!("examples/{}", name_parts.join("/")),
            files: custom_files,
        });
        return Ok(());
    }

    let only_directories = !children.is_empty() && children.iter().all(|child| child.is_dir());
    if only_directories {
        for child in &children {
            if is_symlink(child) {
                continue;
            }
            let child_name = child.file_name().unwrap_or_default().to_string();
            let mut nested_parts = name_parts.to_vec();
            nested_parts.push(child_name);
            classify_subtree(examples_root, child, &nested_parts, found)?;
        }
        return Ok(());
    }

    debug!("discarding unrecognized example subtree {}", dir);
    Ok(())
}

fn read_dir_sorted(dir: &Utf8Path) -> Result<Vec<Utf8PathBuf>> {
    crate::read_dir_sorted(dir).map_err(|details| ManifestError::ExampleWalk {
        dir: dir.to_owned(),
        details,
    })
}

/// Build examples straight from a manifest's own `examples` field, bypassing
/// the directory walk, per spec.md §4.4's override rule:
///
/// - a list of records passes through verbatim
/// - a list of glob patterns is expanded against `package_root` and grouped
///   by parent directory
/// - any non-string element anywhere in the list flips the whole field to
///   records mode (the resolved Open Question in SPEC_FULL.md §9)
pub fn from_manifest_value(value: &Value, package_root: &Utf8Path) -> Option<Vec<Example>> {
    let items = value.as_array()?;
    if items.is_empty() {
        return None;
    }

    let all_strings = items.iter().all(Value::is_string);
    if !all_strings {
        let records = items
            .iter()
            .filter_map(|item| serde_json::from_value::<Example>(item.clone()).ok())
            .collect();
        return Some(records);
    }

    let mut grouped: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for pattern in items.iter().filter_map(Value::as_str) {
        let full_pattern = package_root.join(pattern);
        let Ok(paths) = glob(full_pattern.as_str()) else {
            continue;
        };
        for entry in paths.filter_map(|p| p.ok()) {
            let Ok(path) = Utf8PathBuf::from_path_buf(entry) else {
                continue;
            };
            let Ok(rel) = path.strip_prefix(package_root) else {
                continue;
            };
            let base = rel
                .parent()
                .map(|p| p.as_str().to_string())
                .unwrap_or_default();
            let file_name = rel.file_name().unwrap_or_default().to_string();
            grouped.entry(base).or_default().push(file_name);
        }
    }

    Some(
        grouped
            .into_iter()
            .map(|(base, mut files)| {
                files.sort();
                let name = base
                    .rsplit('/')
                    .next()
                    .unwrap_or(&base)
                    .to_string();
                Example { name, base, files }
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(path: &Utf8Path, contents: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn project_style_collects_include_and_src() {
        let tmp = tempfile::tempdir().unwrap();
        let root = Utf8PathBuf::from_path_buf(tmp.path().to_owned()).unwrap();
        let examples = root.join("examples");
        write(&examples.join("PlatformIO/hello/platformio.ini"), "");
        write(&examples.join("PlatformIO/hello/include/main.h"), "");
        write(&examples.join("PlatformIO/hello/src/main.cpp"), "");

        let found = discover(&examples).unwrap();
        let hello = found.iter().find(|e| e.name == "PlatformIO/hello").unwrap();
        assert_eq!(hello.base, "examples/PlatformIO/hello");
        assert!(hello.files.contains(&"platformio.ini".to_string()));
        assert!(hello.files.iter().any(|f| f.contains("main.h")));
        assert!(hello.files.iter().any(|f| f.contains("main.cpp")));
    }

    #[test]
    fn sketch_style_nested_under_directory_with_only_directories() {
        let tmp = tempfile::tempdir().unwrap();
        let root = Utf8PathBuf::from_path_buf(tmp.path().to_owned()).unwrap();
        let examples = root.join("examples");
        write(
            &examples.join("1. General/SomeSketchIno/SomeSketchIno.ino"),
            "",
        );

        let found = discover(&examples).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "1_General/SomeSketchIno");
        assert_eq!(found[0].files, vec!["SomeSketchIno.ino".to_string()]);
    }

    #[test]
    fn custom_style_collects_matching_extensions_non_recursively() {
        let tmp = tempfile::tempdir().unwrap();
        let root = Utf8PathBuf::from_path_buf(tmp.path().to_owned()).unwrap();
        let examples = root.join("examples");
        write(&examples.join("demo/demo.cpp"), "");
        write(&examples.join("demo/demo.h"), "");
        write(&examples.join("demo/util.h"), "");

        let found = discover(&examples).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "demo");
        assert_eq!(found[0].files.len(), 3);
    }

    #[test]
    fn root_leftover_files_group_into_examples_bucket() {
        let tmp = tempfile::tempdir().unwrap();
        let root = Utf8PathBuf::from_path_buf(tmp.path().to_owned()).unwrap();
        let examples = root.join("examples");
        write(&examples.join("root.c"), "");

        let found = discover(&examples).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Examples");
        assert_eq!(found[0].base, "examples");
        assert_eq!(found[0].files, vec!["root.c".to_string()]);
    }

    #[test]
    fn unrecognized_subtree_is_discarded() {
        let tmp = tempfile::tempdir().unwrap();
        let root = Utf8PathBuf::from_path_buf(tmp.path().to_owned()).unwrap();
        let examples = root.join("examples");
        write(&examples.join("invalid-example/hello.json"), "");

        let found = discover(&examples).unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn from_manifest_value_expands_glob_patterns() {
        let tmp = tempfile::tempdir().unwrap();
        let root = Utf8PathBuf::from_path_buf(tmp.path().to_owned()).unwrap();
        write(&root.join("examples/demo/demo.ino"), "");

        let value = serde_json::json!(["examples/demo/*.ino"]);
        let found = from_manifest_value(&value, &root).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].base, "examples/demo");
        assert_eq!(found[0].files, vec!["demo.ino".to_string()]);
    }

    #[test]
    fn from_manifest_value_passes_through_records() {
        let value = serde_json::json!([
            {"name": "JsonConfigFile", "base": "examples/JsonConfigFile", "files": ["JsonConfigFile.ino"]}
        ]);
        let found = from_manifest_value(&value, Utf8Path::new("/nonexistent")).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "JsonConfigFile");
    }
}
