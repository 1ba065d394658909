//! Integration tests for configuration discovery
//!
//! Verifies the upward search order, the stop directory, the package-level
//! settings block, and both config file formats.

mod common;

use common::write_file;
use lamina::config::{ConfigLayer, resolve_config};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_nothing_to_discover() {
    let temp = TempDir::new().unwrap();
    let resolved = resolve_config(temp.path(), Some(temp.path())).unwrap();

    assert!(resolved.layers.is_empty());
    assert!(resolved.package_layer.is_none());
    assert!(resolved.config_path.is_none());
}

#[test]
fn test_json_config_with_mixed_layer_shapes() {
    let temp = TempDir::new().unwrap();
    write_file(
        temp.path(),
        "lamina.config.json",
        r#"[
            "react",
            {"ignores": ["dist/**"]},
            {"files": ["src/**"], "space": 2}
        ]"#,
    );

    let resolved = resolve_config(temp.path(), Some(temp.path())).unwrap();
    assert_eq!(resolved.layers.len(), 3);
    assert!(matches!(resolved.layers[0], ConfigLayer::Preset(_)));
    assert!(matches!(resolved.layers[1], ConfigLayer::GlobalIgnores(_)));
    assert!(matches!(resolved.layers[2], ConfigLayer::Rules(_)));
}

#[test]
fn test_toml_config_single_layer() {
    let temp = TempDir::new().unwrap();
    write_file(temp.path(), "lamina.toml", "space = 4\nsemicolon = false\n");

    let resolved = resolve_config(temp.path(), Some(temp.path())).unwrap();
    assert_eq!(resolved.layers.len(), 1);
    match &resolved.layers[0] {
        ConfigLayer::Rules(layer) => {
            assert_eq!(layer.semicolon, Some(false));
        }
        other => panic!("expected a rule layer, got {other:?}"),
    }
}

#[test]
fn test_toml_config_layer_array() {
    let temp = TempDir::new().unwrap();
    write_file(
        temp.path(),
        "lamina.toml",
        "[[layers]]\nfiles = [\"src/**\"]\nspace = true\n\n[[layers]]\nprettier = \"compat\"\n",
    );

    let resolved = resolve_config(temp.path(), Some(temp.path())).unwrap();
    assert_eq!(resolved.layers.len(), 2);
}

#[test]
fn test_nearest_config_wins() {
    let temp = TempDir::new().unwrap();
    let nested = temp.path().join("packages").join("app");
    fs::create_dir_all(&nested).unwrap();
    write_file(temp.path(), "lamina.config.json", r#"[{"space": true}]"#);
    write_file(&nested, "lamina.config.json", r#"[{"space": false}]"#);

    let resolved = resolve_config(&nested, Some(temp.path())).unwrap();
    assert_eq!(
        resolved.config_path,
        Some(nested.join("lamina.config.json"))
    );
}

#[test]
fn test_package_block_and_config_file_from_different_levels() {
    let temp = TempDir::new().unwrap();
    let nested = temp.path().join("app");
    fs::create_dir_all(&nested).unwrap();
    write_file(
        temp.path(),
        "package.json",
        r#"{"name": "root", "lamina": {"semicolon": true}}"#,
    );
    write_file(&nested, "lamina.config.json", r#"[{"space": true}]"#);

    let resolved = resolve_config(&nested, Some(temp.path())).unwrap();
    assert!(resolved.package_layer.is_some());
    assert_eq!(
        resolved.config_path,
        Some(nested.join("lamina.config.json"))
    );
    assert_eq!(resolved.package_path, Some(temp.path().join("package.json")));
}

#[test]
fn test_package_json_without_settings_block() {
    let temp = TempDir::new().unwrap();
    write_file(temp.path(), "package.json", r#"{"name": "plain"}"#);

    let resolved = resolve_config(temp.path(), Some(temp.path())).unwrap();
    assert!(resolved.package_layer.is_none());
    assert_eq!(resolved.package_path, Some(temp.path().join("package.json")));
}

#[test]
fn test_unknown_keys_tolerated_in_discovered_layers() {
    let temp = TempDir::new().unwrap();
    write_file(
        temp.path(),
        "lamina.config.json",
        r#"[{"space": true, "experimentalFeature": {"nested": [1, 2]}}]"#,
    );

    let resolved = resolve_config(temp.path(), Some(temp.path())).unwrap();
    assert_eq!(resolved.layers.len(), 1);
}
