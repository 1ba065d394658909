//! Configuration file discovery
//!
//! Locates the nearest project-level configuration file and the optional
//! package-level settings block by walking upward from a starting directory.
//! Returns raw, unvalidated layers plus their source paths; interpretation
//! belongs to the merge engine.

use crate::config::layer::ConfigLayer;
use crate::error::ConfigError;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Config file names tried in each ancestor directory, in priority order
pub const CONFIG_FILE_NAMES: [&str; 3] = ["lamina.config.json", ".laminarc.json", "lamina.toml"];

/// The package manifest key holding the package-level settings block
const PACKAGE_KEY: &str = "lamina";

/// The raw configuration layers found for a project
#[derive(Debug, Default)]
pub struct ResolvedConfig {
    /// Layer from the `"lamina"` key of the nearest package.json, if any
    pub package_layer: Option<ConfigLayer>,
    /// Layers from the nearest config file, in declaration order
    pub layers: Vec<ConfigLayer>,
    /// Absolute path of the config file the layers came from
    pub config_path: Option<PathBuf>,
    /// Absolute path of the package.json the package layer came from
    pub package_path: Option<PathBuf>,
}

/// Finds the nearest config file and package-level settings block
///
/// Walks upward from `cwd`; `stop_dir` (inclusive) bounds the search.
/// Absence of both sources is a valid outcome, not an error.
pub fn resolve_config(cwd: &Path, stop_dir: Option<&Path>) -> Result<ResolvedConfig, ConfigError> {
    let mut resolved = ResolvedConfig::default();

    for dir in ancestors(cwd, stop_dir) {
        if resolved.config_path.is_none() {
            for name in CONFIG_FILE_NAMES {
                let candidate = dir.join(name);
                if candidate.is_file() {
                    resolved.layers = load_config_file(&candidate)?;
                    resolved.config_path = Some(candidate);
                    break;
                }
            }
        }

        if resolved.package_path.is_none() {
            let package = dir.join("package.json");
            if package.is_file() {
                if let Some(layer) = load_package_layer(&package)? {
                    resolved.package_layer = Some(layer);
                }
                resolved.package_path = Some(package);
            }
        }

        if resolved.config_path.is_some() && resolved.package_path.is_some() {
            break;
        }
    }

    Ok(resolved)
}

/// Parses a config file into its ordered layers
///
/// JSON files hold either a single layer or an array of layers. TOML files
/// hold either a single layer table or a `[[layers]]` array of tables.
pub fn load_config_file(path: &Path) -> Result<Vec<ConfigLayer>, ConfigError> {
    let content = fs::read_to_string(path)?;

    let value: Value = if path.extension().is_some_and(|ext| ext == "toml") {
        let table: toml::Value = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let mut value = serde_json::to_value(table).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        // TOML has no top-level arrays; unwrap the `layers` table array
        if let Value::Object(ref mut map) = value
            && map.len() == 1
            && map.contains_key("layers")
        {
            value = map.remove("layers").unwrap_or(Value::Null);
        }
        value
    } else {
        serde_json::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
    };

    layers_from_value(value).map_err(|message| ConfigError::Parse {
        path: path.to_path_buf(),
        message,
    })
}

/// Reads the package-level settings block from a package.json
fn load_package_layer(path: &Path) -> Result<Option<ConfigLayer>, ConfigError> {
    let content = fs::read_to_string(path)?;
    let manifest: Value = serde_json::from_str(&content).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    match manifest.get(PACKAGE_KEY) {
        None | Some(Value::Null) => Ok(None),
        Some(block) => ConfigLayer::from_value(block.clone())
            .map(Some)
            .map_err(|message| ConfigError::Parse {
                path: path.to_path_buf(),
                message,
            }),
    }
}

/// Coerces a raw config document into an ordered layer list
fn layers_from_value(value: Value) -> Result<Vec<ConfigLayer>, String> {
    match value {
        Value::Array(items) => items.into_iter().map(ConfigLayer::from_value).collect(),
        other => Ok(vec![ConfigLayer::from_value(other)?]),
    }
}

/// Ancestor directories of `start`, bounded by `stop_dir` (inclusive)
fn ancestors<'a>(start: &'a Path, stop_dir: Option<&'a Path>) -> impl Iterator<Item = &'a Path> {
    let mut done = false;
    start.ancestors().take_while(move |dir| {
        if done {
            return false;
        }
        if let Some(stop) = stop_dir
            && *dir == stop
        {
            done = true;
        }
        true
    })
}
