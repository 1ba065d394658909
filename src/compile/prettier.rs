//! External formatter settings: model, resolver, and per-run cache
//!
//! The formatter's own configuration (`.prettierrc`, `package.json#prettier`)
//! and any `.editorconfig` files underneath it are resolved into one
//! [`FormatterSettings`] value. The merge engine treats that value as an
//! explicit input: it is resolved before compilation begins and memoized in a
//! caller-scoped [`FormatterSettingsCache`] whose lifetime is one compilation
//! run, so concurrent compilations for different projects stay isolated.

use crate::error::ConfigError;
use crate::pattern::PatternMatcher;
use crate::types::GlobPattern;
use serde::de::{self, Deserializer};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

/// Formatter config file names tried in each ancestor, in priority order
const FORMATTER_FILE_NAMES: [&str; 2] = [".prettierrc", ".prettierrc.json"];

/// The external formatter's resolved preferences
///
/// The three settings the merge engine validates are typed; every other key
/// is preserved verbatim so the overlay step can forward it untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormatterSettings {
    pub semi: Option<bool>,
    pub use_tabs: Option<bool>,
    pub tab_width: Option<u8>,
    /// All other formatter options, preserved for the overlay
    pub rest: Map<String, Value>,
}

impl FormatterSettings {
    /// True when no source supplied any setting
    pub fn is_empty(&self) -> bool {
        self.semi.is_none() && self.use_tabs.is_none() && self.tab_width.is_none() && self.rest.is_empty()
    }

    /// Applies these settings on top of `options`, last-write-wins
    pub fn overlay_onto(&self, options: &mut Map<String, Value>) {
        if let Some(semi) = self.semi {
            options.insert("semi".to_string(), Value::Bool(semi));
        }
        if let Some(use_tabs) = self.use_tabs {
            options.insert("useTabs".to_string(), Value::Bool(use_tabs));
        }
        if let Some(tab_width) = self.tab_width {
            options.insert("tabWidth".to_string(), Value::from(tab_width));
        }
        for (key, value) in &self.rest {
            options.insert(key.clone(), value.clone());
        }
    }

    /// Merges `other` underneath: only keys unset here are taken
    fn merge_defaults(&mut self, other: FormatterSettings) {
        self.semi = self.semi.or(other.semi);
        self.use_tabs = self.use_tabs.or(other.use_tabs);
        self.tab_width = self.tab_width.or(other.tab_width);
        for (key, value) in other.rest {
            self.rest.entry(key).or_insert(value);
        }
    }
}

impl Serialize for FormatterSettings {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        if let Some(semi) = self.semi {
            map.serialize_entry("semi", &semi)?;
        }
        if let Some(use_tabs) = self.use_tabs {
            map.serialize_entry("useTabs", &use_tabs)?;
        }
        if let Some(tab_width) = self.tab_width {
            map.serialize_entry("tabWidth", &tab_width)?;
        }
        for (key, value) in &self.rest {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for FormatterSettings {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        let Value::Object(map) = value else {
            return Err(de::Error::custom("formatter settings must be an object"));
        };

        let mut settings = FormatterSettings::default();
        for (key, value) in map {
            match key.as_str() {
                "semi" => settings.semi = value.as_bool(),
                "useTabs" => settings.use_tabs = value.as_bool(),
                "tabWidth" => {
                    settings.tab_width = value.as_u64().filter(|n| *n <= u8::MAX as u64).map(|n| n as u8);
                }
                _ => {
                    settings.rest.insert(key, value);
                }
            }
        }
        Ok(settings)
    }
}

/// Resolves the formatter's settings for a project directory
///
/// The nearest formatter config file (or `package.json#prettier` block) wins;
/// `.editorconfig` entries underneath supply defaults for unset keys, honoring
/// nested overrides by upward walk. Absence of all sources yields the empty
/// settings.
pub fn resolve_formatter_settings(cwd: &Path) -> Result<FormatterSettings, ConfigError> {
    let mut settings = find_formatter_config(cwd)?.unwrap_or_default();

    let mut editorconfig = FormatterSettings::default();
    resolve_editorconfig(cwd, &mut editorconfig)?;
    settings.merge_defaults(editorconfig);

    Ok(settings)
}

/// Caller-scoped memo for the resolved formatter settings
///
/// Resolution walks the filesystem, so it runs at most once per compilation
/// run. Construct one per run; never share across projects.
#[derive(Debug, Default)]
pub struct FormatterSettingsCache {
    settings: Option<FormatterSettings>,
}

impl FormatterSettingsCache {
    pub fn new() -> Self {
        FormatterSettingsCache::default()
    }

    /// A cache primed with known settings, for tests and explicit input
    pub fn preloaded(settings: FormatterSettings) -> Self {
        FormatterSettingsCache {
            settings: Some(settings),
        }
    }

    /// Returns the memoized settings, resolving on first use
    pub fn get_or_resolve(&mut self, cwd: &Path) -> Result<&FormatterSettings, ConfigError> {
        if self.settings.is_none() {
            self.settings = Some(resolve_formatter_settings(cwd)?);
        }
        Ok(self.settings.as_ref().expect("just resolved"))
    }
}

/// Finds the nearest formatter config by upward walk
fn find_formatter_config(cwd: &Path) -> Result<Option<FormatterSettings>, ConfigError> {
    for dir in cwd.ancestors() {
        for name in FORMATTER_FILE_NAMES {
            let candidate = dir.join(name);
            if candidate.is_file() {
                let content = fs::read_to_string(&candidate)?;
                let settings =
                    serde_json::from_str(&content).map_err(|e| ConfigError::Parse {
                        path: candidate.clone(),
                        message: e.to_string(),
                    })?;
                return Ok(Some(settings));
            }
        }

        let package = dir.join("package.json");
        if package.is_file() {
            let content = fs::read_to_string(&package)?;
            let manifest: Value =
                serde_json::from_str(&content).map_err(|e| ConfigError::Parse {
                    path: package.clone(),
                    message: e.to_string(),
                })?;
            if let Some(block) = manifest.get("prettier")
                && !block.is_null()
            {
                let settings = serde_json::from_value(block.clone()).map_err(|e| {
                    ConfigError::Parse {
                        path: package.clone(),
                        message: e.to_string(),
                    }
                })?;
                return Ok(Some(settings));
            }
        }
    }

    Ok(None)
}

/// Folds `.editorconfig` files into `settings`, nearest file winning
///
/// Sections are matched against a probe source file in `cwd`, the same way
/// the formatter resolves editor config for the file it is about to format.
/// A `root = true` file stops the upward walk.
fn resolve_editorconfig(cwd: &Path, settings: &mut FormatterSettings) -> Result<(), ConfigError> {
    let probe = cwd.join("lamina.config.js");
    let mut layers = Vec::new();

    for dir in cwd.ancestors() {
        let candidate = dir.join(".editorconfig");
        if candidate.is_file() {
            let content = fs::read_to_string(&candidate)?;
            let parsed = parse_editorconfig(&content, &probe)?;
            let is_root = parsed.1;
            layers.push(parsed.0);
            if is_root {
                break;
            }
        }
    }

    // Farthest first, so nearer files override
    for layer in layers.into_iter().rev() {
        let mut merged = layer;
        std::mem::swap(settings, &mut merged);
        settings.merge_defaults(merged);
    }

    Ok(())
}

/// Parses one `.editorconfig`, keeping only entries whose section matches
/// the probe path; returns the settings and whether the file is a root
fn parse_editorconfig(
    content: &str,
    probe: &Path,
) -> Result<(FormatterSettings, bool), ConfigError> {
    let mut settings = FormatterSettings::default();
    let mut is_root = false;
    let mut section_matches = true; // preamble applies everywhere

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        if let Some(header) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            let matcher = PatternMatcher::new(&[GlobPattern::new(header)]).map_err(|e| {
                ConfigError::InvalidGlob {
                    pattern: header.to_string(),
                    source: match e {
                        crate::pattern::PatternError::InvalidGlob { source, .. } => source,
                    },
                }
            })?;
            section_matches = header == "*" || matcher.contains(probe);
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let (key, value) = (key.trim().to_ascii_lowercase(), value.trim());

        if key == "root" {
            is_root = value.eq_ignore_ascii_case("true");
            continue;
        }

        if !section_matches {
            continue;
        }

        match key.as_str() {
            "indent_style" => settings.use_tabs = Some(value.eq_ignore_ascii_case("tab")),
            "indent_size" | "tab_width" => {
                if let Ok(width) = value.parse::<u8>() {
                    settings.tab_width = Some(width);
                }
            }
            "max_line_length" => {
                if let Ok(width) = value.parse::<u16>() {
                    settings
                        .rest
                        .insert("printWidth".to_string(), Value::from(width));
                }
            }
            _ => {}
        }
    }

    Ok((settings, is_root))
}
