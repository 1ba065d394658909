//! Type-checker project manifests (`tsconfig.json`)
//!
//! Loads and discovers manifests, tolerating the comment and trailing-comma
//! extensions the type-checker itself accepts. Compiler options are opaque:
//! they are preserved verbatim for the fallback manifest, never interpreted.

use crate::error::ResolveError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::fs;
use std::path::{Path, PathBuf};

/// The manifest file name searched for in each ancestor directory
pub const MANIFEST_FILE_NAME: &str = "tsconfig.json";

/// Cache directory name under `node_modules/.cache`
pub const CACHE_DIR_NAME: &str = "lamina";

/// A parsed project manifest
///
/// If neither `include` nor `files` is present, the manifest implicitly
/// includes everything not excluded; the resolver reproduces that default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectManifest {
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub compiler_options: Map<String, Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude: Option<Vec<String>>,
}

impl ProjectManifest {
    /// Loads a manifest from disk
    pub fn load(path: &Path) -> Result<Self, ResolveError> {
        let content = fs::read_to_string(path)?;
        let stripped = strip_jsonc(&content);
        serde_json::from_str(&stripped).map_err(|e| ResolveError::Manifest {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Finds the nearest manifest by walking upward from `cwd`
    ///
    /// Absence is a valid outcome, not an error.
    pub fn discover(cwd: &Path) -> Result<Option<(ProjectManifest, PathBuf)>, ResolveError> {
        for dir in cwd.ancestors() {
            let candidate = dir.join(MANIFEST_FILE_NAME);
            if candidate.is_file() {
                let manifest = ProjectManifest::load(&candidate)?;
                return Ok(Some((manifest, candidate)));
            }
        }
        Ok(None)
    }

    /// True when the manifest declares neither `include` nor `files`
    pub fn is_implicit_include(&self) -> bool {
        self.include.is_none() && self.files.is_none()
    }
}

/// Conservative compiler options for projects without a manifest
pub fn default_compiler_options() -> Map<String, Value> {
    let Value::Object(map) = json!({
        "target": "es2018",
        "strict": true,
        "noImplicitReturns": true,
        "noUnusedLocals": true,
        "noUnusedParameters": true,
        "noFallthroughCasesInSwitch": true,
    }) else {
        unreachable!("literal is an object")
    };
    map
}

/// Deterministic location of the synthesized fallback manifest
pub fn fallback_manifest_path(cwd: &Path) -> PathBuf {
    cwd.join("node_modules")
        .join(".cache")
        .join(CACHE_DIR_NAME)
        .join("tsconfig.lamina.json")
}

/// Strips `//` and `/* */` comments and trailing commas from JSONC text
///
/// String literals are left untouched, including escapes. Comments are
/// removed first so a comma separated from its closer by a comment still
/// counts as trailing.
fn strip_jsonc(content: &str) -> String {
    drop_trailing_commas(&strip_comments(content))
}

fn strip_comments(content: &str) -> String {
    let mut stripped = String::with_capacity(content.len());
    let mut chars = content.chars().peekable();
    let mut in_string = false;

    while let Some(c) = chars.next() {
        if in_string {
            stripped.push(c);
            if c == '\\'
                && let Some(escaped) = chars.next()
            {
                stripped.push(escaped);
                continue;
            }
            if c == '"' {
                in_string = false;
            }
            continue;
        }

        match c {
            '"' => {
                in_string = true;
                stripped.push(c);
            }
            '/' if chars.peek() == Some(&'/') => {
                for skipped in chars.by_ref() {
                    if skipped == '\n' {
                        stripped.push('\n');
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut prev = '\0';
                for skipped in chars.by_ref() {
                    if prev == '*' && skipped == '/' {
                        break;
                    }
                    prev = skipped;
                }
            }
            _ => stripped.push(c),
        }
    }

    stripped
}

fn drop_trailing_commas(content: &str) -> String {
    let mut stripped = String::with_capacity(content.len());
    let mut chars = content.chars().peekable();
    let mut in_string = false;

    while let Some(c) = chars.next() {
        if in_string {
            stripped.push(c);
            if c == '\\'
                && let Some(escaped) = chars.next()
            {
                stripped.push(escaped);
                continue;
            }
            if c == '"' {
                in_string = false;
            }
            continue;
        }

        match c {
            '"' => {
                in_string = true;
                stripped.push(c);
            }
            ',' => {
                let next_significant = chars.clone().find(|candidate| !candidate.is_whitespace());
                if !matches!(next_significant, Some('}') | Some(']')) {
                    stripped.push(c);
                }
            }
            _ => stripped.push(c),
        }
    }

    stripped
}
