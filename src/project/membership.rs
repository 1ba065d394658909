//! Project membership resolution
//!
//! Partitions candidate statically-typed files by whether the discovered
//! project manifest already covers them, and synthesizes a file-list-exact
//! fallback manifest for the remainder so type-aware analysis succeeds for
//! every file. The fallback deliberately carries no globs: its only purpose
//! is to let the type-checker accept files the real manifest does not claim,
//! without widening scope.
//!
//! Exclude patterns take precedence over includes, and apply to the union of
//! `include` and `files`, matching the historical behavior of applying
//! `exclude` even against literal `files` entries.

use crate::error::ResolveError;
use crate::pattern::{PatternError, PatternMatcher};
use crate::project::manifest::{
    ProjectManifest, default_compiler_options, fallback_manifest_path,
};
use crate::types::GlobPattern;
use rayon::prelude::*;
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};

/// The outcome of a membership resolution
#[derive(Debug, Clone, PartialEq)]
pub struct MembershipResult {
    /// Files the manifest already enumerates, in input order
    pub covered_files: Vec<PathBuf>,
    /// The complement, in input order
    pub uncovered_files: Vec<PathBuf>,
    /// The synthesized fallback manifest, written only when needed
    pub fallback_manifest_path: Option<PathBuf>,
}

/// Partitions `candidate_files` against the nearest project manifest
///
/// Re-resolving after the manifest changes re-runs the full partition;
/// no membership is cached across calls.
pub fn resolve(cwd: &Path, candidate_files: &[PathBuf]) -> Result<MembershipResult, ResolveError> {
    let discovered = ProjectManifest::discover(cwd)?;

    let coverage: Vec<bool> = match &discovered {
        None => vec![false; candidate_files.len()],
        Some((manifest, manifest_path)) => {
            let root = manifest_path.parent().unwrap_or(cwd).to_path_buf();
            let checker = CoverageChecker::new(manifest)?;
            candidate_files
                .par_iter()
                .map(|file| checker.covers(&relative_to(file, &root)))
                .collect()
        }
    };

    let mut covered_files = Vec::new();
    let mut uncovered_files = Vec::new();
    for (file, covered) in candidate_files.iter().zip(&coverage) {
        if *covered {
            covered_files.push(file.clone());
        } else {
            uncovered_files.push(file.clone());
        }
    }

    let fallback_manifest_path = if uncovered_files.is_empty() {
        None
    } else {
        let compiler_options = discovered
            .as_ref()
            .map(|(manifest, _)| manifest.compiler_options.clone())
            .filter(|options| !options.is_empty())
            .unwrap_or_else(default_compiler_options);
        Some(write_fallback(cwd, &compiler_options, &uncovered_files)?)
    };

    Ok(MembershipResult {
        covered_files,
        uncovered_files,
        fallback_manifest_path,
    })
}

/// Compiled matchers for one manifest's include/files/exclude sets
struct CoverageChecker {
    implicit_include: bool,
    include_set: PatternMatcher,
    exclude_set: PatternMatcher,
}

impl CoverageChecker {
    fn new(manifest: &ProjectManifest) -> Result<Self, ResolveError> {
        let mut include_patterns: Vec<GlobPattern> = Vec::new();
        for pattern in manifest.include.iter().flatten() {
            include_patterns.push(GlobPattern::new(pattern.clone()));
        }
        for file in manifest.files.iter().flatten() {
            include_patterns.push(GlobPattern::new(file.clone()));
        }
        let exclude_patterns: Vec<GlobPattern> = manifest
            .exclude
            .iter()
            .flatten()
            .map(|pattern| GlobPattern::new(pattern.clone()))
            .collect();

        Ok(CoverageChecker {
            implicit_include: manifest.is_implicit_include(),
            include_set: PatternMatcher::new(&include_patterns).map_err(into_resolve_error)?,
            exclude_set: PatternMatcher::new(&exclude_patterns).map_err(into_resolve_error)?,
        })
    }

    /// Reproduces the type-checker's own membership semantics
    fn covers(&self, file: &Path) -> bool {
        if self.exclude_set.contains(file) {
            return false;
        }
        if self.implicit_include {
            return true;
        }
        self.include_set.contains(file)
    }
}

/// Writes the fallback manifest, file-list-exact, globs cleared
fn write_fallback(
    cwd: &Path,
    compiler_options: &serde_json::Map<String, serde_json::Value>,
    uncovered_files: &[PathBuf],
) -> Result<PathBuf, ResolveError> {
    let path = fallback_manifest_path(cwd);
    let files: Vec<String> = uncovered_files
        .iter()
        .map(|file| file.to_string_lossy().into_owned())
        .collect();

    let manifest = json!({
        "compilerOptions": compiler_options,
        "files": files,
        "include": [],
        "exclude": [],
    });
    let content = serde_json::to_string_pretty(&manifest).expect("manifest JSON is serializable");

    let write = || -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, content.as_bytes())
    };
    write().map_err(|source| ResolveError::FallbackWrite {
        path: path.clone(),
        source,
    })?;

    Ok(path)
}

/// A candidate path as the manifest's directory sees it
fn relative_to(file: &Path, root: &Path) -> PathBuf {
    file.strip_prefix(root).unwrap_or(file).to_path_buf()
}

fn into_resolve_error(err: PatternError) -> ResolveError {
    match err {
        PatternError::InvalidGlob { pattern, source } => {
            ResolveError::InvalidGlob { pattern, source }
        }
    }
}
