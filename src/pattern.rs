#![forbid(unsafe_code)]

//! Glob-style inclusion/exclusion matching against a set of path patterns
//!
//! Matching is contains-style: a relative pattern matches any portion of the
//! candidate path, so `src/**` covers both `src/a.ts` and
//! `/home/user/project/src/a.ts`. Project manifests and ignore lists are
//! written against project-relative paths while candidates usually arrive
//! absolute; anchored matching would silently miss everything.

use crate::types::GlobPattern;
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while building a matcher
#[derive(Debug, Error)]
pub enum PatternError {
    #[error("Invalid glob pattern '{pattern}': {source}")]
    InvalidGlob {
        pattern: String,
        source: globset::Error,
    },
}

/// A compiled set of glob patterns with contains-style semantics
#[derive(Debug)]
pub struct PatternMatcher {
    set: GlobSet,
    is_empty: bool,
}

impl PatternMatcher {
    /// Compiles a matcher from patterns
    ///
    /// Each pattern is expanded into its anchored and unanchored variants so
    /// that `src` also covers `src/deep/file.ts` and absolute candidates.
    pub fn new(patterns: &[GlobPattern]) -> Result<Self, PatternError> {
        let mut builder = GlobSetBuilder::new();

        for pattern in patterns {
            for variant in Self::variants(pattern.as_str()) {
                let glob = GlobBuilder::new(&variant)
                    .literal_separator(true)
                    .build()
                    .map_err(|e| PatternError::InvalidGlob {
                        pattern: pattern.as_str().to_string(),
                        source: e,
                    })?;
                builder.add(glob);
            }
        }

        let set = builder.build().map_err(|e| PatternError::InvalidGlob {
            pattern: "<globset>".to_string(),
            source: e,
        })?;

        Ok(Self {
            set,
            is_empty: patterns.is_empty(),
        })
    }

    /// Expands a pattern into the variants needed for contains-style matching
    fn variants(pattern: &str) -> Vec<String> {
        let trimmed = pattern.strip_prefix("./").unwrap_or(pattern);
        let mut variants = vec![trimmed.to_string()];

        if !trimmed.ends_with("/**") {
            variants.push(format!("{trimmed}/**"));
        }

        // Absolute and already-unanchored patterns stay as written
        if !trimmed.starts_with('/') && !trimmed.starts_with("**") {
            variants.push(format!("**/{trimmed}"));
            if !trimmed.ends_with("/**") {
                variants.push(format!("**/{trimmed}/**"));
            }
        }

        variants
    }

    /// Tests whether any pattern covers the candidate path
    ///
    /// An empty pattern set matches nothing.
    pub fn contains(&self, path: impl AsRef<Path>) -> bool {
        if self.is_empty {
            return false;
        }

        let normalized = Self::normalize(path.as_ref());
        self.set.is_match(Path::new(&normalized))
    }

    /// Normalizes a candidate path for matching
    ///
    /// Backslashes become forward slashes and a leading `./` is dropped.
    fn normalize(path: &Path) -> String {
        let mut normalized = path.to_string_lossy().replace('\\', "/");
        if let Some(stripped) = normalized.strip_prefix("./") {
            normalized = stripped.to_string();
        }
        normalized
    }
}
