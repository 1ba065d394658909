//! Error types for Lamina
//!
//! This module defines the error types used throughout Lamina, following
//! a hierarchical structure with specific error variants for different
//! error categories.
//!
//! Configuration conflicts are fatal and abort compilation: the engine
//! never guesses which side of a contradictory style setting wins.

use std::path::PathBuf;

/// Configuration-related errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The formatter's `semi` setting contradicts an explicit `semicolon` option
    #[error(
        "The Prettier config `semi` is {formatter_semi} while `semicolon` is {semicolon}, \
         also check your .editorconfig for inconsistencies"
    )]
    SemicolonConflict {
        semicolon: bool,
        formatter_semi: bool,
    },

    /// The formatter's `useTabs` setting contradicts the `space` option
    #[error(
        "The Prettier config `useTabs` is {formatter_use_tabs} while `space` is {space}, \
         also check your .editorconfig for inconsistencies"
    )]
    IndentStyleConflict {
        space: String,
        formatter_use_tabs: bool,
    },

    /// The formatter's `tabWidth` contradicts a numeric `space` option
    #[error(
        "The Prettier config `tabWidth` is {formatter_tab_width} while `space` is {space}, \
         also check your .editorconfig for inconsistencies"
    )]
    IndentWidthConflict {
        space: u8,
        formatter_tab_width: u8,
    },

    /// A bare preset name that no built-in preset answers to
    #[error("Unknown preset '{0}'. Known presets: recommended, prettier-compat, react")]
    UnknownPreset(String),

    /// Invalid glob pattern in a layer
    #[error("Invalid glob pattern '{pattern}': {source}")]
    InvalidGlob {
        pattern: String,
        source: globset::Error,
    },

    /// Invalid configuration syntax
    #[error("Invalid configuration syntax in {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Project-membership resolution errors
///
/// A missing project manifest is a normal input state, not an error;
/// these variants cover malformed manifests and fallback-write failures.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// The discovered manifest could not be parsed
    #[error("Malformed project manifest {path}: {message}")]
    Manifest { path: PathBuf, message: String },

    /// Invalid glob pattern in the manifest
    #[error("Invalid glob pattern '{pattern}' in project manifest: {source}")]
    InvalidGlob {
        pattern: String,
        source: globset::Error,
    },

    /// Writing the fallback manifest failed
    #[error("Failed to write fallback manifest {path}: {source}")]
    FallbackWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Top-level error type for Lamina
#[derive(Debug, thiserror::Error)]
pub enum LaminaError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Project-membership resolution error
    #[error("Project resolution error: {0}")]
    Resolve(#[from] ResolveError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_messages_name_both_sides() {
        let err = ConfigError::SemicolonConflict {
            semicolon: true,
            formatter_semi: false,
        };
        let message = err.to_string();
        assert!(message.contains("`semi` is false"));
        assert!(message.contains("`semicolon` is true"));
    }

    #[test]
    fn test_unknown_preset_message() {
        let err = ConfigError::UnknownPreset("strict".to_string());
        assert!(err.to_string().contains("Unknown preset 'strict'"));
    }

    #[test]
    fn test_top_level_conversion() {
        let err: LaminaError = ConfigError::UnknownPreset("x".to_string()).into();
        assert!(matches!(err, LaminaError::Config(_)));
    }
}
