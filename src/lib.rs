#![forbid(unsafe_code)]

//! Lamina: layered lint-configuration compiler
//!
//! Lamina computes, for a project, the exact set of lint rules and parser
//! settings that apply to each source file. It merges a built-in base ruleset
//! with ordered user-supplied configuration layers, and reconciles which
//! statically-typed files are covered by the project's type-checker manifest
//! versus which need a synthesized fallback.

pub mod cli;
pub mod compile;
pub mod config;
pub mod error;
pub mod lint;
pub mod output;
pub mod pattern;
pub mod project;
pub mod types;

// Re-export error types for convenient access
pub use error::{ConfigError, LaminaError, ResolveError};

// Re-export core domain types for convenient access
pub use types::{GlobPattern, RuleFamily, RuleId, RuleSetting, Severity};

// Re-export the two public entry points
pub use compile::{CompiledConfigBlock, FormatterSettings, FormatterSettingsCache};
pub use config::{ConfigLayer, RuleLayer};
pub use lint::{Linter, compile, resolve_project_membership};
pub use project::{MembershipResult, ProjectManifest};
