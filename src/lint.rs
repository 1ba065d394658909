//! Lint engine facade and report types

pub mod facade;

pub use facade::{
    FileReport, LintEngine, LintMessage, LintRequest, Linter, compile, compile_with_cache,
    resolve_project_membership,
};
