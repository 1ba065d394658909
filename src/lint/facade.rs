//! Linter facade
//!
//! Wraps an external lint engine behind the [`LintEngine`] trait: discovery,
//! membership resolution, and configuration compilation happen here, then the
//! compiled blocks are handed to the engine as an authoritative override.
//! The engine's rule-evaluation algorithm is not this crate's concern.

use crate::compile::block::CompiledConfigBlock;
use crate::compile::engine::TsProjectOptions;
use crate::compile::prettier::{FormatterSettings, FormatterSettingsCache};
use crate::config::layer::{ConfigLayer, PrettierSetting};
use crate::error::LaminaError;
use crate::project::manifest::ProjectManifest;
use crate::project::membership;
use crate::types::{RuleId, Severity, TS_EXTENSIONS};
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

/// One violation reported by the lint engine
#[derive(Debug, Clone, PartialEq)]
pub struct LintMessage {
    pub rule_id: Option<RuleId>,
    pub severity: Severity,
    pub message: String,
    pub line: u32,
    pub column: u32,
}

/// Per-file violation records
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FileReport {
    pub file_path: PathBuf,
    pub messages: Vec<LintMessage>,
}

impl FileReport {
    pub fn error_count(&self) -> usize {
        self.messages
            .iter()
            .filter(|m| m.severity == Severity::Error)
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.messages
            .iter()
            .filter(|m| m.severity == Severity::Warn)
            .count()
    }
}

/// What the facade hands to the engine
#[derive(Debug)]
pub struct LintRequest<'a> {
    /// The compiled configuration, in cascade order
    pub override_config: &'a [CompiledConfigBlock],
    /// Forces the override to be authoritative, ignoring config files on disk
    pub override_config_file: bool,
    /// Files to analyze
    pub files: &'a [PathBuf],
}

/// The external lint engine seam
pub trait LintEngine {
    fn lint(&self, request: &LintRequest<'_>) -> Result<Vec<FileReport>, LaminaError>;
}

/// The linter facade: compiles configuration, then delegates analysis
pub struct Linter<E> {
    cwd: PathBuf,
    engine: E,
    formatter_cache: FormatterSettingsCache,
}

impl<E: LintEngine> Linter<E> {
    pub fn new(cwd: impl Into<PathBuf>, engine: E) -> Self {
        Linter {
            cwd: cwd.into(),
            engine,
            formatter_cache: FormatterSettingsCache::new(),
        }
    }

    /// A facade with known formatter settings, skipping filesystem resolution
    pub fn with_formatter_settings(
        cwd: impl Into<PathBuf>,
        engine: E,
        settings: FormatterSettings,
    ) -> Self {
        Linter {
            cwd: cwd.into(),
            engine,
            formatter_cache: FormatterSettingsCache::preloaded(settings),
        }
    }

    /// Compiles the project configuration plus `user_layers`
    pub fn compile(
        &mut self,
        user_layers: &[ConfigLayer],
    ) -> Result<Vec<CompiledConfigBlock>, LaminaError> {
        compile_with_cache(&self.cwd, user_layers, &mut self.formatter_cache)
    }

    /// Lints every recognized source file under the project root
    pub fn lint_files(
        &mut self,
        user_layers: &[ConfigLayer],
    ) -> Result<Vec<FileReport>, LaminaError> {
        let blocks = self.compile(user_layers)?;
        let files = discover_source_files(&self.cwd, &crate::types::JS_EXTENSIONS, true)?;

        self.engine.lint(&LintRequest {
            override_config: &blocks,
            override_config_file: true,
            files: &files,
        })
    }
}

/// Compiles the final configuration for a project
///
/// Layer order: the package-level settings block, then the config file's
/// entries, then `user_layers` — later layers win.
pub fn compile(
    cwd: &Path,
    user_layers: &[ConfigLayer],
) -> Result<Vec<CompiledConfigBlock>, LaminaError> {
    let mut cache = FormatterSettingsCache::new();
    compile_with_cache(cwd, user_layers, &mut cache)
}

/// [`compile`] with an explicit formatter-settings cache
///
/// The cache's lifetime is one compilation run. Both the formatter settings
/// and the project membership are fully resolved before the merge begins.
pub fn compile_with_cache(
    cwd: &Path,
    user_layers: &[ConfigLayer],
    formatter_cache: &mut FormatterSettingsCache,
) -> Result<Vec<CompiledConfigBlock>, LaminaError> {
    let resolved = crate::config::discovery::resolve_config(cwd, None)?;

    let mut layers: Vec<ConfigLayer> = Vec::new();
    layers.extend(resolved.package_layer);
    layers.extend(resolved.layers);
    layers.extend(user_layers.iter().cloned());

    let formatter = if wants_formatter_delegation(&layers) {
        formatter_cache.get_or_resolve(cwd)?.clone()
    } else {
        FormatterSettings::default()
    };

    let ts_project = resolve_ts_project(cwd)?;

    let blocks = crate::compile::engine::compile(
        crate::compile::presets::base_config(),
        &layers,
        &formatter,
        ts_project.as_ref(),
    )?;

    Ok(blocks)
}

/// Resolves project membership for explicit candidate files
pub fn resolve_project_membership(
    cwd: &Path,
    files: &[PathBuf],
) -> Result<membership::MembershipResult, LaminaError> {
    Ok(membership::resolve(cwd, files)?)
}

/// True when any layer turns formatter delegation on
///
/// Only then are the formatter's settings needed; resolving them is a
/// filesystem walk the common path should skip.
fn wants_formatter_delegation(layers: &[ConfigLayer]) -> bool {
    layers.iter().any(|layer| {
        matches!(
            layer,
            ConfigLayer::Rules(rule_layer)
                if rule_layer.prettier == Some(PrettierSetting::Enabled(true))
        )
    })
}

/// Builds the trailing parser block's project wiring from membership
fn resolve_ts_project(cwd: &Path) -> Result<Option<TsProjectOptions>, LaminaError> {
    let manifest_path = ProjectManifest::discover(cwd)?.map(|(_, path)| path);
    let ts_files = discover_source_files(cwd, &TS_EXTENSIONS, false)?;

    if ts_files.is_empty() {
        return Ok(manifest_path.map(|path| TsProjectOptions {
            manifest_path: Some(path),
            ..TsProjectOptions::default()
        }));
    }

    let result = membership::resolve(cwd, &ts_files)?;
    let allow_default_project = result
        .uncovered_files
        .iter()
        .map(|file| {
            file.strip_prefix(cwd)
                .unwrap_or(file)
                .to_string_lossy()
                .into_owned()
        })
        .collect();

    Ok(Some(TsProjectOptions {
        manifest_path,
        default_project: result.fallback_manifest_path,
        allow_default_project,
    }))
}

/// Gitignore-aware discovery of source files under `root`
///
/// `extensions` selects the statically-typed family alone or, with
/// `include_ts`, both families. Output is sorted for deterministic
/// compilation.
pub(crate) fn discover_source_files(
    root: &Path,
    extensions: &[&str],
    include_ts: bool,
) -> Result<Vec<PathBuf>, LaminaError> {
    let mut files = Vec::new();

    for entry in WalkBuilder::new(root).hidden(false).git_ignore(true).build() {
        let entry = entry.map_err(|e| LaminaError::Io(std::io::Error::other(e)))?;
        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }
        let path = entry.into_path();
        let matches = path.extension().and_then(|ext| ext.to_str()).is_some_and(|ext| {
            extensions.contains(&ext) || (include_ts && TS_EXTENSIONS.contains(&ext))
        });
        if matches {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}
