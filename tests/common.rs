//! Test utilities for lamina integration tests

use lamina::CompiledConfigBlock;
use lamina::pattern::PatternMatcher;
use lamina::types::{RuleId, RuleSetting};
use std::fs;
use std::path::Path;

/// Result type alias for tests
pub type TestResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

/// Write a file, creating parent directories as needed
pub fn write_file(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

/// Resolve a rule's effective setting for one file through the cascade
///
/// Walks the blocks in order; the last matching block that sets the rule
/// wins, mirroring the lint engine's own semantics.
pub fn effective_rule(
    blocks: &[CompiledConfigBlock],
    file: &str,
    rule: &str,
) -> Option<RuleSetting> {
    let rule_id = RuleId::new(rule).unwrap();
    let mut effective = None;

    for block in blocks {
        let Some(files) = &block.files else {
            continue;
        };
        let matcher = PatternMatcher::new(files).unwrap();
        if !matcher.contains(file) {
            continue;
        }
        if let Some(ignores) = &block.ignores {
            let ignore_matcher = PatternMatcher::new(ignores).unwrap();
            if ignore_matcher.contains(file) {
                continue;
            }
        }
        if let Some(setting) = block.rules.get(&rule_id) {
            effective = Some(setting.clone());
        }
    }

    effective
}
