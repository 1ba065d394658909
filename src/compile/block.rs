//! Compiled configuration blocks
//!
//! A `CompiledConfigBlock` is one element of the merge engine's ordered
//! output. Ordering is semantically significant: when multiple blocks match
//! a file, the last matching block's rule values win per rule key, mirroring
//! the lint engine's own cascade. Blocks are created once per compilation
//! and never mutated after being appended to the output list.

use crate::types::{GlobPattern, RuleId, RuleSetting};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One fully-resolved, ordered configuration fragment
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompiledConfigBlock {
    /// File scope; absent only on ignore-only blocks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<GlobPattern>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ignores: Option<Vec<GlobPattern>>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub rules: IndexMap<RuleId, RuleSetting>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugins: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language_options: Option<Value>,
}

impl CompiledConfigBlock {
    /// An ignore-only block (the global-ignore special case)
    pub fn ignores_only(ignores: Vec<GlobPattern>) -> Self {
        CompiledConfigBlock {
            ignores: Some(ignores),
            ..CompiledConfigBlock::default()
        }
    }

    /// A block scoped to `files` with the given rules
    pub fn scoped(files: Vec<GlobPattern>, rules: IndexMap<RuleId, RuleSetting>) -> Self {
        CompiledConfigBlock {
            files: Some(files),
            rules,
            ..CompiledConfigBlock::default()
        }
    }

    /// Inserts a rule, replacing any earlier value for the same key
    pub fn set_rule(&mut self, id: RuleId, setting: RuleSetting) {
        self.rules.insert(id, setting);
    }
}
