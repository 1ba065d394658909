//! Built-in configuration presets
//!
//! The base ruleset, the formatter-compatibility disable set, and the React
//! overlay live here as precomputed blocks. The merge engine appends them
//! verbatim; user layers appended later override them per the cascade.

use crate::compile::block::CompiledConfigBlock;
use crate::types::{ALL_FILES_GLOB, GlobPattern, RuleId, RuleSetting, TS_FILES_GLOB};
use indexmap::IndexMap;
use serde_json::{Value, json};

/// Patterns ignored in every project unless a layer says otherwise
pub const DEFAULT_IGNORES: [&str; 9] = [
    "**/node_modules/**",
    "**/bower_components/**",
    "flow-typed/**",
    "coverage/**",
    "{tmp,temp}/**",
    "**/*.min.js",
    "vendor/**",
    "dist/**",
    "tap-snapshots/*.{cjs,js}",
];

/// Names answering to bare preset layers
pub const PRESET_NAMES: [&str; 3] = ["recommended", "prettier-compat", "react"];

/// The base ruleset: default ignores, the dynamic-family block, and the
/// static-family overrides
pub fn base_config() -> Vec<CompiledConfigBlock> {
    vec![
        CompiledConfigBlock::ignores_only(
            DEFAULT_IGNORES.iter().map(|p| GlobPattern::new(*p)).collect(),
        ),
        CompiledConfigBlock {
            files: Some(vec![GlobPattern::new(ALL_FILES_GLOB)]),
            plugins: Some(json!({
                "unicorn": "eslint-plugin-unicorn",
                "import": "eslint-plugin-import",
                "n": "eslint-plugin-n",
                "promise": "eslint-plugin-promise",
            })),
            settings: Some(json!({
                "import/core-modules": ["electron", "atom"],
                "import/resolver": {"node": true},
            })),
            language_options: Some(json!({
                "ecmaVersion": "latest",
                "sourceType": "module",
                "globals": {"console": false, "process": false, "Buffer": false},
            })),
            rules: rules_from_json(json!({
                "no-unused-vars": "error",
                "no-var": "error",
                "prefer-const": "error",
                "eqeqeq": ["error", "always"],
                "no-eq-null": "error",
                "curly": "error",
                "quotes": ["error", "single"],
                "indent": ["error", "tab", {"SwitchCase": 1}],
                "semi": ["error", "always"],
                "comma-dangle": ["error", "always-multiline"],
                "unicorn/prefer-module": "error",
                "import/no-unresolved": "error",
                "n/no-deprecated-api": "error",
                "promise/param-names": "error",
            })),
            ..CompiledConfigBlock::default()
        },
        CompiledConfigBlock::scoped(
            vec![GlobPattern::new(TS_FILES_GLOB)],
            rules_from_json(json!({
                "no-unused-vars": "off",
                "@typescript-eslint/no-unused-vars": "error",
                "indent": "off",
                "@typescript-eslint/indent": ["error", "tab", {"SwitchCase": 1}],
                "semi": "off",
                "@typescript-eslint/semi": ["error", "always"],
                "@typescript-eslint/no-floating-promises": "error",
                "@typescript-eslint/no-unnecessary-type-assertion": "error",
                "@typescript-eslint/switch-exhaustiveness-check": "error",
            })),
        ),
    ]
}

/// The base ruleset's own indent setting, used when a layer turns `space`
/// back off and the rule must revert for that layer's files only
pub fn base_indent_setting() -> RuleSetting {
    RuleSetting::with_options(
        crate::types::Severity::Error,
        vec![json!("tab"), json!({"SwitchCase": 1})],
    )
}

/// Rules the delegation plugin's recommended config carries alongside the
/// delegation rule itself
pub fn prettier_plugin_recommended_rules() -> IndexMap<RuleId, RuleSetting> {
    rules_from_json(json!({
        "prettier/prettier": "error",
        "arrow-body-style": "off",
        "prefer-arrow-callback": "off",
    }))
}

/// Stylistic rules known to fight the external formatter, all disabled
///
/// Appended after the delegation rule, and also usable standalone as the
/// `prettier: "compat"` block.
pub fn prettier_compat_rules() -> IndexMap<RuleId, RuleSetting> {
    rules_from_json(json!({
        "indent": "off",
        "@typescript-eslint/indent": "off",
        "semi": "off",
        "@typescript-eslint/semi": "off",
        "semi-spacing": "off",
        "quotes": "off",
        "comma-dangle": "off",
        "max-len": "off",
        "no-mixed-spaces-and-tabs": "off",
        "no-tabs": "off",
        "object-curly-spacing": "off",
        "array-bracket-spacing": "off",
        "arrow-parens": "off",
        "operator-linebreak": "off",
    }))
}

/// The formatter-compatibility block, scoped to the given files
pub fn prettier_compat_block(files: Vec<GlobPattern>) -> CompiledConfigBlock {
    CompiledConfigBlock::scoped(files, prettier_compat_rules())
}

/// The React overlay, scoped to the given files
pub fn react_block(files: Vec<GlobPattern>) -> CompiledConfigBlock {
    CompiledConfigBlock {
        files: Some(files),
        plugins: Some(json!({
            "react": "eslint-plugin-react",
            "react-hooks": "eslint-plugin-react-hooks",
        })),
        settings: Some(json!({"react": {"version": "detect"}})),
        rules: rules_from_json(json!({
            "react/jsx-key": "error",
            "react/jsx-no-duplicate-props": "error",
            "react/jsx-no-undef": "error",
            "react/no-children-prop": "error",
            "react/no-danger-with-children": "error",
            "react/self-closing-comp": "error",
            "react-hooks/rules-of-hooks": "error",
            "react-hooks/exhaustive-deps": "warn",
        })),
        ..CompiledConfigBlock::default()
    }
}

/// Resolves a bare preset name to its blocks, or None if unknown
pub fn preset_blocks(name: &str) -> Option<Vec<CompiledConfigBlock>> {
    match name {
        "recommended" => Some(base_config()),
        "prettier-compat" => Some(vec![prettier_compat_block(vec![GlobPattern::new(
            ALL_FILES_GLOB,
        )])]),
        "react" => Some(vec![react_block(vec![GlobPattern::new(ALL_FILES_GLOB)])]),
        _ => None,
    }
}

/// Parses a JSON object literal into an ordered rule map
fn rules_from_json(value: Value) -> IndexMap<RuleId, RuleSetting> {
    serde_json::from_value(value).expect("preset rule tables are well-formed")
}
