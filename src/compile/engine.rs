//! The configuration merge engine
//!
//! Compiles a base ruleset plus N ordered user layers into the final ordered
//! list of [`CompiledConfigBlock`]s. The fold is strictly ordered and input
//! order is load-bearing: later blocks win for overlapping files, and
//! declaring a layer after a broader one is the only way to narrow or
//! override it. There is no specificity scoring.
//!
//! The engine never mutates an input layer. Each rule layer is translated
//! into a fresh block; the original layers stay available for inspection.

use crate::compile::block::CompiledConfigBlock;
use crate::compile::prettier::FormatterSettings;
use crate::compile::{presets, style};
use crate::config::layer::{ConfigLayer, PrettierSetting, RuleLayer, SpaceSetting};
use crate::error::ConfigError;
use crate::types::{ALL_FILES_GLOB, GlobPattern, RuleFamily, RuleId, RuleSetting, Severity, TS_FILES_GLOB};
use serde_json::{Map, Value, json};
use std::path::PathBuf;

/// How the trailing statically-typed parser block finds its project
///
/// Built from the membership resolver's result: the real manifest when one
/// exists, and the synthesized fallback for the files it does not claim.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TsProjectOptions {
    /// The discovered project manifest, if any
    pub manifest_path: Option<PathBuf>,
    /// The synthesized fallback manifest, when uncovered files exist
    pub default_project: Option<PathBuf>,
    /// Files the parser may assign to the fallback project
    pub allow_default_project: Vec<String>,
}

/// Compiles base blocks and ordered layers into the final block list
///
/// `formatter` must be fully resolved before this call; the engine treats it
/// as an explicit input and never samples the filesystem. A configuration
/// conflict aborts the whole compilation: no partial output is returned.
pub fn compile(
    base_blocks: Vec<CompiledConfigBlock>,
    layers: &[ConfigLayer],
    formatter: &FormatterSettings,
    ts_project: Option<&TsProjectOptions>,
) -> Result<Vec<CompiledConfigBlock>, ConfigError> {
    let mut output = base_blocks;

    for layer in layers {
        match layer {
            ConfigLayer::Preset(name) => {
                let blocks = presets::preset_blocks(name)
                    .ok_or_else(|| ConfigError::UnknownPreset(name.clone()))?;
                output.extend(blocks);
            }
            ConfigLayer::GlobalIgnores(ignores) => {
                output.push(CompiledConfigBlock::ignores_only(ignores.clone()));
            }
            ConfigLayer::Rules(rule_layer) => {
                if rule_layer.is_empty() {
                    continue;
                }
                output.extend(compile_rule_layer(rule_layer, formatter)?);
            }
        }
    }

    // Every statically-typed file gets a project, so type-aware rules can
    // load anywhere without per-layer parser wiring
    if let Some(ts) = ts_project {
        output.push(ts_parser_block(ts));
    }

    Ok(output)
}

/// Translates one rule layer into its blocks, overlays first
fn compile_rule_layer(
    layer: &RuleLayer,
    formatter: &FormatterSettings,
) -> Result<Vec<CompiledConfigBlock>, ConfigError> {
    let files = layer
        .files
        .clone()
        .unwrap_or_else(|| vec![GlobPattern::new(ALL_FILES_GLOB)]);

    let mut block = CompiledConfigBlock {
        files: Some(files.clone()),
        ignores: layer.ignores.clone(),
        rules: layer.rules.clone(),
        plugins: layer.plugins.clone(),
        settings: layer.settings.clone(),
        language_options: layer.language_options.clone(),
    };

    for family in RuleFamily::all() {
        for (id, setting) in style::style_overrides(layer.space.as_ref(), layer.semicolon, family) {
            block.set_rule(id, setting);
        }
    }

    let mut blocks = Vec::new();

    match layer.prettier {
        Some(PrettierSetting::Enabled(true)) => {
            validate_formatter_agreement(layer, formatter)?;
            apply_formatter_delegation(&mut block, layer, formatter);
        }
        Some(PrettierSetting::Compat) => {
            blocks.push(presets::prettier_compat_block(files.clone()));
        }
        Some(PrettierSetting::Enabled(false)) => {
            // A narrower layer turning delegation back off for its files
            block.set_rule(delegation_rule_id(), RuleSetting::off());
        }
        None => {}
    }

    if layer.react == Some(true) {
        blocks.push(presets::react_block(files));
    }

    blocks.push(block);
    Ok(blocks)
}

/// Checks the three fatal conflicts between explicit style options and the
/// formatter's own settings
///
/// Silently picking one side would change output without the user's
/// awareness, so disagreement aborts compilation.
fn validate_formatter_agreement(
    layer: &RuleLayer,
    formatter: &FormatterSettings,
) -> Result<(), ConfigError> {
    if let (Some(semicolon), Some(formatter_semi)) = (layer.semicolon, formatter.semi)
        && semicolon != formatter_semi
    {
        return Err(ConfigError::SemicolonConflict {
            semicolon,
            formatter_semi,
        });
    }

    let space_enabled = layer.space.as_ref().is_some_and(SpaceSetting::is_spaces);
    if let Some(use_tabs) = formatter.use_tabs
        && space_enabled == use_tabs
    {
        return Err(ConfigError::IndentStyleConflict {
            space: describe_space(layer.space.as_ref()),
            formatter_use_tabs: use_tabs,
        });
    }

    if let (Some(space), Some(formatter_tab_width)) = (
        layer.space.as_ref().and_then(SpaceSetting::explicit_width),
        formatter.tab_width,
    ) && space != formatter_tab_width
    {
        return Err(ConfigError::IndentWidthConflict {
            space,
            formatter_tab_width,
        });
    }

    Ok(())
}

/// Injects the delegation rule and its companion rule sets into `block`
///
/// The delegation options mirror the validated style; the formatter's own
/// reported settings are overlaid last so anything it specifies beyond the
/// validated three takes precedence.
fn apply_formatter_delegation(
    block: &mut CompiledConfigBlock,
    layer: &RuleLayer,
    formatter: &FormatterSettings,
) {
    block.plugins = Some(merge_plugin(
        block.plugins.take(),
        "prettier",
        "eslint-plugin-prettier",
    ));

    for (id, setting) in presets::prettier_plugin_recommended_rules() {
        block.set_rule(id, setting);
    }

    let mut options = Map::new();
    options.insert("singleQuote".to_string(), json!(true));
    options.insert("bracketSpacing".to_string(), json!(false));
    options.insert("bracketSameLine".to_string(), json!(false));
    options.insert("trailingComma".to_string(), json!("all"));
    options.insert(
        "tabWidth".to_string(),
        json!(layer.space.as_ref().map_or(2, SpaceSetting::width)),
    );
    options.insert(
        "useTabs".to_string(),
        json!(!layer.space.as_ref().is_some_and(SpaceSetting::is_spaces)),
    );
    if let Some(semicolon) = layer.semicolon {
        options.insert("semi".to_string(), json!(semicolon));
    }
    formatter.overlay_onto(&mut options);

    block.set_rule(
        delegation_rule_id(),
        RuleSetting::with_options(Severity::Error, vec![Value::Object(options)]),
    );

    for (id, setting) in presets::prettier_compat_rules() {
        block.set_rule(id, setting);
    }
}

/// The trailing block wiring every statically-typed file to a project
fn ts_parser_block(ts: &TsProjectOptions) -> CompiledConfigBlock {
    let parser_options = if ts.default_project.is_some() || !ts.allow_default_project.is_empty() {
        let mut service = Map::new();
        service.insert(
            "allowDefaultProject".to_string(),
            json!(ts.allow_default_project),
        );
        if let Some(path) = &ts.default_project {
            service.insert(
                "defaultProject".to_string(),
                json!(path.to_string_lossy()),
            );
        }
        json!({"projectService": service})
    } else {
        let project = ts
            .manifest_path
            .as_ref()
            .map_or_else(|| "tsconfig.json".to_string(), |p| p.to_string_lossy().into_owned());
        json!({"project": project})
    };

    CompiledConfigBlock {
        files: Some(vec![GlobPattern::new(TS_FILES_GLOB)]),
        plugins: Some(json!({"@typescript-eslint": "typescript-eslint"})),
        settings: Some(json!({"import/resolver": {"typescript": true}})),
        language_options: Some(json!({
            "parser": "@typescript-eslint/parser",
            "parserOptions": parser_options,
        })),
        ..CompiledConfigBlock::default()
    }
}

fn delegation_rule_id() -> RuleId {
    RuleId::new("prettier/prettier").expect("static rule id is valid")
}

fn describe_space(space: Option<&SpaceSetting>) -> String {
    match space {
        None => "unset".to_string(),
        Some(SpaceSetting::Use(enabled)) => enabled.to_string(),
        Some(SpaceSetting::Width(width)) => width.to_string(),
    }
}

/// Merges one named plugin into an opaque plugins value
fn merge_plugin(plugins: Option<Value>, name: &str, module: &str) -> Value {
    let mut map = match plugins {
        Some(Value::Object(map)) => map,
        _ => Map::new(),
    };
    map.insert(name.to_string(), json!(module));
    Value::Object(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    fn rule_layer(value: serde_json::Value) -> ConfigLayer {
        serde_json::from_value(value).unwrap()
    }

    fn last_block(blocks: &[CompiledConfigBlock]) -> &CompiledConfigBlock {
        blocks.last().unwrap()
    }

    fn rule<'a>(block: &'a CompiledConfigBlock, name: &str) -> &'a RuleSetting {
        &block.rules[&RuleId::new(name).unwrap()]
    }

    #[test]
    fn test_empty_layer_contributes_nothing() {
        let layers = vec![rule_layer(json!({}))];
        let output = compile(vec![], &layers, &FormatterSettings::default(), None).unwrap();
        assert!(output.is_empty());
    }

    #[test]
    fn test_global_ignore_layer_stays_ignore_only() {
        let layers = vec![rule_layer(json!({"ignores": ["build/**"]}))];
        let output = compile(vec![], &layers, &FormatterSettings::default(), None).unwrap();

        assert_eq!(output.len(), 1);
        assert!(output[0].files.is_none());
        assert!(output[0].rules.is_empty());
        assert_eq!(
            serde_json::to_value(&output[0]).unwrap(),
            json!({"ignores": ["build/**"]})
        );
    }

    #[test]
    fn test_files_default_to_all_sources_glob() {
        let layers = vec![rule_layer(json!({"rules": {"no-var": "error"}}))];
        let output = compile(vec![], &layers, &FormatterSettings::default(), None).unwrap();
        assert_eq!(
            output[0].files,
            Some(vec![GlobPattern::new(ALL_FILES_GLOB)])
        );
    }

    #[test]
    fn test_later_layers_appended_after_earlier_ones() {
        let layers = vec![
            rule_layer(json!({"rules": {"no-var": "warn"}})),
            rule_layer(json!({"rules": {"no-var": "error"}})),
        ];
        let output = compile(vec![], &layers, &FormatterSettings::default(), None).unwrap();

        // Last-write-wins is positional: the later layer must come last
        assert_eq!(output.len(), 2);
        assert_eq!(rule(&output[0], "no-var").severity, Severity::Warn);
        assert_eq!(rule(&output[1], "no-var").severity, Severity::Error);
    }

    #[test]
    fn test_input_layers_not_mutated() {
        let layer = rule_layer(json!({"space": true, "rules": {"no-var": "error"}}));
        let layers = vec![layer.clone()];
        let _ = compile(vec![], &layers, &FormatterSettings::default(), None).unwrap();
        assert_eq!(layers[0], layer);
    }

    #[test]
    fn test_style_translation_emits_both_families() {
        let layers = vec![rule_layer(json!({"space": 4}))];
        let output = compile(vec![], &layers, &FormatterSettings::default(), None).unwrap();

        let block = &output[0];
        assert_eq!(rule(block, "indent").options[0], json!(4));
        assert_eq!(
            rule(block, "@typescript-eslint/indent").options[0],
            json!(4)
        );
    }

    #[test]
    fn test_space_false_reverts_to_base_indent() {
        let layers = vec![
            rule_layer(json!({"space": true})),
            rule_layer(json!({"files": ["legacy/**"], "space": false})),
        ];
        let output = compile(vec![], &layers, &FormatterSettings::default(), None).unwrap();

        assert_eq!(rule(&output[0], "indent").options[0], json!(2));
        assert_eq!(
            *rule(&output[1], "indent"),
            presets::base_indent_setting()
        );
        assert_eq!(
            output[1].files,
            Some(vec![GlobPattern::new("legacy/**")])
        );
    }

    #[test]
    fn test_preset_layer_expands() {
        let layers = vec![ConfigLayer::Preset("react".to_string())];
        let output = compile(vec![], &layers, &FormatterSettings::default(), None).unwrap();
        assert_eq!(output.len(), 1);
        assert!(
            output[0]
                .rules
                .contains_key(&RuleId::new("react-hooks/rules-of-hooks").unwrap())
        );
    }

    #[test]
    fn test_unknown_preset_is_fatal() {
        let layers = vec![ConfigLayer::Preset("strict".to_string())];
        let result = compile(vec![], &layers, &FormatterSettings::default(), None);
        assert!(matches!(result, Err(ConfigError::UnknownPreset(_))));
    }

    #[test]
    fn test_react_overlay_precedes_the_layer_block() {
        let layers = vec![rule_layer(json!({
            "files": ["app/**/*.tsx"],
            "react": true,
            "rules": {"react/self-closing-comp": "off"}
        }))];
        let output = compile(vec![], &layers, &FormatterSettings::default(), None).unwrap();

        assert_eq!(output.len(), 2);
        // Overlay first, same file scope; the layer's own rules can still win
        assert_eq!(
            output[0].files,
            Some(vec![GlobPattern::new("app/**/*.tsx")])
        );
        assert_eq!(
            rule(&output[0], "react/self-closing-comp").severity,
            Severity::Error
        );
        assert_eq!(
            rule(&output[1], "react/self-closing-comp").severity,
            Severity::Off
        );
    }

    #[test]
    fn test_prettier_semicolon_conflict_is_fatal() {
        let formatter: FormatterSettings =
            serde_json::from_value(json!({"semi": false, "useTabs": true})).unwrap();
        let layers = vec![rule_layer(json!({"prettier": true, "semicolon": true}))];

        let result = compile(vec![], &layers, &formatter, None);
        assert!(matches!(
            result,
            Err(ConfigError::SemicolonConflict {
                semicolon: true,
                formatter_semi: false
            })
        ));
    }

    #[test]
    fn test_prettier_indent_style_conflict_is_fatal() {
        let formatter: FormatterSettings =
            serde_json::from_value(json!({"useTabs": true})).unwrap();
        let layers = vec![rule_layer(json!({"prettier": true, "space": true}))];

        let result = compile(vec![], &layers, &formatter, None);
        assert!(matches!(
            result,
            Err(ConfigError::IndentStyleConflict { .. })
        ));
    }

    #[test]
    fn test_prettier_tabs_agreeing_with_formatter_tabs() {
        let formatter: FormatterSettings =
            serde_json::from_value(json!({"useTabs": true})).unwrap();
        let layers = vec![rule_layer(json!({"prettier": true}))];

        // No space option and a tabs formatter agree
        assert!(compile(vec![], &layers, &formatter, None).is_ok());
    }

    #[test]
    fn test_prettier_indent_width_conflict_is_fatal() {
        let formatter: FormatterSettings =
            serde_json::from_value(json!({"useTabs": false, "tabWidth": 2})).unwrap();
        let layers = vec![rule_layer(json!({"prettier": true, "space": 4}))];

        let result = compile(vec![], &layers, &formatter, None);
        assert!(matches!(
            result,
            Err(ConfigError::IndentWidthConflict {
                space: 4,
                formatter_tab_width: 2
            })
        ));
    }

    #[test]
    fn test_prettier_delegation_rule_mirrors_style() {
        let formatter = FormatterSettings::default();
        let layers = vec![rule_layer(json!({"prettier": true, "space": 4, "semicolon": false}))];
        let output = compile(vec![], &layers, &formatter, None).unwrap();

        let delegation = rule(&output[0], "prettier/prettier");
        assert_eq!(delegation.severity, Severity::Error);
        let options = delegation.options[0].as_object().unwrap();
        assert_eq!(options["singleQuote"], json!(true));
        assert_eq!(options["bracketSpacing"], json!(false));
        assert_eq!(options["trailingComma"], json!("all"));
        assert_eq!(options["tabWidth"], json!(4));
        assert_eq!(options["useTabs"], json!(false));
        assert_eq!(options["semi"], json!(false));
    }

    #[test]
    fn test_prettier_overlay_formatter_settings_win() {
        let formatter: FormatterSettings =
            serde_json::from_value(json!({"printWidth": 100, "tabWidth": 4})).unwrap();
        let layers = vec![rule_layer(json!({"prettier": true, "space": 4}))];
        let output = compile(vec![], &layers, &formatter, None).unwrap();

        let options = rule(&output[0], "prettier/prettier").options[0]
            .as_object()
            .unwrap();
        assert_eq!(options["printWidth"], json!(100));
        assert_eq!(options["tabWidth"], json!(4));
    }

    #[test]
    fn test_prettier_delegation_adds_plugin_and_compat_disables() {
        let layers = vec![rule_layer(json!({"prettier": true, "space": true}))];
        let formatter: FormatterSettings =
            serde_json::from_value(json!({"useTabs": false})).unwrap();
        let output = compile(vec![], &layers, &formatter, None).unwrap();

        let block = &output[0];
        assert_eq!(
            block.plugins.as_ref().unwrap()["prettier"],
            json!("eslint-plugin-prettier")
        );
        // The compat disables land after the delegation rule
        assert_eq!(rule(block, "indent").severity, Severity::Off);
        assert_eq!(rule(block, "semi").severity, Severity::Off);
    }

    #[test]
    fn test_prettier_compat_appends_disable_block_without_delegation() {
        let layers = vec![rule_layer(json!({
            "files": ["scripts/**"],
            "prettier": "compat",
            "rules": {"no-var": "error"}
        }))];
        let output = compile(vec![], &layers, &FormatterSettings::default(), None).unwrap();

        assert_eq!(output.len(), 2);
        assert_eq!(
            output[0].files,
            Some(vec![GlobPattern::new("scripts/**")])
        );
        assert_eq!(rule(&output[0], "semi").severity, Severity::Off);
        assert!(
            !output[1]
                .rules
                .contains_key(&RuleId::new("prettier/prettier").unwrap())
        );
    }

    #[test]
    fn test_prettier_false_turns_delegation_off_for_scope() {
        let layers = vec![
            rule_layer(json!({"prettier": true})),
            rule_layer(json!({"files": ["generated/**"], "prettier": false})),
        ];
        let formatter: FormatterSettings =
            serde_json::from_value(json!({"useTabs": true})).unwrap();
        let output = compile(vec![], &layers, &formatter, None).unwrap();

        assert_eq!(
            rule(&output[0], "prettier/prettier").severity,
            Severity::Error
        );
        assert_eq!(
            *rule(&output[1], "prettier/prettier"),
            RuleSetting::off()
        );
    }

    #[test]
    fn test_passthrough_blocks_forwarded_verbatim() {
        let layers = vec![rule_layer(json!({
            "plugins": {"custom": "eslint-plugin-custom"},
            "settings": {"custom/option": 1},
            "languageOptions": {"globals": {"myGlobal": false}}
        }))];
        let output = compile(vec![], &layers, &FormatterSettings::default(), None).unwrap();

        let block = &output[0];
        assert_eq!(
            block.plugins,
            Some(json!({"custom": "eslint-plugin-custom"}))
        );
        assert_eq!(block.settings, Some(json!({"custom/option": 1})));
        assert_eq!(
            block.language_options,
            Some(json!({"globals": {"myGlobal": false}}))
        );
    }

    #[test]
    fn test_ts_parser_block_appended_last() {
        let ts = TsProjectOptions {
            manifest_path: Some(PathBuf::from("/proj/tsconfig.json")),
            default_project: Some(PathBuf::from("/proj/node_modules/.cache/lamina/tsconfig.lamina.json")),
            allow_default_project: vec!["lib/c.ts".to_string()],
        };
        let layers = vec![rule_layer(json!({"rules": {"no-var": "error"}}))];
        let output = compile(vec![], &layers, &FormatterSettings::default(), Some(&ts)).unwrap();

        let trailing = last_block(&output);
        assert_eq!(
            trailing.files,
            Some(vec![GlobPattern::new(TS_FILES_GLOB)])
        );
        let parser_options = &trailing.language_options.as_ref().unwrap()["parserOptions"];
        assert_eq!(
            parser_options["projectService"]["allowDefaultProject"],
            json!(["lib/c.ts"])
        );
    }

    #[test]
    fn test_ts_parser_block_without_fallback_uses_project() {
        let ts = TsProjectOptions {
            manifest_path: Some(PathBuf::from("/proj/tsconfig.json")),
            ..TsProjectOptions::default()
        };
        let output = compile(vec![], &[], &FormatterSettings::default(), Some(&ts)).unwrap();

        let parser_options = &last_block(&output).language_options.as_ref().unwrap()["parserOptions"];
        assert_eq!(parser_options["project"], json!("/proj/tsconfig.json"));
    }

    #[test]
    fn test_compilation_is_deterministic() {
        let base = presets::base_config();
        let layers = vec![
            rule_layer(json!({"space": 4, "semicolon": false})),
            rule_layer(json!({"ignores": ["dist/**"]})),
            ConfigLayer::Preset("react".to_string()),
        ];
        let formatter: FormatterSettings =
            serde_json::from_value(json!({"useTabs": false, "tabWidth": 4})).unwrap();

        let first = compile(base.clone(), &layers, &formatter, None).unwrap();
        let second = compile(base, &layers, &formatter, None).unwrap();
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_style_overrides_win_over_layer_rules() {
        let mut rules = IndexMap::new();
        rules.insert(
            RuleId::new("indent").unwrap(),
            RuleSetting::severity(Severity::Warn),
        );
        let layer = ConfigLayer::Rules(RuleLayer {
            rules,
            space: Some(SpaceSetting::Width(4)),
            ..RuleLayer::default()
        });

        let output = compile(vec![], &[layer], &FormatterSettings::default(), None).unwrap();
        assert_eq!(rule(&output[0], "indent").options[0], json!(4));
    }
}
