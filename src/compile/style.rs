//! Style option translation
//!
//! Maps the high-level style knobs (`space`, `semicolon`) onto concrete rule
//! settings. Pure: same inputs, same overrides. The translation runs once per
//! rule family because the dynamic and static families use distinct rule
//! identifiers for equivalent concepts.

use crate::compile::presets;
use crate::config::layer::SpaceSetting;
use crate::types::{RuleFamily, RuleId, RuleSetting, Severity};
use serde_json::json;

/// Rule overrides implied by the style knobs, for one rule family
///
/// - `semicolon == Some(false)`: semi rule set to `"never"`, plus the
///   spacing companion in the dynamic family.
/// - `space` truthy: indent rule enabled with the requested width
///   (default 2) and a switch-case multiplier of 1.
/// - `space == Some(false)`: indent rule reset to the base ruleset's own
///   default, recovering from a broader layer having turned spaces on.
/// - absent knobs emit nothing; the earlier cascade stays in effect.
pub fn style_overrides(
    space: Option<&SpaceSetting>,
    semicolon: Option<bool>,
    family: RuleFamily,
) -> Vec<(RuleId, RuleSetting)> {
    let mut overrides = Vec::new();

    if semicolon == Some(false) {
        overrides.push((
            rule_id(family, "semi"),
            RuleSetting::with_options(Severity::Error, vec![json!("never")]),
        ));
        if family == RuleFamily::Dynamic {
            overrides.push((
                rule_id(family, "semi-spacing"),
                RuleSetting::with_options(
                    Severity::Error,
                    vec![json!({"before": false, "after": true})],
                ),
            ));
        }
    }

    match space {
        Some(setting) if setting.is_spaces() => {
            overrides.push((
                rule_id(family, "indent"),
                RuleSetting::with_options(
                    Severity::Error,
                    vec![json!(setting.width()), json!({"SwitchCase": 1})],
                ),
            ));
        }
        Some(_) => {
            // Explicitly back to tabs for this layer's files only
            overrides.push((rule_id(family, "indent"), presets::base_indent_setting()));
        }
        None => {}
    }

    overrides
}

fn rule_id(family: RuleFamily, name: &str) -> RuleId {
    RuleId::new(family.qualify(name)).expect("style rule names are valid")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn find<'a>(
        overrides: &'a [(RuleId, RuleSetting)],
        name: &str,
    ) -> Option<&'a RuleSetting> {
        overrides
            .iter()
            .find(|(id, _)| id.as_str() == name)
            .map(|(_, setting)| setting)
    }

    #[test]
    fn test_no_knobs_no_overrides() {
        assert!(style_overrides(None, None, RuleFamily::Dynamic).is_empty());
        assert!(style_overrides(None, None, RuleFamily::Static).is_empty());
    }

    #[test]
    fn test_semicolon_false_dynamic_family() {
        let overrides = style_overrides(None, Some(false), RuleFamily::Dynamic);
        let semi = find(&overrides, "semi").unwrap();
        assert_eq!(semi.options[0], json!("never"));
        assert!(find(&overrides, "semi-spacing").is_some());
    }

    #[test]
    fn test_semicolon_false_static_family() {
        let overrides = style_overrides(None, Some(false), RuleFamily::Static);
        assert!(find(&overrides, "@typescript-eslint/semi").is_some());
        // The spacing companion has no static-family counterpart
        assert_eq!(overrides.len(), 1);
    }

    #[test]
    fn test_semicolon_true_emits_nothing() {
        assert!(style_overrides(None, Some(true), RuleFamily::Dynamic).is_empty());
    }

    #[test]
    fn test_space_true_means_width_two() {
        let overrides = style_overrides(Some(&SpaceSetting::Use(true)), None, RuleFamily::Dynamic);
        let indent = find(&overrides, "indent").unwrap();
        assert_eq!(indent.options[0], json!(2));
        assert_eq!(indent.options[1], json!({"SwitchCase": 1}));
    }

    #[test]
    fn test_space_numeric_width() {
        let overrides = style_overrides(Some(&SpaceSetting::Width(4)), None, RuleFamily::Static);
        let indent = find(&overrides, "@typescript-eslint/indent").unwrap();
        assert_eq!(indent.options[0], json!(4));
    }

    #[test]
    fn test_space_false_resets_to_base_default() {
        let overrides = style_overrides(Some(&SpaceSetting::Use(false)), None, RuleFamily::Dynamic);
        let indent = find(&overrides, "indent").unwrap();
        assert_eq!(*indent, presets::base_indent_setting());
    }

    #[test]
    fn test_space_width_zero_behaves_like_false() {
        let overrides = style_overrides(Some(&SpaceSetting::Width(0)), None, RuleFamily::Dynamic);
        let indent = find(&overrides, "indent").unwrap();
        assert_eq!(*indent, presets::base_indent_setting());
    }

    #[test]
    fn test_translation_is_pure() {
        let a = style_overrides(Some(&SpaceSetting::Width(4)), Some(false), RuleFamily::Dynamic);
        let b = style_overrides(Some(&SpaceSetting::Width(4)), Some(false), RuleFamily::Dynamic);
        assert_eq!(a, b);
    }
}
