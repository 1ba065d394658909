//! Configuration layers as supplied by users and discovery
//!
//! A layer arrives in one of three shapes, modeled as a tagged union so the
//! merge engine's special cases are exhaustive-match branches rather than
//! key-counting checks:
//!
//! - a bare string naming a built-in preset,
//! - an object whose only key is `ignores` (a global-ignore layer),
//! - a rule layer carrying file scopes, rules, passthrough blocks, and the
//!   high-level style knobs.
//!
//! Layers are immutable once produced: the merge engine builds a fresh
//! compiled block from each layer rather than attaching keys in place.
//! Unrecognized keys are silently dropped, so configurations written for a
//! newer release still load.

use crate::types::{GlobPattern, RuleId, RuleSetting};
use indexmap::IndexMap;
use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One partial configuration fragment
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigLayer {
    /// A bare preset name, resolved against the built-in presets
    Preset(String),
    /// A global-ignore layer; never merged with rule logic
    GlobalIgnores(Vec<GlobPattern>),
    /// A scoped rule layer
    Rules(RuleLayer),
}

impl ConfigLayer {
    /// Builds a layer from its raw JSON form
    pub fn from_value(value: Value) -> Result<Self, String> {
        match value {
            Value::String(name) => Ok(ConfigLayer::Preset(name)),
            Value::Object(map) => {
                if map.len() == 1 && map.contains_key("ignores") {
                    let ignores = patterns_from_value(&map["ignores"])
                        .ok_or_else(|| "invalid `ignores` value".to_string())?;
                    return Ok(ConfigLayer::GlobalIgnores(ignores));
                }

                serde_json::from_value::<RuleLayer>(Value::Object(map))
                    .map(ConfigLayer::Rules)
                    .map_err(|e| e.to_string())
            }
            other => Err(format!("expected a preset name or an object, got {other}")),
        }
    }
}

impl<'de> Deserialize<'de> for ConfigLayer {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        ConfigLayer::from_value(value).map_err(de::Error::custom)
    }
}

impl Serialize for ConfigLayer {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ConfigLayer::Preset(name) => serializer.serialize_str(name),
            ConfigLayer::GlobalIgnores(ignores) => {
                use serde::ser::SerializeMap;
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("ignores", ignores)?;
                map.end()
            }
            ConfigLayer::Rules(layer) => layer.serialize(serializer),
        }
    }
}

/// A scoped rule layer
///
/// `files` defaults to all recognized source extensions when absent; both
/// `files` and `ignores` accept a single pattern in place of a list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleLayer {
    #[serde(
        default,
        deserialize_with = "deserialize_patterns",
        skip_serializing_if = "Option::is_none"
    )]
    pub files: Option<Vec<GlobPattern>>,

    #[serde(
        default,
        deserialize_with = "deserialize_patterns",
        skip_serializing_if = "Option::is_none"
    )]
    pub ignores: Option<Vec<GlobPattern>>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub rules: IndexMap<RuleId, RuleSetting>,

    /// Opaque passthrough, forwarded verbatim to the lint engine
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugins: Option<Value>,

    /// Opaque passthrough, forwarded verbatim to the lint engine
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<Value>,

    /// Opaque passthrough, forwarded verbatim to the lint engine
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language_options: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub space: Option<SpaceSetting>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semicolon: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prettier: Option<PrettierSetting>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub react: Option<bool>,
}

impl RuleLayer {
    /// True when the layer carries no keys at all and contributes nothing
    pub fn is_empty(&self) -> bool {
        self.files.is_none()
            && self.ignores.is_none()
            && self.rules.is_empty()
            && self.plugins.is_none()
            && self.settings.is_none()
            && self.language_options.is_none()
            && self.space.is_none()
            && self.semicolon.is_none()
            && self.prettier.is_none()
            && self.react.is_none()
    }
}

/// The `space` style knob: boolean or explicit width
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpaceSetting {
    Use(bool),
    Width(u8),
}

impl SpaceSetting {
    /// True when the setting asks for space indentation
    ///
    /// A width of zero is an explicit request for tabs, same as `false`.
    pub fn is_spaces(&self) -> bool {
        match self {
            SpaceSetting::Use(enabled) => *enabled,
            SpaceSetting::Width(width) => *width > 0,
        }
    }

    /// The indent width to use when spaces are enabled
    pub fn width(&self) -> u8 {
        match self {
            SpaceSetting::Width(width) if *width > 0 => *width,
            _ => 2,
        }
    }

    /// The explicit width, when one was given
    pub fn explicit_width(&self) -> Option<u8> {
        match self {
            SpaceSetting::Width(width) if *width > 0 => Some(*width),
            _ => None,
        }
    }
}

impl Serialize for SpaceSetting {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            SpaceSetting::Use(enabled) => serializer.serialize_bool(*enabled),
            SpaceSetting::Width(width) => serializer.serialize_u8(*width),
        }
    }
}

impl<'de> Deserialize<'de> for SpaceSetting {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        match &value {
            Value::Bool(enabled) => Ok(SpaceSetting::Use(*enabled)),
            Value::Number(n) => n
                .as_u64()
                .filter(|n| *n <= u8::MAX as u64)
                .map(|n| SpaceSetting::Width(n as u8))
                .ok_or_else(|| de::Error::custom(format!("invalid `space` width: {value}"))),
            _ => Err(de::Error::custom(format!(
                "`space` must be a boolean or an integer, got {value}"
            ))),
        }
    }
}

/// The `prettier` style knob: delegate, disable, or compatibility-only
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrettierSetting {
    Enabled(bool),
    Compat,
}

impl Serialize for PrettierSetting {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PrettierSetting::Enabled(enabled) => serializer.serialize_bool(*enabled),
            PrettierSetting::Compat => serializer.serialize_str("compat"),
        }
    }
}

impl<'de> Deserialize<'de> for PrettierSetting {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        match &value {
            Value::Bool(enabled) => Ok(PrettierSetting::Enabled(*enabled)),
            Value::String(s) if s == "compat" => Ok(PrettierSetting::Compat),
            _ => Err(de::Error::custom(format!(
                "`prettier` must be a boolean or \"compat\", got {value}"
            ))),
        }
    }
}

/// Coerces a raw JSON value into a pattern list (single pattern or list)
fn patterns_from_value(value: &Value) -> Option<Vec<GlobPattern>> {
    match value {
        Value::String(s) => Some(vec![GlobPattern::new(s.clone())]),
        Value::Array(items) => items
            .iter()
            .map(|item| item.as_str().map(GlobPattern::new))
            .collect(),
        _ => None,
    }
}

fn deserialize_patterns<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Vec<GlobPattern>>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    patterns_from_value(&value)
        .map(Some)
        .ok_or_else(|| de::Error::custom("expected a glob pattern or a list of glob patterns"))
}
