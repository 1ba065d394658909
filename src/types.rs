#![forbid(unsafe_code)]

//! Core domain types for Lamina
//!
//! This module defines the fundamental types used throughout the Lamina system.

use serde::de::{self, Deserializer};
use serde::ser::{SerializeSeq, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Extensions of the dynamically-typed source family
pub const JS_EXTENSIONS: [&str; 4] = ["js", "jsx", "mjs", "cjs"];

/// Extensions of the statically-typed source family
pub const TS_EXTENSIONS: [&str; 4] = ["ts", "tsx", "mts", "cts"];

/// Glob matching every file of the dynamically-typed family
pub const JS_FILES_GLOB: &str = "**/*.{js,jsx,mjs,cjs}";

/// Glob matching every file of the statically-typed family
pub const TS_FILES_GLOB: &str = "**/*.{ts,tsx,mts,cts}";

/// Glob matching every recognized source extension
pub const ALL_FILES_GLOB: &str = "**/*.{js,jsx,mjs,cjs,ts,tsx,mts,cts}";

/// The two rule families that use distinct identifiers for equivalent concepts
///
/// The dynamic family is the core rule namespace; the static family lives
/// under the `@typescript-eslint/` prefix and shadows the dynamic rules for
/// typed files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleFamily {
    Dynamic,
    Static,
}

impl RuleFamily {
    /// Both families, in the order their rules are emitted
    pub fn all() -> [RuleFamily; 2] {
        [RuleFamily::Dynamic, RuleFamily::Static]
    }

    /// Qualifies a bare rule name for this family
    pub fn qualify(&self, name: &str) -> String {
        match self {
            RuleFamily::Dynamic => name.to_string(),
            RuleFamily::Static => format!("@typescript-eslint/{name}"),
        }
    }
}

/// Rule severity in the lint engine's cascade
///
/// Accepts both the string form (`"off"`, `"warn"`, `"error"`) and the
/// numeric form (0, 1, 2) on input; always serializes to the string form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Off,
    Warn,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Off => "off",
            Severity::Warn => "warn",
            Severity::Error => "error",
        }
    }

    /// Parses a severity from its string or numeric JSON form
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => match s.as_str() {
                "off" => Some(Severity::Off),
                "warn" => Some(Severity::Warn),
                "error" => Some(Severity::Error),
                _ => None,
            },
            Value::Number(n) => match n.as_u64() {
                Some(0) => Some(Severity::Off),
                Some(1) => Some(Severity::Warn),
                Some(2) => Some(Severity::Error),
                _ => None,
            },
            _ => None,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for Severity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Severity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Severity::from_value(&value)
            .ok_or_else(|| de::Error::custom(format!("invalid severity: {value}")))
    }
}

/// A validated rule identifier
///
/// Rule IDs must be non-empty and contain only alphanumeric characters,
/// hyphens, underscores, and the `@` / `/` separators used by namespaced
/// rules such as `@typescript-eslint/indent` or `prettier/prettier`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RuleId(String);

impl RuleId {
    /// Creates a new RuleId, validating the input
    ///
    /// Returns None if the input is empty or contains invalid characters
    pub fn new(id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        if id.is_empty() {
            return None;
        }
        if !id
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '@' | '/'))
        {
            return None;
        }
        Some(RuleId(id))
    }

    /// Returns the rule ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for RuleId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        RuleId::new(value).ok_or_else(|| "Invalid rule ID".to_string())
    }
}

impl From<RuleId> for String {
    fn from(rule_id: RuleId) -> Self {
        rule_id.0
    }
}

/// A rule setting: a severity plus optional rule-specific option values
///
/// Round-trips the lint engine's shapes: a bare severity stays a bare
/// severity (`"error"`), a severity with options stays an array
/// (`["error", 2, {"SwitchCase": 1}]`).
#[derive(Debug, Clone, PartialEq)]
pub struct RuleSetting {
    pub severity: Severity,
    pub options: Vec<Value>,
}

impl RuleSetting {
    /// A bare severity with no options
    pub fn severity(severity: Severity) -> Self {
        RuleSetting {
            severity,
            options: Vec::new(),
        }
    }

    /// A severity with rule-specific options
    pub fn with_options(severity: Severity, options: Vec<Value>) -> Self {
        RuleSetting { severity, options }
    }

    /// Shorthand for the ubiquitous `"off"` setting
    pub fn off() -> Self {
        RuleSetting::severity(Severity::Off)
    }
}

impl Serialize for RuleSetting {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.options.is_empty() {
            self.severity.serialize(serializer)
        } else {
            let mut seq = serializer.serialize_seq(Some(1 + self.options.len()))?;
            seq.serialize_element(&self.severity)?;
            for option in &self.options {
                seq.serialize_element(option)?;
            }
            seq.end()
        }
    }
}

impl<'de> Deserialize<'de> for RuleSetting {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        match &value {
            Value::String(_) | Value::Number(_) => Severity::from_value(&value)
                .map(RuleSetting::severity)
                .ok_or_else(|| de::Error::custom(format!("invalid rule setting: {value}"))),
            Value::Array(items) => {
                let severity = items.first().and_then(Severity::from_value).ok_or_else(
                    || de::Error::custom("rule setting array must start with a severity"),
                )?;
                Ok(RuleSetting::with_options(severity, items[1..].to_vec()))
            }
            _ => Err(de::Error::custom(format!("invalid rule setting: {value}"))),
        }
    }
}

/// A glob pattern for file matching
///
/// This is a simple wrapper around a string that will be used with the `globset` crate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GlobPattern(String);

impl GlobPattern {
    /// Creates a new GlobPattern
    pub fn new(pattern: impl Into<String>) -> Self {
        GlobPattern(pattern.into())
    }

    /// Returns the pattern as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GlobPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for GlobPattern {
    fn from(pattern: String) -> Self {
        GlobPattern(pattern)
    }
}

impl From<&str> for GlobPattern {
    fn from(pattern: &str) -> Self {
        GlobPattern(pattern.to_string())
    }
}
