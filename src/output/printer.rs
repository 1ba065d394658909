#![forbid(unsafe_code)]

//! Output formatters for compiled configuration and membership results
//!
//! Supports human-readable output (colored when the terminal allows) and
//! machine-readable JSON.

use crate::compile::block::CompiledConfigBlock;
use crate::project::membership::MembershipResult;
use serde_json::json;
use std::io::Write;
use termcolor::{Color, ColorSpec, StandardStream, WriteColor};

/// JSON formatter for compiled configuration blocks
pub struct ConfigJsonFormatter;

impl ConfigJsonFormatter {
    pub fn new() -> Self {
        ConfigJsonFormatter
    }

    /// Formats the compiled blocks as pretty-printed JSON
    pub fn format(&self, blocks: &[CompiledConfigBlock]) -> String {
        serde_json::to_string_pretty(blocks).expect("compiled blocks are serializable")
    }

    /// Writes the formatted output to stdout
    pub fn write_to_stdout(&self, blocks: &[CompiledConfigBlock]) {
        println!("{}", self.format(blocks));
    }
}

impl Default for ConfigJsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}

/// Human-readable formatter for compiled configuration blocks
pub struct ConfigHumanFormatter;

impl ConfigHumanFormatter {
    pub fn new() -> Self {
        ConfigHumanFormatter
    }

    /// Formats a block summary for human consumption
    pub fn format(&self, blocks: &[CompiledConfigBlock]) -> String {
        let mut output = String::new();

        output.push_str(&format!("Compiled configuration ({} blocks):\n", blocks.len()));
        output.push('\n');

        for (index, block) in blocks.iter().enumerate() {
            let scope = match (&block.files, &block.ignores) {
                (Some(files), _) => files
                    .iter()
                    .map(|f| f.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
                (None, Some(ignores)) => format!(
                    "ignores: {}",
                    ignores
                        .iter()
                        .map(|i| i.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                ),
                (None, None) => "<unscoped>".to_string(),
            };

            output.push_str(&format!("[{}] {}\n", index, scope));
            if !block.rules.is_empty() {
                output.push_str(&format!("  Rules: {}\n", block.rules.len()));
            }
            if block.plugins.is_some() {
                output.push_str("  Plugins: yes\n");
            }
        }

        output
    }
}

impl Default for ConfigHumanFormatter {
    fn default() -> Self {
        Self::new()
    }
}

/// Human-readable formatter for membership results
pub struct MembershipHumanFormatter;

impl MembershipHumanFormatter {
    pub fn new() -> Self {
        MembershipHumanFormatter
    }

    /// Formats a membership result for human consumption
    pub fn format(&self, result: &MembershipResult) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "Project membership ({} covered, {} uncovered):\n",
            result.covered_files.len(),
            result.uncovered_files.len()
        ));
        output.push('\n');

        for file in &result.covered_files {
            output.push_str(&format!("  ✓ {}\n", file.display()));
        }
        for file in &result.uncovered_files {
            output.push_str(&format!("  ✗ {}\n", file.display()));
        }

        if let Some(path) = &result.fallback_manifest_path {
            output.push('\n');
            output.push_str(&format!("Fallback manifest: {}\n", path.display()));
        }

        output
    }

    /// Writes the result to a colored stream, green for covered and yellow
    /// for uncovered
    pub fn write_colored(
        &self,
        stream: &mut StandardStream,
        result: &MembershipResult,
    ) -> std::io::Result<()> {
        writeln!(
            stream,
            "Project membership ({} covered, {} uncovered):",
            result.covered_files.len(),
            result.uncovered_files.len()
        )?;
        writeln!(stream)?;

        for file in &result.covered_files {
            stream.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
            write!(stream, "  ✓ ")?;
            stream.reset()?;
            writeln!(stream, "{}", file.display())?;
        }
        for file in &result.uncovered_files {
            stream.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)))?;
            write!(stream, "  ✗ ")?;
            stream.reset()?;
            writeln!(stream, "{}", file.display())?;
        }

        if let Some(path) = &result.fallback_manifest_path {
            writeln!(stream)?;
            writeln!(stream, "Fallback manifest: {}", path.display())?;
        }

        Ok(())
    }
}

impl Default for MembershipHumanFormatter {
    fn default() -> Self {
        Self::new()
    }
}

/// JSON formatter for membership results
pub struct MembershipJsonFormatter;

impl MembershipJsonFormatter {
    pub fn new() -> Self {
        MembershipJsonFormatter
    }

    /// Formats a membership result as pretty-printed JSON
    pub fn format(&self, result: &MembershipResult) -> String {
        let value = json!({
            "coveredFiles": result
                .covered_files
                .iter()
                .map(|f| f.to_string_lossy())
                .collect::<Vec<_>>(),
            "uncoveredFiles": result
                .uncovered_files
                .iter()
                .map(|f| f.to_string_lossy())
                .collect::<Vec<_>>(),
            "fallbackManifestPath": result
                .fallback_manifest_path
                .as_ref()
                .map(|p| p.to_string_lossy()),
        });
        serde_json::to_string_pretty(&value).expect("membership JSON is serializable")
    }
}

impl Default for MembershipJsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}
