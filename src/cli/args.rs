//! CLI argument parsing using clap

use clap::{Parser, Subcommand, ValueEnum};

/// Output format for lamina commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// Pretty-printed JSON
    Json,
}

/// Color output choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Automatically detect if terminal supports color
    Auto,
    /// Always use color
    Always,
    /// Never use color
    Never,
}

/// Lamina CLI main entry point
#[derive(Parser, Debug)]
#[command(name = "lamina")]
#[command(about = "Layered lint-configuration compiler for JavaScript and TypeScript")]
#[command(version)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,

    /// Output coloring
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,
}

/// Available lamina subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compile and print the final configuration blocks
    PrintConfig {
        /// Project directory (defaults to current directory)
        #[arg(long, default_value = ".")]
        cwd: String,

        /// Output format
        #[arg(short, long, default_value = "json")]
        format: OutputFormat,
    },

    /// Partition typed files by project-manifest membership
    ResolveProject {
        /// Project directory (defaults to current directory)
        #[arg(long, default_value = ".")]
        cwd: String,

        /// Candidate files (discovered from the project when omitted)
        files: Vec<String>,

        /// Output format
        #[arg(short, long, default_value = "human")]
        format: OutputFormat,
    },
}
