//! Lamina CLI entry point

use clap::Parser;
use lamina::cli::{Command, args::Cli};
use std::process;

fn main() {
    let cli = Cli::parse();

    let exit_code = match cli.command {
        Command::PrintConfig { cwd, format } => {
            lamina::cli::print_config::run_print_config(&cwd, format)
        }
        Command::ResolveProject { cwd, files, format } => {
            lamina::cli::resolve_project::run_resolve_project(&cwd, &files, format, cli.color)
        }
    };

    process::exit(exit_code);
}
