//! Print-config command implementation
//!
//! Compiles the project configuration the way the lint engine would receive
//! it and prints the resulting blocks.

use crate::cli::args::OutputFormat;
use crate::cli::common::{EXIT_ERROR, EXIT_SUCCESS, resolve_cwd};
use crate::output::printer::{ConfigHumanFormatter, ConfigJsonFormatter};

/// Run the print-config command
pub fn run_print_config(cwd: &str, format: OutputFormat) -> i32 {
    let cwd = resolve_cwd(cwd);

    match crate::lint::facade::compile(&cwd, &[]) {
        Ok(blocks) => {
            match format {
                OutputFormat::Json => ConfigJsonFormatter::new().write_to_stdout(&blocks),
                OutputFormat::Human => {
                    print!("{}", ConfigHumanFormatter::new().format(&blocks));
                }
            }
            EXIT_SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            EXIT_ERROR
        }
    }
}
