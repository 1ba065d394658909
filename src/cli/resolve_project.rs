//! Resolve-project command implementation
//!
//! Partitions typed files by project-manifest membership and reports which
//! files need the synthesized fallback manifest.

use crate::cli::args::{ColorChoice, OutputFormat};
use crate::cli::common::{EXIT_ERROR, EXIT_SUCCESS, resolve_cwd, termcolor_choice};
use crate::lint::facade::discover_source_files;
use crate::output::printer::{MembershipHumanFormatter, MembershipJsonFormatter};
use crate::types::TS_EXTENSIONS;
use std::path::PathBuf;
use termcolor::StandardStream;

/// Run the resolve-project command
pub fn run_resolve_project(
    cwd: &str,
    files: &[String],
    format: OutputFormat,
    color: ColorChoice,
) -> i32 {
    let cwd = resolve_cwd(cwd);

    let candidates: Vec<PathBuf> = if files.is_empty() {
        match discover_source_files(&cwd, &TS_EXTENSIONS, false) {
            Ok(discovered) => discovered,
            Err(e) => {
                eprintln!("Error: {}", e);
                return EXIT_ERROR;
            }
        }
    } else {
        files.iter().map(PathBuf::from).collect()
    };

    match crate::project::membership::resolve(&cwd, &candidates) {
        Ok(result) => {
            match format {
                OutputFormat::Json => {
                    println!("{}", MembershipJsonFormatter::new().format(&result));
                }
                OutputFormat::Human => {
                    let mut stream = StandardStream::stdout(termcolor_choice(color));
                    if MembershipHumanFormatter::new()
                        .write_colored(&mut stream, &result)
                        .is_err()
                    {
                        print!("{}", MembershipHumanFormatter::new().format(&result));
                    }
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
