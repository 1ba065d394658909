//! Common helper functions shared across CLI commands

use crate::cli::args::ColorChoice;
use std::path::{Path, PathBuf};

/// Exit codes
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_ERROR: i32 = 2;

/// Maps the CLI color flag onto termcolor's stream choice
pub(crate) fn termcolor_choice(color: ColorChoice) -> termcolor::ColorChoice {
    match color {
        ColorChoice::Auto => {
            if std::io::IsTerminal::is_terminal(&std::io::stdout()) {
                termcolor::ColorChoice::Auto
            } else {
                termcolor::ColorChoice::Never
            }
        }
        ColorChoice::Always => termcolor::ColorChoice::Always,
        ColorChoice::Never => termcolor::ColorChoice::Never,
    }
}

/// Resolves a user-supplied directory argument against the process cwd
pub(crate) fn resolve_cwd(cwd: &str) -> PathBuf {
    let path = Path::new(cwd);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|current| current.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    }
}
