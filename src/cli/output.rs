//! Terminal output formatting with colors
//!
//! Respects NO_COLOR, CLICOLOR, CLICOLOR_FORCE automatically.
//! Stdout writes return errors instead of panicking, so a closed pipe
//! (`rstree tree m.json | head`) surfaces as an I/O error.

use std::io::{self, Write};

use colored::Colorize;

use crate::infrastructure::{InfraError, InfraResult};

/// Print error (red bold "error:" prefix) to stderr
pub fn error(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

/// Print warning (yellow "Warning:" prefix) to stderr
pub fn warning(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "Warning".yellow(), msg);
}

/// Print section header (cyan bold)
pub fn header(msg: &(impl std::fmt::Display + ?Sized)) -> InfraResult<()> {
    write_line(&mut io::stdout().lock(), &msg.to_string().cyan().bold())
}

/// Print plain output (no color, for trees and JSON)
pub fn info(msg: &(impl std::fmt::Display + ?Sized)) -> InfraResult<()> {
    write_line(&mut io::stdout().lock(), msg)
}

fn write_line(out: &mut impl Write, msg: &(impl std::fmt::Display + ?Sized)) -> InfraResult<()> {
    writeln!(out, "{}", msg)
        .and_then(|_| out.flush())
        .map_err(|e| InfraError::io("write output", e))
}
