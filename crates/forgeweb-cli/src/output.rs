//! Output formatting utilities for the CLI.

use colored::Colorize;

/// Print an error message.
pub fn error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

/// Print a usage line after an error.
pub fn usage(usage: &str) {
    eprintln!("\n{usage}");
}

/// Print the status of a failed external program.
///
/// Goes to stdout, after the program's own output.
pub fn fatal(message: &str) {
    println!("{} {}", "✗".red().bold(), message);
}
