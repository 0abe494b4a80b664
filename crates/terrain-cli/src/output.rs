//! Shared output helpers for text and JSON modes.

use colored::Colorize;
use serde::Serialize;

use crate::OutputFormat;

/// Print a serializable result as pretty JSON.
pub fn print<T: Serialize>(value: &T, format: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match format {
        OutputFormat::Json => match serde_json::to_string_pretty(value) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("{}: failed to serialize result: {}", "Error".red().bold(), e),
        },
        OutputFormat::Text => {}
    }
}

/// Print a success line in text mode.
pub fn success(message: &str, format: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    if let OutputFormat::Text = format {
        println!("{} {}", "✓".green().bold(), message);
    }
}

/// Print an aligned `label: value` line.
pub fn field(label: &str, value: impl std::fmt::Display) {
    println!("  {}: {}", label.cyan(), value);
}
