//! CLI command definitions and argument parsing.
//!
//! Uses clap derive macros for ergonomic argument definitions.

pub mod args;

use colored::Colorize;

/// Print a one-line warning to stderr, keeping stdout clean for output.
pub fn warn(message: &str) {
    eprintln!("  {} {}", "⚠".yellow().bold(), message.yellow());
}

/// Print a one-line note to stderr.
pub fn note(message: &str) {
    eprintln!("  {} {}", "ℹ".dimmed(), message.dimmed());
}
