// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 infrascope contributors

//! Terminal color utilities
//!
//! Provides consistent color schemes across the CLI.

use colored::{ColoredString, Colorize};

use crate::analyzer::{ComplexityLevel, Confidence};

/// Color a confidence level: green for high, yellow for medium, red for low
pub fn confidence(level: Confidence) -> ColoredString {
    let label = format!("{:?}", level).to_lowercase();
    match level {
        Confidence::High => label.green().bold(),
        Confidence::Medium => label.yellow().bold(),
        Confidence::Low => label.red().bold(),
    }
}

/// Color a complexity bucket
pub fn complexity(level: ComplexityLevel) -> ColoredString {
    let label = format!("{:?}", level).to_lowercase();
    match level {
        ComplexityLevel::Simple => label.green(),
        ComplexityLevel::Moderate => label.yellow(),
        ComplexityLevel::Complex => label.red(),
    }
}

/// Print a styled header
pub fn print_header(title: &str) {
    println!("{}", title.bold());
    println!("{}", "═".repeat(title.chars().count().max(50)));
}

/// Print a styled section
pub fn print_section(title: &str) {
    println!();
    println!("{}:", title.bold());
}

/// Print a bullet point
pub fn print_bullet(content: &str) {
    println!("  • {}", content);
}

/// Print a success check
pub fn print_success(msg: &str) {
    println!("  {} {}", "✓".green(), msg);
}

/// Print an error cross
pub fn print_error(msg: &str) {
    println!("  {} {}", "✗".red(), msg);
}

/// Print a warning
pub fn print_warning(msg: &str) {
    println!("  {} {}", "⚠".yellow(), msg);
}
