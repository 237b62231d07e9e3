// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 pipecraft contributors

//! Terminal color utilities

use colored::Colorize;

use crate::pipeline::ValidationResult;

/// Disable colors when `NO_COLOR` is set or output is not a terminal
pub fn configure_colors() {
    if std::env::var_os("NO_COLOR").is_some() || std::env::var_os("TERM").is_none() {
        colored::control::set_override(false);
    }
}

/// Print a styled header
pub fn print_header(title: &str) {
    println!("{}", title.bold());
    println!("{}", "═".repeat(title.chars().count().max(40)));
}

/// Print a styled section
pub fn print_section(title: &str) {
    println!();
    println!("{}:", title.bold());
}

pub fn print_bullet(content: &str) {
    println!("  • {}", content);
}

pub fn print_numbered(num: usize, content: &str) {
    println!("  {}. {}", num, content);
}

pub fn print_success(msg: &str) {
    println!("  {} {}", "✓".green(), msg);
}

pub fn print_error(msg: &str) {
    println!("  {} {}", "✗".red(), msg);
}

pub fn print_warning(msg: &str) {
    println!("  {} {}", "⚠".yellow(), msg);
}

pub fn print_info(msg: &str) {
    println!("  {} {}", "→".blue(), msg);
}

/// Print validation errors and warnings, or a success line
pub fn print_validation(result: &ValidationResult) {
    for error in &result.errors {
        print_error(error);
    }
    for warning in &result.warnings {
        print_warning(warning);
    }
    if result.is_valid() && !result.has_warnings() {
        print_success("No issues found");
    }
}
