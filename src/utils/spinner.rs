// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 pipecraft contributors

//! Progress indicators for backend calls

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::client::{SearchStep, StepKind, StepStatus};

/// Create a spinner for a backend call
pub fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner()
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
        .template("{spinner:.blue} {msg}")
    {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// One line of the agentic search trace
pub fn format_search_step(step: &SearchStep) -> String {
    let icon = match step.kind {
        StepKind::Web => "🌐",
        StepKind::Think => "💭",
        StepKind::Generate => "⚙",
        StepKind::Search => "🔍",
    };
    let status = match step.status {
        StepStatus::Complete => "✓".green(),
        StepStatus::Loading => "…".yellow(),
    };
    format!("  {} {} {} {}", status, icon, step.query, format!("({})", step.kind).dimmed())
}

/// Print the search trace returned by agentic generation
pub fn print_search_steps(steps: &[SearchStep]) {
    for step in steps {
        println!("{}", format_search_step(step));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_search_step() {
        colored::control::set_override(false);
        let step = SearchStep {
            query: "time series anomaly detection".into(),
            status: StepStatus::Complete,
            timestamp: 0,
            kind: StepKind::Search,
        };
        let line = format_search_step(&step);
        assert!(line.contains("time series anomaly detection"));
        assert!(line.ends_with("(search)"));
    }
}
