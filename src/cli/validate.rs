// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 pipecraft contributors

//! Validate command - check a pipeline

use colored::Colorize;
use miette::Result;
use std::path::PathBuf;

use super::load_pipeline;
use crate::pipeline::{PipelineValidator, RestructurePlan};

/// Run the validate command
pub async fn run(pipeline_path: PathBuf, verbose: bool) -> Result<()> {
    println!("{}", "Validating pipeline...".bold());
    println!();

    let pipeline = match load_pipeline(&pipeline_path) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("  {} Failed to parse pipeline", "✗".red());
            eprintln!();
            return Err(e.into());
        }
    };

    println!("  {} Pipeline file parsed", "✓".green());

    let validation = PipelineValidator::validate(&pipeline);

    if !validation.errors.is_empty() {
        println!();
        println!("{}:", "Errors".red().bold());
        for error in &validation.errors {
            println!("  {} {}", "✗".red(), error);
        }
    }

    if !validation.warnings.is_empty() {
        println!();
        println!("{}:", "Warnings".yellow().bold());
        for warning in &validation.warnings {
            println!("  {} {}", "⚠".yellow(), warning);
        }
    }

    let plan = PipelineValidator::suggest_order(&pipeline.components);
    if plan.needs_restructuring {
        print_plan(&plan);
    }

    if verbose {
        println!();
        println!("{}:", "Pipeline summary".bold());
        println!("  Name: {}", pipeline.name);
        println!("  Components: {}", pipeline.components.len());
        for component in &pipeline.components {
            println!(
                "    - {} ({}){}",
                component.name,
                component.kind,
                format!(" [{}]", component.id).dimmed()
            );
        }
    }

    println!();

    if !validation.is_valid() {
        Err(miette::miette!("Pipeline validation failed"))
    } else if validation.has_warnings() {
        println!("{}", "Pipeline is valid but has warnings.".yellow().bold());
        Ok(())
    } else {
        println!("{}", "Pipeline is valid!".green().bold());
        Ok(())
    }
}

/// Print a suggested order; nothing is reordered
pub(crate) fn print_plan(plan: &RestructurePlan) {
    println!();
    println!("{}:", "Suggested order".cyan().bold());
    for (i, id) in plan.order.iter().enumerate() {
        println!("  {}. {}", i + 1, id);
    }
    for note in &plan.notes {
        println!("  {} {}", "→".blue(), note.dimmed());
    }
}
