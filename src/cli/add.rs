// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 pipecraft contributors

//! Add command - append catalog components to a pipeline

use colored::Colorize;
use miette::Result;
use std::path::PathBuf;

use super::validate::print_plan;
use super::{explain_backend_error, load_pipeline, require_backend};
use crate::client::PipelineService;
use crate::config::Settings;
use crate::pipeline::{catalog, PipelineComponent, PipelineValidator};
use crate::utils::{create_spinner, print_validation};

/// Run the add command
pub async fn run(
    ids: Vec<String>,
    pipeline_path: PathBuf,
    remote: bool,
    force: bool,
    settings: &Settings,
    _verbose: bool,
) -> Result<()> {
    let mut pipeline = load_pipeline(&pipeline_path)?;

    let new: Vec<PipelineComponent> = ids
        .iter()
        .map(|id| catalog::require(id).map(|entry| entry.to_component()))
        .collect::<Result<_, _>>()?;

    let validation = PipelineValidator::validate_addition(&pipeline, &new);
    print_validation(&validation);

    if remote {
        let backend = require_backend(settings)?;
        let spinner = create_spinner("Checking with backend...");
        let response = backend.validate_pipeline(&pipeline.components, &new).await;
        spinner.finish_and_clear();

        let response = response.map_err(|e| explain_backend_error(e, settings))?;
        let message = response.message.unwrap_or_default();
        if response.valid {
            println!("  {} Backend: {}", "✓".green(), message);
        } else {
            println!("  {} Backend: {}", "✗".red(), message);
        }
        for note in response.restructuring_notes.iter().flatten() {
            println!("  {} {}", "→".blue(), note.dimmed());
        }
    }

    if !validation.is_valid() && !force {
        return Err(miette::miette!(
            "Adding {} would make the pipeline invalid. Use --force to add anyway.",
            ids.join(", ")
        ));
    }

    let assigned = pipeline.append_components(new);
    pipeline.save(&pipeline_path)?;

    for id in &assigned {
        println!("  {} Added {}", "✓".green(), id.bold());
    }

    let plan = PipelineValidator::suggest_order(&pipeline.components);
    if plan.needs_restructuring {
        print_plan(&plan);
    }

    Ok(())
}
