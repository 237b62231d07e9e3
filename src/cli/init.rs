// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 pipecraft contributors

//! Init command - create a pipeline file and settings

use colored::Colorize;
use miette::Result;
use std::path::Path;

use super::DEFAULT_PIPELINE;
use crate::config::{Settings, CONFIG_FILE};
use crate::pipeline::{catalog, Pipeline, ProblemType};

/// Run the init command
pub async fn run(name: Option<String>, template: String, force: bool, verbose: bool) -> Result<()> {
    let pipeline_name = name.unwrap_or_else(|| "Sensor Forecasting Pipeline".to_string());

    println!("{}", "Initializing pipecraft project...".bold());
    println!();

    let pipeline_path = Path::new(DEFAULT_PIPELINE);
    if pipeline_path.exists() && !force {
        return Err(miette::miette!(
            "{} already exists. Use --force to overwrite.",
            DEFAULT_PIPELINE
        ));
    }

    let pipeline = match template.as_str() {
        "example" => example_pipeline(&pipeline_name)?,
        "empty" => Pipeline::new(slug(&pipeline_name), pipeline_name.clone()),
        t => {
            return Err(miette::miette!(
                "Unknown template: '{}'\n\nAvailable templates:\n\
                 • example  - Scaler → time series transformer → JSON formatter\n\
                 • empty    - A pipeline with no components",
                t
            ));
        }
    };

    pipeline.save(pipeline_path)?;
    println!("  {} Created {}", "✓".green(), DEFAULT_PIPELINE);

    let config_path = Path::new(CONFIG_FILE);
    if !config_path.exists() || force {
        Settings::default().save(config_path)?;
        println!("  {} Created {}", "✓".green(), CONFIG_FILE);
    }

    println!();
    println!("{}", "Project initialized!".green().bold());
    println!();
    println!("Next steps:");
    println!("  1. Browse components with {}", "pipecraft catalog list".cyan());
    println!("  2. Add components with {}", "pipecraft add <id>".cyan());
    println!("  3. Export code with {}", "pipecraft code --framework sklearn".cyan());
    println!();

    if verbose {
        println!("{}:", "Components".bold());
        for component in &pipeline.components {
            println!("  - {} ({})", component.name, component.kind);
        }
    }

    Ok(())
}

/// The three-component forecasting pipeline built from catalog entries
pub fn example_pipeline(name: &str) -> crate::errors::PipecraftResult<Pipeline> {
    let mut pipeline = Pipeline::new(slug(name), name);
    pipeline.description = "Forecast sensor readings from scaled time series".to_string();

    let scaler = catalog::require("standard_scaler")?.to_component();
    let model = catalog::require("transformer_model")?
        .to_component()
        .with_problem_type(ProblemType::Regression);
    let formatter = catalog::require("json_exporter")?.to_component();

    pipeline.append_components(vec![scaler, model, formatter]);
    Ok(pipeline)
}

fn slug(name: &str) -> String {
    let slug: String = name
        .to_lowercase()
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-");
    if slug.is_empty() {
        "pipeline".to_string()
    } else {
        slug
    }
}
