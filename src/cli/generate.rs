// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 pipecraft contributors

//! Generate command - turn a prompt into a pipeline

use colored::Colorize;
use miette::Result;
use std::collections::BTreeMap;
use std::path::PathBuf;

use super::{explain_backend_error, require_backend};
use crate::client::{GeneratePipelineRequest, GenerationMode, PipelineService};
use crate::config::Settings;
use crate::errors::PipecraftError;
use crate::pipeline::{Pipeline, PipelineValidator};
use crate::utils::{create_spinner, print_search_steps, print_validation};

/// Run the generate command
pub async fn run(
    prompt: String,
    mode: GenerationMode,
    answers: Vec<String>,
    output: PathBuf,
    settings: &Settings,
    verbose: bool,
) -> Result<()> {
    let backend = require_backend(settings)?;
    let clarification_answers = parse_answers(&answers)?;

    let request = GeneratePipelineRequest {
        prompt: prompt.clone(),
        mode,
        clarification_answers,
    };

    let spinner = create_spinner(match mode {
        GenerationMode::Quick => "Generating pipeline...",
        GenerationMode::Agentic => "Searching and generating pipeline...",
    });
    let response = backend.generate_pipeline(&request).await;
    spinner.finish_and_clear();

    let response = response.map_err(|e| explain_backend_error(e, settings))?;

    if let Some(steps) = &response.search_steps {
        println!("{}", "Search trace".bold());
        print_search_steps(steps);
        println!();
    }

    let pipeline = Pipeline::from_generated(response, &prompt);
    pipeline.save(&output)?;

    println!(
        "  {} {} ({} components, {} models) → {}",
        "✓".green(),
        pipeline.name.bold(),
        pipeline.components.len(),
        pipeline.total_models,
        output.display()
    );

    if verbose {
        for (i, component) in pipeline.components.iter().enumerate() {
            println!("    {}. {} ({})", i + 1, component.name, component.kind);
            if let Some(reason) = &component.selection_reason {
                println!("       {}", reason.dimmed());
            }
        }
    }

    let validation = PipelineValidator::validate(&pipeline);
    if !validation.is_valid() || validation.has_warnings() {
        println!();
        print_validation(&validation);
    }

    Ok(())
}

/// Parse `id=value` pairs
fn parse_answers(answers: &[String]) -> Result<Option<BTreeMap<String, String>>, PipecraftError> {
    if answers.is_empty() {
        return Ok(None);
    }

    answers
        .iter()
        .map(|pair| match pair.split_once('=') {
            Some((id, value)) if !id.trim().is_empty() => {
                Ok((id.trim().to_string(), value.trim().to_string()))
            }
            _ => Err(PipecraftError::Config {
                message: format!("invalid answer '{}'", pair),
                help: Some("Answers take the form question_id=value".into()),
            }),
        })
        .collect::<Result<BTreeMap<_, _>, _>>()
        .map(Some)
}
