// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 pipecraft contributors

//! Refactor command

use colored::Colorize;
use miette::Result;
use std::path::PathBuf;

use super::{backend, write_output};
use crate::analyzer::refactor::refactor;
use crate::analyzer::RefactorIntent;
use crate::client::{CodeSource, PipelineService};
use crate::config::Settings;
use crate::errors::PipecraftError;

/// Run the refactor command
pub async fn run(
    file: PathBuf,
    intent: String,
    prompt: Option<String>,
    local: bool,
    output: Option<PathBuf>,
    settings: &Settings,
    verbose: bool,
) -> Result<()> {
    let intent = RefactorIntent::parse(&intent, prompt.as_deref())?;

    let code = std::fs::read_to_string(&file).map_err(|e| PipecraftError::FileReadError {
        path: file.clone(),
        error: e.to_string(),
    })?;

    let delegate = settings.refactor.delegate && !local;
    let backend = if delegate { backend(settings)? } else { None };
    let service = backend.as_ref().map(|b| b as &dyn PipelineService);

    let outcome = refactor(service, &code, &intent).await;

    match &outcome.source {
        CodeSource::Remote => {}
        CodeSource::Local => {
            eprintln!("{} Applied local '{}' transform", "→".blue(), intent.name());
        }
        CodeSource::Template { reason } => {
            eprintln!(
                "{} Backend unavailable, applied local '{}' transform",
                "⚠".yellow(),
                intent.name()
            );
            if verbose {
                eprintln!("  {}", reason.dimmed());
            }
        }
    }

    if outcome.code == code {
        eprintln!("{} The transform made no changes", "→".blue());
    }

    write_output(output.as_deref(), &outcome.code)?;
    Ok(())
}
