// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 pipecraft contributors

//! Clarify command - list questions worth answering before generating

use colored::Colorize;
use miette::Result;

use super::{explain_backend_error, require_backend};
use crate::client::{PipelineService, QuestionKind};
use crate::config::Settings;
use crate::utils::{create_spinner, print_header};

/// Run the clarify command
pub async fn run(prompt: String, domain: String, settings: &Settings, _verbose: bool) -> Result<()> {
    let backend = require_backend(settings)?;

    let spinner = create_spinner("Preparing questions...");
    let response = backend.generate_clarification(&prompt, &domain).await;
    spinner.finish_and_clear();

    let response = response.map_err(|e| explain_backend_error(e, settings))?;

    print_header("Clarification questions");
    if !response.context.is_empty() {
        println!("{}", response.context.dimmed());
    }
    println!();

    for question in &response.questions {
        println!("  {} {}", format!("[{}]", question.id).cyan(), question.question);
        match question.kind {
            QuestionKind::Select => {
                for option in question.options.iter().flatten() {
                    println!("      • {}", option);
                }
            }
            QuestionKind::Text | QuestionKind::Number => {
                if let Some(placeholder) = &question.placeholder {
                    println!("      {}", placeholder.dimmed());
                }
            }
        }
    }

    if let Some(first) = response.questions.first() {
        println!();
        println!(
            "Answer with {}",
            format!("pipecraft generate \"{}\" --answer {}=<value>", prompt, first.id).cyan()
        );
    }

    Ok(())
}
