// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 pipecraft contributors

//! Recommend command - suggest hardware and platforms

use colored::Colorize;
use miette::Result;
use std::path::PathBuf;

use super::{load_pipeline, OutputFormat};
use crate::analyzer::{Analysis, CodeAnalyzer};
use crate::utils::{print_bullet, print_header, print_numbered, print_section};

/// Run the recommend command
pub async fn run(
    file: PathBuf,
    pipeline: Option<PathBuf>,
    format: OutputFormat,
    _verbose: bool,
) -> Result<()> {
    let pipeline = pipeline.as_deref().map(load_pipeline).transpose()?;
    let analysis = CodeAnalyzer::new().analyze(&file, pipeline.as_ref()).await?;

    match format {
        OutputFormat::Text => print_text(&file, &analysis),
        OutputFormat::Json => print_json(&analysis)?,
    }

    Ok(())
}

fn print_text(file: &std::path::Path, analysis: &Analysis) {
    print_header(&format!("Deployment recommendation: {}", file.display()));

    let labels = analysis.signals.labels();
    print_section("Detected");
    if labels.is_empty() {
        print_bullet("no GPU-bound workload");
    } else {
        for label in labels {
            print_bullet(label);
        }
    }

    print_section("Hardware");
    for (i, hw) in analysis.recommendation.hardware.iter().enumerate() {
        print_numbered(
            i + 1,
            &format!(
                "{} {} {}",
                hw.name.bold(),
                format!("${:.2}/hr", hw.hourly_cost).green(),
                hw.description.dimmed()
            ),
        );
    }

    print_section("Platforms");
    for platform in &analysis.recommendation.platforms {
        print_bullet(&format!("{} {}", platform.name.bold(), platform.reason.dimmed()));
    }

    print_section("Why");
    for reason in &analysis.recommendation.rationale {
        print_bullet(reason);
    }
    println!();
    println!("{}", "Recommendations are heuristic, based on keywords in the code.".dimmed());
}

fn print_json(analysis: &Analysis) -> Result<()> {
    let rec = &analysis.recommendation;
    let json = serde_json::json!({
        "signals": {
            "requires_training": analysis.signals.requires_training,
            "uses_large_models": analysis.signals.uses_large_models,
            "computer_vision": analysis.signals.computer_vision,
            "latency_bound": analysis.signals.latency_bound,
        },
        "hardware": rec.hardware.iter().map(|hw| serde_json::json!({
            "name": hw.name,
            "description": hw.description,
            "hourly_cost": hw.hourly_cost,
        })).collect::<Vec<_>>(),
        "platforms": rec.platforms.iter().map(|p| serde_json::json!({
            "name": p.name,
            "reason": p.reason,
        })).collect::<Vec<_>>(),
        "rationale": rec.rationale,
    });

    let text = serde_json::to_string_pretty(&json).map_err(crate::errors::PipecraftError::from)?;
    println!("{}", text);
    Ok(())
}
