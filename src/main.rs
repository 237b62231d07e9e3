// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 pipecraft contributors

//! pipecraft - ML pipeline authoring tool

use clap::Parser;
use miette::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pipecraft::cli::{Cli, Commands};
use pipecraft::config::Settings;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "pipecraft=debug" } else { "pipecraft=info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    pipecraft::utils::configure_colors();

    // Change to specified directory if provided
    if let Some(ref dir) = cli.directory {
        std::env::set_current_dir(dir).map_err(|e| {
            miette::miette!("Failed to change to directory '{}': {}", dir.display(), e)
        })?;
    }

    let cwd = std::env::current_dir()
        .map_err(|e| miette::miette!("Failed to get current directory: {}", e))?;
    let settings = Settings::discover(&cwd)?;
    let verbose = cli.verbose;

    // Dispatch to command handlers
    match cli.command {
        Commands::Init {
            name,
            template,
            force,
        } => pipecraft::cli::init::run(name, template, force, verbose).await,
        Commands::Generate {
            prompt,
            mode,
            answers,
            output,
        } => pipecraft::cli::generate::run(prompt, mode, answers, output, &settings, verbose).await,
        Commands::Clarify { prompt, domain } => {
            pipecraft::cli::clarify::run(prompt, domain, &settings, verbose).await
        }
        Commands::Code {
            pipeline,
            language,
            framework,
            dataset,
            problem,
            output,
            offline,
        } => {
            pipecraft::cli::code::run(
                pipeline, language, framework, dataset, problem, output, offline, &settings, verbose,
            )
            .await
        }
        Commands::Refactor {
            file,
            intent,
            prompt,
            local,
            output,
        } => pipecraft::cli::refactor::run(file, intent, prompt, local, output, &settings, verbose).await,
        Commands::Recommend {
            file,
            pipeline,
            format,
        } => pipecraft::cli::recommend::run(file, pipeline, format, verbose).await,
        Commands::Validate { pipeline } => pipecraft::cli::validate::run(pipeline, verbose).await,
        Commands::Add {
            ids,
            pipeline,
            remote,
            force,
        } => pipecraft::cli::add::run(ids, pipeline, remote, force, &settings, verbose).await,
        Commands::Catalog { action } => pipecraft::cli::catalog::run(action, verbose).await,
        Commands::Graph { pipeline, format } => pipecraft::cli::graph::run(pipeline, format, verbose).await,
        Commands::Watch {
            pipeline,
            language,
            framework,
            dataset,
            output,
            debounce,
        } => {
            pipecraft::cli::watch::run(
                pipeline, language, framework, dataset, output, debounce, &settings, verbose,
            )
            .await
        }
    }
}
