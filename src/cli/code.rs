// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 pipecraft contributors

//! Code command - export a pipeline

use colored::Colorize;
use miette::Result;
use std::path::{Path, PathBuf};

use super::{backend, load_pipeline, write_output};
use crate::client::{generate_with_fallback, CodeSource, PipelineService};
use crate::codegen::{Framework, Language};
use crate::config::Settings;
use crate::errors::PipecraftResult;
use crate::pipeline::DatasetInfo;

/// Run the code command
#[allow(clippy::too_many_arguments)]
pub async fn run(
    pipeline_path: PathBuf,
    language: Option<String>,
    framework: Option<String>,
    dataset: Option<PathBuf>,
    problem: Option<String>,
    output: Option<PathBuf>,
    offline: bool,
    settings: &Settings,
    verbose: bool,
) -> Result<()> {
    let (language, framework) = resolve_target(language.as_deref(), framework.as_deref(), settings)?;
    let pipeline = load_pipeline(&pipeline_path)?;
    let dataset = load_dataset(dataset.as_deref())?;

    let backend = if offline { None } else { backend(settings)? };
    let service = backend.as_ref().map(|b| b as &dyn PipelineService);

    let outcome = generate_with_fallback(
        service,
        &pipeline,
        language,
        framework,
        dataset.as_ref(),
        problem.as_deref(),
    )
    .await?;

    if let CodeSource::Template { reason } = &outcome.source {
        eprintln!(
            "{} Backend unavailable, generated from local templates",
            "⚠".yellow()
        );
        if verbose {
            eprintln!("  {}", reason.dimmed());
        }
    }

    write_output(output.as_deref(), &outcome.code)?;

    if let Some(path) = &output {
        let target = match language {
            Language::Json => language.to_string(),
            Language::Python => format!("{}, {}", language, framework),
        };
        eprintln!("  {} Wrote {} ({})", "✓".green(), path.display(), target);
    }

    Ok(())
}

/// Language and framework from flags, falling back to settings.
///
/// The framework is only checked for source-code output.
pub(crate) fn resolve_target(
    language: Option<&str>,
    framework: Option<&str>,
    settings: &Settings,
) -> PipecraftResult<(Language, Framework)> {
    let language = match language {
        Some(l) => l.parse()?,
        None => settings.codegen.language,
    };

    let framework = match (language, framework) {
        (Language::Python, Some(f)) => f.parse()?,
        _ => settings.codegen.framework,
    };

    Ok((language, framework))
}

pub(crate) fn load_dataset(path: Option<&Path>) -> PipecraftResult<Option<DatasetInfo>> {
    path.map(DatasetInfo::from_file).transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::PipecraftError;

    #[test]
    fn test_resolve_target_defaults() {
        let settings = Settings::default();
        let (language, framework) = resolve_target(None, None, &settings).unwrap();
        assert_eq!(language, Language::Python);
        assert_eq!(framework, Framework::PyTorch);
    }

    #[test]
    fn test_json_ignores_framework() {
        let settings = Settings::default();
        let (language, _) = resolve_target(Some("json"), Some("jax"), &settings).unwrap();
        assert_eq!(language, Language::Json);
    }

    #[test]
    fn test_unsupported_framework_for_python() {
        let settings = Settings::default();
        let err = resolve_target(Some("python"), Some("jax"), &settings).unwrap_err();
        assert!(matches!(err, PipecraftError::UnsupportedFramework { .. }));
    }
}
