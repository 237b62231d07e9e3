// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 pipecraft contributors

//! Watch command - regenerate code when the pipeline changes

use colored::Colorize;
use miette::Result;
use notify::RecursiveMode;
use notify_debouncer_mini::{new_debouncer, DebouncedEventKind};
use std::path::{Path, PathBuf};
use std::sync::mpsc::channel;
use std::time::Duration;

use super::code::{load_dataset, resolve_target};
use super::write_output;
use crate::codegen::{CodeCache, Framework, Language};
use crate::config::Settings;
use crate::errors::PipecraftResult;
use crate::pipeline::Pipeline;

struct WatchTarget {
    pipeline: PathBuf,
    dataset: Option<PathBuf>,
    output: PathBuf,
    language: Language,
    framework: Framework,
}

/// Run the watch command
#[allow(clippy::too_many_arguments)]
pub async fn run(
    pipeline_path: PathBuf,
    language: Option<String>,
    framework: Option<String>,
    dataset: Option<PathBuf>,
    output: PathBuf,
    debounce_ms: u64,
    settings: &Settings,
    verbose: bool,
) -> Result<()> {
    let (language, framework) = resolve_target(language.as_deref(), framework.as_deref(), settings)?;

    if !pipeline_path.exists() {
        return Err(crate::errors::PipecraftError::PipelineNotFound { path: pipeline_path }.into());
    }

    let target = WatchTarget {
        pipeline: pipeline_path,
        dataset,
        output,
        language,
        framework,
    };

    println!("{}", "Starting watch mode...".bold());
    println!(
        "Regenerating {} on changes to {} (debounce: {}ms)",
        target.output.display(),
        target.pipeline.display(),
        debounce_ms
    );
    println!("Press {} to exit.", "Ctrl+C".cyan());
    println!();

    let (tx, rx) = channel();

    let mut debouncer = new_debouncer(Duration::from_millis(debounce_ms), tx)
        .map_err(|e| miette::miette!("Failed to create file watcher: {}", e))?;

    let mut watched_dirs = vec![watch_dir(&target.pipeline)];
    if let Some(dataset) = &target.dataset {
        let dir = watch_dir(dataset);
        if !watched_dirs.contains(&dir) {
            watched_dirs.push(dir);
        }
    }
    for dir in &watched_dirs {
        debouncer
            .watcher()
            .watch(dir, RecursiveMode::NonRecursive)
            .map_err(|e| miette::miette!("Failed to start watching {}: {}", dir.display(), e))?;
    }

    let mut cache = CodeCache::new();
    regenerate(&target, &mut cache);

    loop {
        match rx.recv() {
            Ok(Ok(events)) => {
                let relevant: Vec<_> = events
                    .iter()
                    .filter(|e| matches!(e.kind, DebouncedEventKind::Any))
                    .filter(|e| target.is_input(&e.path))
                    .collect();

                if !relevant.is_empty() {
                    println!();
                    println!("{}", "─".repeat(50).dimmed());
                    println!("{}: {} file(s) changed", "Change detected".yellow(), relevant.len());

                    if verbose {
                        for event in &relevant {
                            println!("  {}", event.path.display());
                        }
                    }

                    regenerate(&target, &mut cache);
                }
            }
            Ok(Err(e)) => {
                eprintln!("{}: {:?}", "Watch error".red(), e);
            }
            Err(e) => {
                eprintln!("{}: {}", "Channel error".red(), e);
                break;
            }
        }
    }

    Ok(())
}

impl WatchTarget {
    fn is_input(&self, path: &Path) -> bool {
        let name = path.file_name();
        let matches = |p: &Path| name.is_some() && name == p.file_name();
        matches(&self.pipeline) || self.dataset.as_deref().is_some_and(matches)
    }
}

fn watch_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn regenerate(target: &WatchTarget, cache: &mut CodeCache) {
    let start = std::time::Instant::now();
    let misses = cache.misses();

    match generate_into(target, cache) {
        Ok(()) if cache.misses() == misses => {
            println!("{}", "No pipeline changes, code is up to date".dimmed());
        }
        Ok(()) => {
            println!(
                "{} {} ({:.2}s)",
                "Regenerated".green(),
                target.output.display(),
                start.elapsed().as_secs_f64()
            );
        }
        Err(e) => {
            eprintln!("{}: {}", "Generation failed".red(), e);
        }
    }
}

fn generate_into(target: &WatchTarget, cache: &mut CodeCache) -> PipecraftResult<()> {
    let pipeline = Pipeline::from_file(&target.pipeline)?;
    let dataset = load_dataset(target.dataset.as_deref())?;

    let misses = cache.misses();
    let code = cache
        .get_or_generate(&pipeline, target.language, target.framework, dataset.as_ref(), None)?
        .to_string();

    if cache.misses() != misses {
        write_output(Some(&target.output), &code)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_generate_into_writes_once_per_change() {
        let dir = TempDir::new().unwrap();
        let pipeline_path = dir.path().join("pipeline.json");
        let output = dir.path().join("pipeline.py");

        crate::cli::init::example_pipeline("Watch").unwrap().save(&pipeline_path).unwrap();

        let target = WatchTarget {
            pipeline: pipeline_path.clone(),
            dataset: None,
            output: output.clone(),
            language: Language::Python,
            framework: Framework::Sklearn,
        };
        let mut cache = CodeCache::new();

        generate_into(&target, &mut cache).unwrap();
        let first = std::fs::read_to_string(&output).unwrap();
        assert!(first.contains("class Watch"));

        generate_into(&target, &mut cache).unwrap();
        assert_eq!(cache.hits(), 1);
        assert_eq!(cache.misses(), 1);
    }

    #[test]
    fn test_is_input_matches_file_name() {
        let target = WatchTarget {
            pipeline: PathBuf::from("pipeline.json"),
            dataset: Some(PathBuf::from("data/dataset.yaml")),
            output: PathBuf::from("pipeline.py"),
            language: Language::Python,
            framework: Framework::PyTorch,
        };
        assert!(target.is_input(Path::new("/work/pipeline.json")));
        assert!(target.is_input(Path::new("/work/data/dataset.yaml")));
        assert!(!target.is_input(Path::new("/work/pipeline.py")));
    }

    #[test]
    fn test_watch_dir_defaults_to_cwd() {
        assert_eq!(watch_dir(Path::new("pipeline.json")), PathBuf::from("."));
        assert_eq!(watch_dir(Path::new("conf/pipeline.json")), PathBuf::from("conf"));
    }
}
