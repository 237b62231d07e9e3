// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 pipecraft contributors

//! CLI command definitions and handlers

pub mod add;
pub mod catalog;
pub mod clarify;
pub mod code;
pub mod generate;
pub mod graph;
pub mod init;
pub mod recommend;
pub mod refactor;
pub mod validate;
pub mod watch;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::path::{Path, PathBuf};

use crate::client::{GenerationMode, HttpBackend};
use crate::config::Settings;
use crate::errors::{PipecraftError, RecoverySuggestion};
use crate::pipeline::Pipeline;

/// Default pipeline file
pub const DEFAULT_PIPELINE: &str = "pipeline.json";

/// ML pipeline authoring tool
///
/// Generate ML pipelines from natural language and export them as code.
#[derive(Parser, Debug)]
#[clap(
    name = "pipecraft",
    version,
    about = "Author ML pipelines from natural language and export them as PyTorch, TensorFlow or scikit-learn code",
    long_about = None,
    after_help = "Examples:\n\
        pipecraft init                                Start from the example pipeline\n\
        pipecraft generate \"forecast sensor data\"     Generate a pipeline from a prompt\n\
        pipecraft code --framework sklearn            Export the pipeline as Python\n\
        pipecraft watch -o pipeline.py                Regenerate code on every change\n\n\
        See 'pipecraft <command> --help' for more information on a specific command."
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[clap(short, long, global = true)]
    pub verbose: bool,

    /// Change to directory before executing
    #[clap(short = 'C', long, global = true, value_name = "DIR")]
    pub directory: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a pipeline file and pipecraft.toml
    Init {
        /// Pipeline name
        name: Option<String>,

        /// Starting point (example, empty)
        #[clap(short, long, default_value = "example")]
        template: String,

        /// Overwrite existing files
        #[clap(long)]
        force: bool,
    },

    /// Generate a pipeline from a natural-language prompt
    Generate {
        /// What the pipeline should do
        prompt: String,

        /// Quick generation or agentic search
        #[clap(short, long, value_enum, default_value = "quick")]
        mode: GenerationMode,

        /// Answer to a clarification question (id=value), repeatable
        #[clap(short, long = "answer", value_name = "ID=VALUE")]
        answers: Vec<String>,

        /// Where to write the pipeline
        #[clap(short, long, default_value = DEFAULT_PIPELINE)]
        output: PathBuf,
    },

    /// Ask the backend which questions to answer before generating
    Clarify {
        /// What the pipeline should do
        prompt: String,

        /// Problem domain
        #[clap(short, long, default_value = "general")]
        domain: String,
    },

    /// Export a pipeline as source code or as its JSON form
    Code {
        /// Pipeline file
        #[clap(default_value = DEFAULT_PIPELINE)]
        pipeline: PathBuf,

        /// Output language (python, json)
        #[clap(short, long)]
        language: Option<String>,

        /// Target framework (pytorch, tensorflow, sklearn)
        #[clap(short, long)]
        framework: Option<String>,

        /// Dataset description (JSON or YAML)
        #[clap(short, long)]
        dataset: Option<PathBuf>,

        /// Problem statement to embed in the code
        #[clap(short, long)]
        problem: Option<String>,

        /// Write to a file instead of stdout
        #[clap(short, long)]
        output: Option<PathBuf>,

        /// Never call the backend
        #[clap(long)]
        offline: bool,
    },

    /// Refactor a code file
    Refactor {
        /// Code file
        file: PathBuf,

        /// simplify, add-comments, optimize or custom
        #[clap(short, long, default_value = "simplify")]
        intent: String,

        /// Instruction for the custom intent
        #[clap(short, long)]
        prompt: Option<String>,

        /// Use local transforms only
        #[clap(long)]
        local: bool,

        /// Write to a file instead of stdout
        #[clap(short, long)]
        output: Option<PathBuf>,
    },

    /// Recommend hardware and platforms for a code file
    Recommend {
        /// Code file
        file: PathBuf,

        /// Pipeline the code was generated from
        #[clap(long)]
        pipeline: Option<PathBuf>,

        /// Output format
        #[clap(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Validate a pipeline
    Validate {
        /// Pipeline file
        #[clap(default_value = DEFAULT_PIPELINE)]
        pipeline: PathBuf,
    },

    /// Add catalog components to a pipeline
    Add {
        /// Catalog component ids
        #[clap(required = true)]
        ids: Vec<String>,

        /// Pipeline file
        #[clap(short, long, default_value = DEFAULT_PIPELINE)]
        pipeline: PathBuf,

        /// Also ask the backend to validate the addition
        #[clap(long)]
        remote: bool,

        /// Add even when validation reports errors
        #[clap(long)]
        force: bool,
    },

    /// Browse the component catalog
    Catalog {
        #[clap(subcommand)]
        action: CatalogAction,
    },

    /// Show pipeline as a graph
    Graph {
        /// Pipeline file
        #[clap(default_value = DEFAULT_PIPELINE)]
        pipeline: PathBuf,

        /// Output format
        #[clap(short, long, value_enum, default_value = "text")]
        format: GraphFormat,
    },

    /// Watch mode - regenerate code when the pipeline changes
    Watch {
        /// Pipeline file
        #[clap(default_value = DEFAULT_PIPELINE)]
        pipeline: PathBuf,

        /// Output language (python, json)
        #[clap(short, long)]
        language: Option<String>,

        /// Target framework (pytorch, tensorflow, sklearn)
        #[clap(short, long)]
        framework: Option<String>,

        /// Dataset description (JSON or YAML)
        #[clap(short, long)]
        dataset: Option<PathBuf>,

        /// File to write the code to
        #[clap(short, long)]
        output: PathBuf,

        /// Debounce delay in milliseconds
        #[clap(long, default_value = "500")]
        debounce: u64,
    },
}

/// Catalog actions
#[derive(Subcommand, Debug, Clone)]
pub enum CatalogAction {
    /// List catalog entries
    List {
        /// Only entries of this kind
        #[clap(short, long)]
        kind: Option<String>,
    },

    /// Show one entry
    Show {
        /// Component id
        id: String,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Graph output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GraphFormat {
    Text,
    Dot,
    Mermaid,
}

/// Load a pipeline file, printing how to create one when it is missing
pub(crate) fn load_pipeline(path: &Path) -> Result<Pipeline, PipecraftError> {
    Pipeline::from_file(path).inspect_err(|e| {
        if let Some(suggestion) = RecoverySuggestion::for_error(e, "") {
            eprintln!("{}", suggestion);
        }
    })
}

/// Backend client, or `None` when the backend is disabled
pub(crate) fn backend(settings: &Settings) -> Result<Option<HttpBackend>, PipecraftError> {
    if !settings.backend.enabled {
        tracing::debug!("Backend disabled in settings");
        return Ok(None);
    }
    HttpBackend::from_settings(&settings.backend).map(Some)
}

/// Backend client for commands that have no local substitute
pub(crate) fn require_backend(settings: &Settings) -> Result<HttpBackend, PipecraftError> {
    HttpBackend::from_settings(&settings.backend)
}

/// Print recovery steps for a backend failure and pass the error on
pub(crate) fn explain_backend_error(err: PipecraftError, settings: &Settings) -> PipecraftError {
    if let Some(suggestion) = RecoverySuggestion::for_error(&err, &settings.backend.url) {
        eprintln!();
        eprintln!("{}", suggestion.to_string().dimmed());
    }
    err
}

/// Write output to a file, or to stdout when no path is given
pub(crate) fn write_output(output: Option<&Path>, content: &str) -> Result<(), PipecraftError> {
    match output {
        Some(path) => std::fs::write(path, content).map_err(|e| PipecraftError::FileWriteError {
            path: path.to_path_buf(),
            error: e.to_string(),
        }),
        None => {
            print!("{}", content);
            Ok(())
        }
    }
}
