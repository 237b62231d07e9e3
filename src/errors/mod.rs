// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 pipecraft contributors

//! Error types with actionable messages
//!
//! Configuration mistakes (unknown framework or language) fail loudly, backend
//! outages carry enough context for the CLI to explain the degraded mode.

mod recovery;

pub use recovery::RecoverySuggestion;

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for pipecraft operations
pub type PipecraftResult<T> = Result<T, PipecraftError>;

/// Main error type for pipecraft
#[derive(Error, Debug, Diagnostic)]
pub enum PipecraftError {
    // ─────────────────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("Unsupported framework: '{framework}'")]
    #[diagnostic(
        code(pipecraft::unsupported_framework),
        help("Supported frameworks: pytorch, tensorflow, sklearn")
    )]
    UnsupportedFramework { framework: String },

    #[error("Unsupported language: '{language}'")]
    #[diagnostic(
        code(pipecraft::unsupported_language),
        help("Supported languages: python (source code), json (structural dump)")
    )]
    UnsupportedLanguage { language: String },

    #[error("Unknown refactor intent: '{intent}'")]
    #[diagnostic(
        code(pipecraft::unknown_refactor_intent),
        help("Available intents: simplify, add-comments, optimize, custom")
    )]
    UnknownRefactorIntent { intent: String },

    #[error("Invalid configuration: {message}")]
    #[diagnostic(code(pipecraft::config_error))]
    Config {
        message: String,
        #[help]
        help: Option<String>,
    },

    // ─────────────────────────────────────────────────────────────────────────
    // Pipeline Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("Pipeline file not found: {path}")]
    #[diagnostic(
        code(pipecraft::pipeline_not_found),
        help("Create a pipeline with 'pipecraft init' or 'pipecraft generate <prompt>'")
    )]
    PipelineNotFound { path: PathBuf },

    #[error("Invalid pipeline: {reason}")]
    #[diagnostic(code(pipecraft::invalid_pipeline))]
    InvalidPipeline {
        reason: String,
        #[help]
        help: Option<String>,
    },

    #[error("Component '{id}' not found in catalog")]
    #[diagnostic(
        code(pipecraft::component_not_found),
        help("Run 'pipecraft catalog list' to see available components")
    )]
    ComponentNotFound { id: String },

    // ─────────────────────────────────────────────────────────────────────────
    // Backend Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("Backend request to {endpoint} failed: {message}")]
    #[diagnostic(code(pipecraft::backend_unreachable))]
    Backend {
        endpoint: String,
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Backend returned {status} for {endpoint}: {detail}")]
    #[diagnostic(code(pipecraft::backend_status))]
    BackendStatus {
        endpoint: String,
        status: u16,
        detail: String,
    },

    #[error("Backend is disabled in configuration")]
    #[diagnostic(
        code(pipecraft::backend_disabled),
        help("Set backend.enabled = true in pipecraft.toml")
    )]
    BackendDisabled,

    // ─────────────────────────────────────────────────────────────────────────
    // File Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("Failed to read file '{path}': {error}")]
    #[diagnostic(code(pipecraft::file_read_error))]
    FileReadError { path: PathBuf, error: String },

    #[error("Failed to write file '{path}': {error}")]
    #[diagnostic(code(pipecraft::file_write_error))]
    FileWriteError { path: PathBuf, error: String },

    // ─────────────────────────────────────────────────────────────────────────
    // IO/System Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("IO error: {message}")]
    #[diagnostic(code(pipecraft::io_error))]
    Io { message: String },

    #[error("YAML parsing error: {message}")]
    #[diagnostic(code(pipecraft::yaml_error))]
    Yaml { message: String },

    #[error("JSON parsing error: {message}")]
    #[diagnostic(code(pipecraft::json_error))]
    Json { message: String },

    #[error("TOML parsing error: {message}")]
    #[diagnostic(code(pipecraft::toml_error))]
    Toml { message: String },
}

impl From<std::io::Error> for PipecraftError {
    fn from(e: std::io::Error) -> Self {
        Self::Io { message: e.to_string() }
    }
}

impl From<serde_yaml::Error> for PipecraftError {
    fn from(e: serde_yaml::Error) -> Self {
        Self::Yaml { message: e.to_string() }
    }
}

impl From<serde_json::Error> for PipecraftError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json { message: e.to_string() }
    }
}

impl From<toml::de::Error> for PipecraftError {
    fn from(e: toml::de::Error) -> Self {
        Self::Toml { message: e.to_string() }
    }
}

impl PipecraftError {
    /// Create a transport-level backend error with a hint about the URL
    pub fn backend_unreachable(endpoint: &str, base_url: &str, error: impl std::fmt::Display) -> Self {
        Self::Backend {
            endpoint: endpoint.to_string(),
            message: error.to_string(),
            help: Some(format!(
                "Is the pipeline backend running at {}? Set backend.url in pipecraft.toml \
                 or PIPECRAFT_BACKEND_URL to point elsewhere.",
                base_url
            )),
        }
    }

    /// Whether this error came from a remote collaborator rather than local input
    pub fn is_backend_failure(&self) -> bool {
        matches!(
            self,
            Self::Backend { .. } | Self::BackendStatus { .. } | Self::BackendDisabled
        )
    }

    /// Whether this error is a caller configuration error
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedFramework { .. }
                | Self::UnsupportedLanguage { .. }
                | Self::UnknownRefactorIntent { .. }
        )
    }
}
