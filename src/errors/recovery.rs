// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 pipecraft contributors

//! Error recovery suggestions
//!
//! Provides actionable suggestions for recovering from errors.

use super::PipecraftError;

/// A recovery suggestion with concrete steps
#[derive(Debug, Clone)]
pub struct RecoverySuggestion {
    /// Brief description of what to do
    pub action: String,
    /// Detailed steps
    pub steps: Vec<String>,
    /// Commands to run
    pub commands: Vec<String>,
}

impl RecoverySuggestion {
    /// Suggest starting or pointing at the pipeline backend
    pub fn start_backend(base_url: &str) -> Self {
        Self {
            action: "Start the pipeline backend".into(),
            steps: vec![
                format!("No response from {}", base_url),
                "Pipeline generation, clarification and refactoring need the backend".into(),
                "Code export keeps working offline with template-based generation".into(),
            ],
            commands: vec![
                "# Run the backend locally:".into(),
                "uvicorn app.main:app --port 8000".into(),
                "".into(),
                "# Or point pipecraft at another instance:".into(),
                "export PIPECRAFT_BACKEND_URL=http://host:8000".into(),
            ],
        }
    }

    /// Suggest creating a pipeline file
    pub fn create_pipeline() -> Self {
        Self {
            action: "Create a pipeline definition".into(),
            steps: vec![
                "No pipeline file found".into(),
                "Generate one from a prompt or start from the example pipeline".into(),
            ],
            commands: vec![
                "# From a natural-language prompt:".into(),
                "pipecraft generate \"forecast sensor readings\"".into(),
                "".into(),
                "# From the built-in example:".into(),
                "pipecraft init".into(),
            ],
        }
    }

    /// Suggest valid framework or language values
    pub fn choose_supported_target() -> Self {
        Self {
            action: "Pick a supported export target".into(),
            steps: vec![
                "Languages: python (source code), json (pipeline dump)".into(),
                "Frameworks: pytorch, tensorflow, sklearn".into(),
            ],
            commands: vec!["pipecraft code pipeline.json --language python --framework sklearn".into()],
        }
    }

    /// Pick a suggestion for an error, if one applies
    pub fn for_error(error: &PipecraftError, base_url: &str) -> Option<Self> {
        match error {
            PipecraftError::Backend { .. } | PipecraftError::BackendStatus { .. } => {
                Some(Self::start_backend(base_url))
            }
            PipecraftError::PipelineNotFound { .. } => Some(Self::create_pipeline()),
            PipecraftError::UnsupportedFramework { .. }
            | PipecraftError::UnsupportedLanguage { .. } => Some(Self::choose_supported_target()),
            _ => None,
        }
    }
}

impl std::fmt::Display for RecoverySuggestion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "→ {}", self.action)?;

        for step in &self.steps {
            writeln!(f, "  {}", step)?;
        }

        if !self.commands.is_empty() {
            writeln!(f)?;
            for cmd in &self.commands {
                writeln!(f, "  {}", cmd)?;
            }
        }

        Ok(())
    }
}
