// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 pipecraft contributors

//! Request and response bodies of the pipeline backend

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::codegen::{Framework, Language};
use crate::pipeline::{
    ComponentKind, ComponentMetrics, ComponentRequirements, Pipeline, PipelineComponent, ProblemType,
};

/// Placeholder accuracy estimate for generated pipelines
pub const DEFAULT_ESTIMATED_ACCURACY: f64 = 0.9;

/// Placeholder latency estimate (ms) for generated pipelines
pub const DEFAULT_ESTIMATED_LATENCY: f64 = 100.0;

/// How much reasoning the backend spends on a prompt
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum GenerationMode {
    #[default]
    Quick,
    Agentic,
}

/// `POST /generate-pipeline` request
#[derive(Debug, Clone, Serialize)]
pub struct GeneratePipelineRequest {
    pub prompt: String,
    pub mode: GenerationMode,
    /// Answers to clarification questions, keyed by question id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clarification_answers: Option<BTreeMap<String, String>>,
}

/// `POST /generate-pipeline` response
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratePipelineResponse {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub components: Vec<GeneratedComponent>,
    #[serde(default)]
    pub search_steps: Option<Vec<SearchStep>>,
}

/// A component record as the backend returns it.
///
/// Looser than `PipelineComponent`: `parameters` may be any JSON value and
/// only a plain count is kept.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedComponent {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ComponentKind,
    #[serde(default)]
    pub description: String,
    #[serde(default, alias = "problem_type")]
    pub problem_type: Option<ProblemType>,
    #[serde(default)]
    pub metrics: Option<ComponentMetrics>,
    #[serde(default)]
    pub parameters: Option<serde_json::Value>,
    #[serde(default)]
    pub requirements: Option<ComponentRequirements>,
    #[serde(default, alias = "selection_reason")]
    pub selection_reason: Option<String>,
}

impl From<GeneratedComponent> for PipelineComponent {
    fn from(c: GeneratedComponent) -> Self {
        Self {
            id: c.id,
            name: c.name,
            description: c.description,
            kind: c.kind,
            problem_type: c.problem_type,
            metrics: c.metrics,
            parameters: c.parameters.as_ref().and_then(serde_json::Value::as_u64),
            requirements: c.requirements,
            selection_reason: c.selection_reason,
            alternatives: None,
        }
    }
}

/// One step of the backend's search/reasoning trace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchStep {
    pub query: String,
    pub status: StepStatus,
    pub timestamp: i64,
    #[serde(rename = "type")]
    pub kind: StepKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Loading,
    Complete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepKind {
    Web,
    Think,
    Generate,
    Search,
}

impl std::fmt::Display for StepKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Web => write!(f, "web"),
            Self::Think => write!(f, "think"),
            Self::Generate => write!(f, "generate"),
            Self::Search => write!(f, "search"),
        }
    }
}

impl Pipeline {
    /// Build a pipeline from a `/generate-pipeline` response.
    ///
    /// The id is derived from the prompt so the same prompt maps to the same
    /// id; accuracy and latency are placeholder estimates.
    pub fn from_generated(response: GeneratePipelineResponse, prompt: &str) -> Self {
        let components: Vec<PipelineComponent> =
            response.components.into_iter().map(Into::into).collect();

        let mut pipeline = Pipeline {
            id: blake3::hash(prompt.as_bytes()).to_hex()[..12].to_string(),
            name: response
                .name
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| "ML Pipeline".to_string()),
            description: response
                .description
                .filter(|d| !d.trim().is_empty())
                .unwrap_or_else(|| "Generated ML Pipeline".to_string()),
            components,
            total_models: 0,
            estimated_accuracy: DEFAULT_ESTIMATED_ACCURACY,
            estimated_latency: DEFAULT_ESTIMATED_LATENCY,
        };
        pipeline.total_models = pipeline.count_models();
        pipeline
    }
}

/// `POST /generate-code` request
#[derive(Debug, Serialize)]
pub struct GenerateCodeRequest<'a> {
    pub pipeline: &'a Pipeline,
    pub language: Language,
    pub framework: Framework,
}

/// `POST /generate-code` response
#[derive(Debug, Deserialize)]
pub struct GenerateCodeResponse {
    pub code: String,
}

/// `POST /refactor-code` request
#[derive(Debug, Serialize)]
pub struct RefactorCodeRequest<'a> {
    pub code: &'a str,
    pub prompt: &'a str,
}

/// `POST /refactor-code` response
#[derive(Debug, Deserialize)]
pub struct RefactorCodeResponse {
    pub refactored_code: String,
}

/// `POST /validate-pipeline` request
#[derive(Debug, Serialize)]
pub struct ValidatePipelineRequest<'a> {
    pub current_components: &'a [PipelineComponent],
    pub new_components: &'a [PipelineComponent],
}

/// `POST /validate-pipeline` response
#[derive(Debug, Clone, Deserialize)]
pub struct ValidatePipelineResponse {
    pub valid: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub suggested_order: Option<Vec<PipelineComponent>>,
    #[serde(default)]
    pub restructuring_notes: Option<Vec<String>>,
}

/// `POST /generate-clarification` request
#[derive(Debug, Serialize)]
pub struct ClarificationRequest<'a> {
    pub prompt: &'a str,
    pub domain: &'a str,
}

/// `POST /generate-clarification` response
#[derive(Debug, Clone, Deserialize)]
pub struct ClarificationResponse {
    pub questions: Vec<ClarificationQuestion>,
    #[serde(default)]
    pub context: String,
}

/// A question the backend wants answered before generating
#[derive(Debug, Clone, Deserialize)]
pub struct ClarificationQuestion {
    pub id: String,
    pub question: String,
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    #[serde(default)]
    pub options: Option<Vec<String>>,
    #[serde(default)]
    pub placeholder: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKind {
    Select,
    Text,
    Number,
}

/// FastAPI error body; `detail` is a string or a list of validation errors
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub detail: serde_json::Value,
}

impl ErrorBody {
    pub fn message(&self) -> String {
        match &self.detail {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}
