// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 pipecraft contributors

//! Remote code generation with a local template fallback

use tracing::{debug, warn};

use super::PipelineService;
use crate::codegen::{generate_code, Framework, Language};
use crate::errors::PipecraftResult;
use crate::pipeline::{DatasetInfo, Pipeline};

/// Where a piece of generated code came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodeSource {
    /// The backend produced it
    Remote,
    /// Generated locally without asking the backend
    Local,
    /// The backend failed and the template generator stepped in
    Template { reason: String },
}

/// Generated code plus its provenance
#[derive(Debug, Clone)]
pub struct CodeOutcome {
    pub code: String,
    pub source: CodeSource,
}

impl CodeOutcome {
    /// True when the backend was asked and could not answer
    pub fn is_degraded(&self) -> bool {
        matches!(self.source, CodeSource::Template { .. })
    }
}

/// Generate code, preferring the backend when one is available.
///
/// The structural dump is always produced locally. Dataset details and a
/// problem statement cannot be sent to the backend, so their presence also
/// keeps generation local. A backend failure never fails the call: the
/// template generator output is returned with [`CodeSource::Template`].
pub async fn generate_with_fallback(
    service: Option<&dyn PipelineService>,
    pipeline: &Pipeline,
    language: Language,
    framework: Framework,
    dataset: Option<&DatasetInfo>,
    problem_statement: Option<&str>,
) -> PipecraftResult<CodeOutcome> {
    let local_only = language == Language::Json || dataset.is_some() || problem_statement.is_some();

    let service = match service {
        Some(service) if !local_only => service,
        _ => {
            debug!(language = %language, "Generating code locally");
            let code = generate_code(pipeline, language, framework, dataset, problem_statement)?;
            return Ok(CodeOutcome {
                code,
                source: CodeSource::Local,
            });
        }
    };

    match service.generate_code(pipeline, language, framework).await {
        Ok(code) => Ok(CodeOutcome {
            code: strip_code_fences(&code),
            source: CodeSource::Remote,
        }),
        Err(e) => {
            warn!(error = %e, "Backend code generation failed, using templates");
            let code = generate_code(pipeline, language, framework, None, None)?;
            Ok(CodeOutcome {
                code,
                source: CodeSource::Template {
                    reason: e.to_string(),
                },
            })
        }
    }
}

/// Remove a surrounding Markdown code fence, if the text has one
pub fn strip_code_fences(text: &str) -> String {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return text.to_string();
    };
    let Some(body) = rest.strip_suffix("```") else {
        return text.to_string();
    };

    // Drop the info string ("python") on the opening line
    let body = match body.find('\n') {
        Some(pos) => &body[pos + 1..],
        None => body,
    };

    let mut out = body.trim_end().to_string();
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::*;
    use crate::errors::PipecraftError;
    use crate::pipeline::{ComponentKind, PipelineComponent};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubService {
        code: Option<String>,
        calls: AtomicUsize,
    }

    impl StubService {
        fn answering(code: &str) -> Self {
            Self {
                code: Some(code.to_string()),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                code: None,
                calls: AtomicUsize::new(0),
            }
        }

        fn down() -> PipecraftError {
            PipecraftError::backend_unreachable("/generate-code", "http://localhost:8000", "connection refused")
        }
    }

    #[async_trait]
    impl PipelineService for StubService {
        async fn generate_pipeline(
            &self,
            _request: &GeneratePipelineRequest,
        ) -> PipecraftResult<GeneratePipelineResponse> {
            Err(Self::down())
        }

        async fn generate_code(
            &self,
            _pipeline: &Pipeline,
            _language: Language,
            _framework: Framework,
        ) -> PipecraftResult<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.code.clone().ok_or_else(Self::down)
        }

        async fn refactor_code(&self, _code: &str, _prompt: &str) -> PipecraftResult<String> {
            Err(Self::down())
        }

        async fn validate_pipeline(
            &self,
            _current: &[PipelineComponent],
            _new: &[PipelineComponent],
        ) -> PipecraftResult<ValidatePipelineResponse> {
            Err(Self::down())
        }

        async fn generate_clarification(
            &self,
            _prompt: &str,
            _domain: &str,
        ) -> PipecraftResult<ClarificationResponse> {
            Err(Self::down())
        }
    }

    fn pipeline() -> Pipeline {
        let mut p = Pipeline::new("p", "Fallback");
        p.append_components(vec![PipelineComponent::new(
            "model",
            "Classifier",
            ComponentKind::Model,
            "",
        )]);
        p
    }

    #[tokio::test]
    async fn test_remote_code_is_unfenced() {
        let stub = StubService::answering("```python\nprint('remote')\n```");
        let outcome = generate_with_fallback(
            Some(&stub),
            &pipeline(),
            Language::Python,
            Framework::PyTorch,
            None,
            None,
        )
        .await
        .unwrap();

        assert_eq!(outcome.source, CodeSource::Remote);
        assert_eq!(outcome.code, "print('remote')\n");
        assert!(!outcome.is_degraded());
    }

    #[tokio::test]
    async fn test_backend_failure_falls_back_to_templates() {
        let stub = StubService::failing();
        let p = pipeline();
        let outcome = generate_with_fallback(Some(&stub), &p, Language::Python, Framework::Sklearn, None, None)
            .await
            .unwrap();

        assert!(outcome.is_degraded());
        assert!(matches!(&outcome.source, CodeSource::Template { reason } if reason.contains("connection refused")));
        assert_eq!(
            outcome.code,
            generate_code(&p, Language::Python, Framework::Sklearn, None, None).unwrap()
        );
    }

    #[tokio::test]
    async fn test_json_never_goes_remote() {
        let stub = StubService::answering("remote");
        let outcome = generate_with_fallback(Some(&stub), &pipeline(), Language::Json, Framework::PyTorch, None, None)
            .await
            .unwrap();

        assert_eq!(outcome.source, CodeSource::Local);
        assert_eq!(stub.calls.load(Ordering::SeqCst), 0);
        assert!(outcome.code.starts_with('{'));
    }

    #[tokio::test]
    async fn test_problem_statement_keeps_generation_local() {
        let stub = StubService::answering("remote");
        let outcome = generate_with_fallback(
            Some(&stub),
            &pipeline(),
            Language::Python,
            Framework::PyTorch,
            None,
            Some("Predict churn"),
        )
        .await
        .unwrap();

        assert_eq!(outcome.source, CodeSource::Local);
        assert!(outcome.code.contains("Predict churn"));
    }

    #[tokio::test]
    async fn test_no_service_is_local() {
        let outcome = generate_with_fallback(None, &pipeline(), Language::Python, Framework::TensorFlow, None, None)
            .await
            .unwrap();
        assert_eq!(outcome.source, CodeSource::Local);
    }

    #[test]
    fn test_strip_code_fences_leaves_plain_text() {
        assert_eq!(strip_code_fences("x = 1\n"), "x = 1\n");
        assert_eq!(strip_code_fences("```\nx = 1\n```"), "x = 1\n");
    }
}
