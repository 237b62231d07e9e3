// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 pipecraft contributors

//! Pipeline backend collaborators
//!
//! Pipeline generation, clarification, remote code generation and remote
//! refactoring are delegated to an HTTP backend. The [`PipelineService`]
//! trait is the seam; [`HttpBackend`] is the production implementation.

mod fallback;
mod types;

pub use fallback::{generate_with_fallback, strip_code_fences, CodeOutcome, CodeSource};
pub use types::*;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

use crate::codegen::{Framework, Language};
use crate::config::BackendSettings;
use crate::errors::{PipecraftError, PipecraftResult};
use crate::pipeline::{Pipeline, PipelineComponent};

/// Operations provided by the pipeline backend
#[async_trait]
pub trait PipelineService: Send + Sync {
    /// Turn a natural-language prompt into a pipeline
    async fn generate_pipeline(&self, request: &GeneratePipelineRequest)
        -> PipecraftResult<GeneratePipelineResponse>;

    /// Generate source code for a pipeline remotely
    async fn generate_code(
        &self,
        pipeline: &Pipeline,
        language: Language,
        framework: Framework,
    ) -> PipecraftResult<String>;

    /// Refactor code according to a free-form instruction
    async fn refactor_code(&self, code: &str, prompt: &str) -> PipecraftResult<String>;

    /// Check whether new components fit an existing pipeline
    async fn validate_pipeline(
        &self,
        current: &[PipelineComponent],
        new: &[PipelineComponent],
    ) -> PipecraftResult<ValidatePipelineResponse>;

    /// Ask which questions should be answered before generating
    async fn generate_clarification(&self, prompt: &str, domain: &str)
        -> PipecraftResult<ClarificationResponse>;
}

/// HTTP client for the pipeline backend
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    /// Create a client for `base_url` with a per-request timeout
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> PipecraftResult<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("pipecraft/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| PipecraftError::Config {
                message: format!("cannot build HTTP client: {}", e),
                help: None,
            })?;

        Ok(Self { client, base_url })
    }

    /// Create a client from settings. Fails if the backend is disabled.
    pub fn from_settings(settings: &BackendSettings) -> PipecraftResult<Self> {
        if !settings.enabled {
            return Err(PipecraftError::BackendDisabled);
        }
        Self::new(&settings.url, Duration::from_secs(settings.timeout_secs))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post<Req, Resp>(&self, endpoint: &str, body: &Req) -> PipecraftResult<Resp>
    where
        Req: Serialize + ?Sized + Sync,
        Resp: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!(url = %url, "POST");

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| PipecraftError::backend_unreachable(endpoint, &self.base_url, e))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ErrorBody>(&text)
                .map(|body| body.message())
                .unwrap_or(text);
            return Err(PipecraftError::BackendStatus {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                detail,
            });
        }

        response
            .json::<Resp>()
            .await
            .map_err(|e| PipecraftError::backend_unreachable(endpoint, &self.base_url, e))
    }
}

#[async_trait]
impl PipelineService for HttpBackend {
    async fn generate_pipeline(
        &self,
        request: &GeneratePipelineRequest,
    ) -> PipecraftResult<GeneratePipelineResponse> {
        self.post("/generate-pipeline", request).await
    }

    async fn generate_code(
        &self,
        pipeline: &Pipeline,
        language: Language,
        framework: Framework,
    ) -> PipecraftResult<String> {
        let request = GenerateCodeRequest {
            pipeline,
            language,
            framework,
        };
        let response: GenerateCodeResponse = self.post("/generate-code", &request).await?;
        Ok(response.code)
    }

    async fn refactor_code(&self, code: &str, prompt: &str) -> PipecraftResult<String> {
        let request = RefactorCodeRequest { code, prompt };
        let response: RefactorCodeResponse = self.post("/refactor-code", &request).await?;
        Ok(response.refactored_code)
    }

    async fn validate_pipeline(
        &self,
        current: &[PipelineComponent],
        new: &[PipelineComponent],
    ) -> PipecraftResult<ValidatePipelineResponse> {
        let request = ValidatePipelineRequest {
            current_components: current,
            new_components: new,
        };
        self.post("/validate-pipeline", &request).await
    }

    async fn generate_clarification(
        &self,
        prompt: &str,
        domain: &str,
    ) -> PipecraftResult<ClarificationResponse> {
        let request = ClarificationRequest { prompt, domain };
        self.post("/generate-clarification", &request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_is_normalized() {
        let backend = HttpBackend::new("http://localhost:8000/", Duration::from_secs(5)).unwrap();
        assert_eq!(backend.base_url(), "http://localhost:8000");
    }

    #[test]
    fn test_disabled_backend_is_refused() {
        let settings = BackendSettings {
            enabled: false,
            ..Default::default()
        };
        let err = HttpBackend::from_settings(&settings).unwrap_err();
        assert!(matches!(err, PipecraftError::BackendDisabled));
    }

    #[tokio::test]
    async fn test_unreachable_backend_maps_to_backend_error() {
        // Port 9 (discard) is closed on test machines
        let backend = HttpBackend::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
        let err = backend.refactor_code("x = 1", "simplify").await.unwrap_err();
        assert!(err.is_backend_failure());
        assert!(matches!(err, PipecraftError::Backend { .. }));
    }
}
