// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 pipecraft contributors

//! Code analyzer
//!
//! Refactors generated code and recommends where to run it.

mod recommender;
pub mod refactor;
mod signals;

pub use recommender::{recommend, Hardware, Platform, Recommendation};
pub use refactor::RefactorIntent;
pub use signals::{Signals, GPU_LATENCY_MS, LARGE_MODEL_PARAMETERS};

use std::path::Path;

use crate::errors::{PipecraftError, PipecraftResult};
use crate::pipeline::Pipeline;

/// Result of analyzing a code file
#[derive(Debug)]
pub struct Analysis {
    /// Detected workload signals
    pub signals: Signals,
    /// Deployment recommendation
    pub recommendation: Recommendation,
}

/// Code analyzer
#[derive(Debug, Default)]
pub struct CodeAnalyzer;

impl CodeAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Analyze code text, optionally with the pipeline it was generated from
    pub fn analyze_code(&self, code: &str, pipeline: Option<&Pipeline>) -> Analysis {
        let signals = match pipeline {
            Some(pipeline) => Signals::detect_with_pipeline(code, pipeline),
            None => Signals::detect(code),
        };

        Analysis {
            recommendation: recommend(&signals),
            signals,
        }
    }

    /// Analyze a code file
    pub async fn analyze(&self, path: &Path, pipeline: Option<&Pipeline>) -> PipecraftResult<Analysis> {
        let code = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| PipecraftError::FileReadError {
                path: path.to_path_buf(),
                error: e.to_string(),
            })?;

        Ok(self.analyze_code(&code, pipeline))
    }
}
