// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 pipecraft contributors

//! Generated code cache
//!
//! Holds the code for the current `(pipeline, language, framework)` selection
//! only. Any change to the inputs misses and replaces the single slot.

use blake3::Hasher;

use crate::codegen::{generate_code, Framework, Language};
use crate::errors::PipecraftResult;
use crate::pipeline::{DatasetInfo, Pipeline};

/// Single-slot cache for generated code
#[derive(Debug, Default)]
pub struct CodeCache {
    slot: Option<(String, String)>,
    hits: u64,
    misses: u64,
}

impl CodeCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache key over every generation input
    pub fn key(
        pipeline: &Pipeline,
        language: Language,
        framework: Framework,
        dataset: Option<&DatasetInfo>,
        problem_statement: Option<&str>,
    ) -> PipecraftResult<String> {
        let mut hasher = Hasher::new();

        hasher.update(serde_json::to_string(pipeline)?.as_bytes());
        hasher.update(b"\0");
        hasher.update(language.as_str().as_bytes());
        hasher.update(b"\0");
        // The structural dump does not depend on anything else
        if language == Language::Python {
            hasher.update(framework.as_str().as_bytes());
            hasher.update(b"\0");
            if let Some(dataset) = dataset {
                hasher.update(serde_json::to_string(dataset)?.as_bytes());
            }
            hasher.update(b"\0");
            if let Some(problem) = problem_statement {
                hasher.update(problem.as_bytes());
            }
        }

        Ok(hasher.finalize().to_hex().to_string())
    }

    /// Return cached code for these inputs, generating it on a miss
    pub fn get_or_generate(
        &mut self,
        pipeline: &Pipeline,
        language: Language,
        framework: Framework,
        dataset: Option<&DatasetInfo>,
        problem_statement: Option<&str>,
    ) -> PipecraftResult<&str> {
        let key = Self::key(pipeline, language, framework, dataset, problem_statement)?;

        let hit = matches!(&self.slot, Some((cached, _)) if *cached == key);
        if hit {
            self.hits += 1;
            tracing::debug!(key = %&key[..12], "Code cache hit");
        } else {
            self.misses += 1;
            let code = generate_code(pipeline, language, framework, dataset, problem_statement)?;
            self.slot = Some((key, code));
        }

        Ok(self.slot.as_ref().map(|(_, code)| code.as_str()).unwrap_or_default())
    }

    /// Drop the cached code
    pub fn invalidate(&mut self) {
        self.slot = None;
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }
}
