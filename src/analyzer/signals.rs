// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 pipecraft contributors

//! Keyword signals in generated code
//!
//! Coarse, case-insensitive substring checks. Heuristic only.

use crate::pipeline::Pipeline;

/// Parameter count above which a pipeline counts as using large models
pub const LARGE_MODEL_PARAMETERS: u64 = 100_000_000;

/// Estimated latency (ms) above which a pipeline counts as GPU-bound
pub const GPU_LATENCY_MS: f64 = 100.0;

const TRAINING_KEYWORDS: &[&str] = &[".fit(", "train", "optimizer", "backward("];
const LARGE_MODEL_KEYWORDS: &[&str] = &["transformer", "bert", "gpt", "llama", "large"];
const VISION_KEYWORDS: &[&str] = &["image", "conv2d", "cnn", "vision", "resnet"];

/// Workload signals detected in code
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Signals {
    pub requires_training: bool,
    pub uses_large_models: bool,
    pub computer_vision: bool,
    /// Set from the pipeline's latency estimate, never from code text
    pub latency_bound: bool,
}

impl Signals {
    /// Detect signals in code text
    pub fn detect(code: &str) -> Self {
        let lower = code.to_lowercase();
        Self {
            requires_training: contains_any(&lower, TRAINING_KEYWORDS),
            uses_large_models: contains_any(&lower, LARGE_MODEL_KEYWORDS),
            computer_vision: contains_any(&lower, VISION_KEYWORDS),
            latency_bound: false,
        }
    }

    /// Detect signals in code, also counting the pipeline's declared model
    /// size and latency estimate
    pub fn detect_with_pipeline(code: &str, pipeline: &Pipeline) -> Self {
        let mut signals = Self::detect(code);
        if pipeline.total_parameters() > LARGE_MODEL_PARAMETERS {
            signals.uses_large_models = true;
        }
        if pipeline.estimated_latency > GPU_LATENCY_MS {
            signals.latency_bound = true;
        }
        signals
    }

    /// Human-readable names of the signals that fired
    pub fn labels(&self) -> Vec<&'static str> {
        let mut labels = Vec::new();
        if self.requires_training {
            labels.push("requires training");
        }
        if self.uses_large_models {
            labels.push("uses large models");
        }
        if self.computer_vision {
            labels.push("computer vision");
        }
        if self.latency_bound {
            labels.push("latency bound");
        }
        labels
    }
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{ComponentKind, PipelineComponent};

    #[test]
    fn test_detection_is_case_insensitive() {
        let signals = Signals::detect("model = BertModel()\nOptimizer = Adam()");
        assert!(signals.uses_large_models);
        assert!(signals.requires_training);
        assert!(!signals.computer_vision);
    }

    #[test]
    fn test_plain_code_has_no_signals() {
        let signals = Signals::detect("def add(a, b):\n    return a + b\n");
        assert_eq!(signals, Signals::default());
        assert!(signals.labels().is_empty());
    }

    #[test]
    fn test_vision_keywords() {
        assert!(Signals::detect("nn.Conv2d(3, 16, 3)").computer_vision);
        assert!(Signals::detect("load_image(path)").computer_vision);
    }

    #[test]
    fn test_parameter_count_marks_large_models() {
        let mut pipeline = Pipeline::new("p", "Big");
        let mut model = PipelineComponent::new("m", "Model", ComponentKind::Model, "");
        model.parameters = Some(150_000_000);
        pipeline.append_components(vec![model]);

        assert!(!Signals::detect("x = 1").uses_large_models);
        assert!(Signals::detect_with_pipeline("x = 1", &pipeline).uses_large_models);
    }

    #[test]
    fn test_latency_estimate_marks_latency_bound() {
        let mut pipeline = Pipeline::new("p", "Slow");
        pipeline.estimated_latency = 100.0;
        assert!(!Signals::detect_with_pipeline("x = 1", &pipeline).latency_bound);

        pipeline.estimated_latency = 250.0;
        let signals = Signals::detect_with_pipeline("x = 1", &pipeline);
        assert!(signals.latency_bound);
        assert!(!signals.uses_large_models);
        assert_eq!(signals.labels(), vec!["latency bound"]);

        // Code text alone never sets it
        assert!(!Signals::detect("latency = 500").latency_bound);
    }
}
