// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 pipecraft contributors

//! Framework template library
//!
//! One stateless template per supported framework. Each provides the
//! framework's import block, a network class for model components and the
//! `train_model` function.

mod pytorch;
mod sklearn;
mod tensorflow;

pub use pytorch::PyTorchTemplate;
pub use sklearn::SklearnTemplate;
pub use tensorflow::TensorFlowTemplate;

use crate::codegen::{python, Framework};
use crate::pipeline::identifier;
use crate::pipeline::PipelineComponent;

/// Code fragments for one framework
pub trait FrameworkTemplate: Send + Sync {
    /// Framework this template targets
    fn framework(&self) -> Framework;

    /// Import statements, in emission order
    fn imports(&self) -> &'static [&'static str];

    /// Network class for a model component, named `<ClassName>Network`.
    ///
    /// Every implementation takes `(input_size, hidden_size=128, output_size=1)`
    /// so model wrappers can build it the same way.
    fn model_class(&self, component: &PipelineComponent) -> String;

    /// The `train_model` function
    fn training_loop(&self) -> String;
}

static PYTORCH: PyTorchTemplate = PyTorchTemplate;
static TENSORFLOW: TensorFlowTemplate = TensorFlowTemplate;
static SKLEARN: SklearnTemplate = SklearnTemplate;

/// Get the template for a framework
pub fn for_framework(framework: Framework) -> &'static dyn FrameworkTemplate {
    match framework {
        Framework::PyTorch => &PYTORCH,
        Framework::TensorFlow => &TENSORFLOW,
        Framework::Sklearn => &SKLEARN,
    }
}

/// Name of the network class generated for a model component
pub fn network_class_name(component: &PipelineComponent) -> String {
    identifier::network_class_name(&component.name)
}

/// Render a network template with the component's class name and description
pub(crate) fn render_network(template: &str, component: &PipelineComponent, framework_label: &str) -> String {
    let class = network_class_name(component);
    let description = python::docstring(&component.description);
    let summary = if description.is_empty() {
        format!("{} network for {}.", framework_label, python::docstring(&component.name))
    } else {
        description
    };

    python::render(
        template,
        &[
            ("class_name", class.as_str()),
            ("summary", summary.as_str()),
            ("framework", framework_label),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::ComponentKind;

    fn model() -> PipelineComponent {
        PipelineComponent::new(
            "transformer_model",
            "Time Series Transformer",
            ComponentKind::Model,
            "Captures long-term temporal patterns using attention mechanisms.",
        )
    }

    #[test]
    fn test_every_framework_has_a_template() {
        for framework in Framework::ALL {
            let template = for_framework(framework);
            assert_eq!(template.framework(), framework);
            assert!(!template.imports().is_empty());
            assert!(template.training_loop().contains("def train_model("));
        }
    }

    #[test]
    fn test_model_class_is_named_and_documented() {
        for framework in Framework::ALL {
            let code = for_framework(framework).model_class(&model());
            assert!(code.contains("class TimeSeriesTransformerNetwork("), "{}", framework);
            assert!(code.contains("Captures long-term temporal patterns"), "{}", framework);
            assert!(code.contains("def __init__(self, input_size"), "{}", framework);
        }
    }

    #[test]
    fn test_empty_description_falls_back_to_summary() {
        let mut component = model();
        component.description.clear();
        let code = for_framework(Framework::PyTorch).model_class(&component);
        assert!(code.contains("PyTorch network for Time Series Transformer."));
    }
}
