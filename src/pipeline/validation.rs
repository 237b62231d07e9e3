// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 pipecraft contributors

//! Pipeline validation
//!
//! Local checks run before code export or a catalog addition. Nothing here
//! mutates the pipeline; the suggested order is reported, never applied.

use std::collections::{HashMap, HashSet};

use crate::pipeline::identifier::{attribute_name, class_name, network_class_name, pipeline_class_name};
use crate::pipeline::{ComponentKind, Pipeline, PipelineComponent};

/// Pipeline validator
pub struct PipelineValidator;

impl PipelineValidator {
    /// Validate a pipeline, including clashes with its orchestrator class
    pub fn validate(pipeline: &Pipeline) -> ValidationResult {
        Self::validate_named(&pipeline_class_name(&pipeline.name), &pipeline.components)
    }

    /// Validate the pipeline that would result from appending `new` to `current`
    pub fn validate_addition(current: &Pipeline, new: &[PipelineComponent]) -> ValidationResult {
        let all: Vec<PipelineComponent> = current.components.iter().chain(new).cloned().collect();
        Self::validate_named(&pipeline_class_name(&current.name), &all)
    }

    /// Validate an ordered component list
    pub fn validate_components(components: &[PipelineComponent]) -> ValidationResult {
        Self::validate_named("", components)
    }

    fn validate_named(orchestrator: &str, components: &[PipelineComponent]) -> ValidationResult {
        let mut result = ValidationResult::new();

        if components.is_empty() {
            result.add_warning("Pipeline has no components; generated code will only load data");
            return result;
        }

        Self::check_model_presence(components, &mut result);
        Self::check_unique_identifiers(orchestrator, components, &mut result);
        Self::check_sequences(components, &mut result);
        Self::check_dependency_versions(components, &mut result);
        Self::check_environments(components, &mut result);

        result
    }

    fn check_model_presence(components: &[PipelineComponent], result: &mut ValidationResult) {
        let has_model = components.iter().any(|c| c.kind == ComponentKind::Model);
        if has_model {
            return;
        }

        for component in components {
            if matches!(
                component.kind,
                ComponentKind::Postprocessing
                    | ComponentKind::Monitoring
                    | ComponentKind::Explainability
            ) {
                result.add_error(&format!(
                    "Component '{}': {} components require a model component",
                    component.id, component.kind
                ));
            }
        }
    }

    /// Duplicate ids, and duplicate derived identifiers that would shadow each
    /// other in generated code. Generated classes include model networks and
    /// the orchestrator named `orchestrator` (skipped when empty).
    fn check_unique_identifiers(
        orchestrator: &str,
        components: &[PipelineComponent],
        result: &mut ValidationResult,
    ) {
        let mut seen_ids = HashSet::new();
        let mut seen_classes: HashMap<String, String> = HashMap::new();
        let mut seen_attrs: HashMap<String, &str> = HashMap::new();

        if !orchestrator.is_empty() {
            seen_classes.insert(orchestrator.to_string(), "the pipeline orchestrator".to_string());
        }

        for component in components {
            if !seen_ids.insert(component.id.as_str()) {
                result.add_error(&format!("Duplicate component id: '{}'", component.id));
            }

            if component.kind.is_unknown() {
                result.add_warning(&format!(
                    "Component '{}': unknown type '{}' will be skipped during code generation",
                    component.id, component.kind
                ));
                continue;
            }

            let mut classes = vec![class_name(&component.name)];
            if component.kind == ComponentKind::Model {
                classes.push(network_class_name(&component.name));
            }
            let owner = format!("component '{}'", component.id);

            let mut clashed = false;
            for class in classes {
                if let Some(first) = seen_classes.get(&class) {
                    result.add_error(&format!(
                        "{} and {} both generate class '{}'",
                        capitalize(first),
                        owner,
                        class
                    ));
                    clashed = true;
                } else {
                    seen_classes.insert(class, owner.clone());
                }
            }

            let attr = attribute_name(&component.name);
            if let Some(first) = seen_attrs.insert(attr.clone(), component.id.as_str()) {
                if !clashed {
                    result.add_error(&format!(
                        "Components '{}' and '{}' both generate attribute '{}'",
                        first, component.id, attr
                    ));
                }
            }
        }
    }

    fn check_sequences(components: &[PipelineComponent], result: &mut ValidationResult) {
        for pair in components.windows(2) {
            if pair[0].kind == pair[1].kind && !pair[0].kind.is_unknown() {
                result.add_warning(&format!(
                    "Multiple {} components in sequence ('{}', '{}') may impact performance",
                    pair[1].kind, pair[0].id, pair[1].id
                ));
            }
        }
    }

    fn check_dependency_versions(components: &[PipelineComponent], result: &mut ValidationResult) {
        let mut versions: HashMap<&str, &str> = HashMap::new();
        let mut reported = HashSet::new();

        for component in components {
            let Some(requirements) = &component.requirements else {
                continue;
            };

            for (name, version) in requirements.parsed_dependencies() {
                let Some(version) = version else { continue };

                match versions.get(name) {
                    Some(existing) if *existing != version => {
                        if reported.insert(name) {
                            result.add_warning(&format!(
                                "Potential version conflict for dependency {} ({} vs {})",
                                name, existing, version
                            ));
                        }
                    }
                    Some(_) => {}
                    None => {
                        versions.insert(name, version);
                    }
                }
            }
        }
    }

    fn check_environments(components: &[PipelineComponent], result: &mut ValidationResult) {
        let mut declared = components
            .iter()
            .filter_map(|c| c.requirements.as_ref())
            .filter(|r| !r.environments.is_empty())
            .map(|r| r.environments.iter().map(String::as_str).collect::<HashSet<_>>());

        let Some(first) = declared.next() else {
            return;
        };

        let common = declared.fold(first, |acc, envs| acc.intersection(&envs).copied().collect());

        if common.is_empty() {
            result.add_error("No compatible environment found across components");
        }
    }

    /// Canonical order: preprocessing/feature/transformation, model,
    /// postprocessing, monitoring/explainability, unknown. Stable within groups.
    pub fn suggest_order(components: &[PipelineComponent]) -> RestructurePlan {
        let mut indexed: Vec<(usize, &PipelineComponent)> = components.iter().enumerate().collect();
        indexed.sort_by_key(|(i, c)| (stage_rank(&c.kind), *i));

        let order: Vec<String> = indexed.iter().map(|(_, c)| c.id.clone()).collect();
        let needs_restructuring = indexed.iter().enumerate().any(|(pos, (i, _))| pos != *i);

        let count = |rank: u8| {
            components
                .iter()
                .filter(|c| stage_rank(&c.kind) == rank)
                .count()
        };

        let mut notes = Vec::new();
        if count(0) > 0 {
            notes.push("Preprocessing components placed at the start of the pipeline".to_string());
        }
        if count(0) > 1 {
            notes.push(
                "Multiple preprocessing components arranged in sequence - consider potential performance impact"
                    .to_string(),
            );
        }
        if count(1) > 1 {
            notes.push("Multiple model components detected - ensure this is intentional".to_string());
        }
        if count(2) > 1 {
            notes.push("Postprocessing components arranged after model components".to_string());
        }
        if count(3) > 0 {
            notes.push(
                "Monitoring and explainability components placed at the end of the pipeline".to_string(),
            );
        }

        RestructurePlan {
            order,
            notes,
            needs_restructuring,
        }
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn stage_rank(kind: &ComponentKind) -> u8 {
    match kind {
        ComponentKind::Preprocessing | ComponentKind::Feature | ComponentKind::Transformation => 0,
        ComponentKind::Model => 1,
        ComponentKind::Postprocessing => 2,
        ComponentKind::Monitoring | ComponentKind::Explainability => 3,
        ComponentKind::Unknown(_) => 4,
    }
}

/// Result of pipeline validation
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_error(&mut self, message: &str) {
        self.errors.push(message.to_string());
    }

    pub fn add_warning(&mut self, message: &str) {
        self.warnings.push(message.to_string());
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Suggested component order
#[derive(Debug, Clone, PartialEq)]
pub struct RestructurePlan {
    /// Component ids in suggested order
    pub order: Vec<String>,
    pub notes: Vec<String>,
    /// Whether the suggested order differs from the current one
    pub needs_restructuring: bool,
}
