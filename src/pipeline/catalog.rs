// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 pipecraft contributors

//! Built-in component catalog
//!
//! A read-only registry compiled into the binary. Entries are turned into
//! `PipelineComponent`s by the catalog-addition flow (`pipecraft add`).

use crate::errors::{PipecraftError, PipecraftResult};
use crate::pipeline::{ComponentKind, ComponentRequirements, PipelineComponent};

/// The persona attached to a catalog entry in the UI
#[derive(Debug, Clone, Copy)]
pub struct AgentInfo {
    pub name: &'static str,
    pub role: &'static str,
    pub quote: &'static str,
}

/// A catalog entry
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub id: &'static str,
    pub display_name: &'static str,
    pub kind: ComponentKind,
    pub description: &'static str,
    pub icon: &'static str,
    pub alternatives: &'static [&'static str],
    pub dependencies: &'static [&'static str],
    pub environments: &'static [&'static str],
    pub agent: AgentInfo,
}

impl CatalogEntry {
    /// Build a pipeline component from this entry.
    ///
    /// Suggested alternatives are resolved against the catalog; unknown ids
    /// are skipped.
    pub fn to_component(&self) -> PipelineComponent {
        let mut component = PipelineComponent::new(
            self.id,
            self.display_name,
            self.kind.clone(),
            self.description,
        );

        component.requirements = Some(ComponentRequirements {
            dependencies: self.dependencies.iter().map(|d| d.to_string()).collect(),
            environments: self.environments.iter().map(|e| e.to_string()).collect(),
            ..Default::default()
        });
        component.selection_reason = Some(format!("Added from catalog ({})", self.agent.role));

        let alternatives: Vec<PipelineComponent> = self
            .alternatives
            .iter()
            .filter_map(|id| get(id))
            .map(|alt| {
                PipelineComponent::new(alt.id, alt.display_name, alt.kind.clone(), alt.description)
            })
            .collect();

        if !alternatives.is_empty() {
            component.alternatives = Some(alternatives);
        }

        component
    }
}

const PYTHON_37: &[&str] = &["Python 3.7+"];

static CATALOG: &[CatalogEntry] = &[
    CatalogEntry {
        id: "standard_scaler",
        display_name: "Standard Scaler",
        kind: ComponentKind::Preprocessing,
        description: "Normalizes numeric features to zero mean and unit variance.",
        icon: "📊",
        alternatives: &["min_max_scaler", "robust_scaler"],
        dependencies: &["scikit-learn>=1.0.0"],
        environments: PYTHON_37,
        agent: AgentInfo {
            name: "DataCleanerGPT",
            role: "Data Preprocessing Expert",
            quote: "Clean data is my jam! Let me handle those messy sensor readings.",
        },
    },
    CatalogEntry {
        id: "min_max_scaler",
        display_name: "Min-Max Scaler",
        kind: ComponentKind::Preprocessing,
        description: "Scales values to a 0-1 range. Useful for bounded inputs.",
        icon: "📈",
        alternatives: &[],
        dependencies: &["scikit-learn>=1.0.0"],
        environments: PYTHON_37,
        agent: AgentInfo {
            name: "NormalizerGPT",
            role: "Data Scaling Specialist",
            quote: "Let me squeeze those values into a nice, bounded range!",
        },
    },
    CatalogEntry {
        id: "outlier_filter",
        display_name: "Outlier Detection",
        kind: ComponentKind::Preprocessing,
        description: "Removes anomalous data points using IQR or z-score methods.",
        icon: "🚨",
        alternatives: &[],
        dependencies: &["numpy>=1.20.0", "pandas>=1.3.0"],
        environments: PYTHON_37,
        agent: AgentInfo {
            name: "AnomalyHunterGPT",
            role: "Outlier Detection Expert",
            quote: "I've got a keen eye for data that doesn't belong!",
        },
    },
    CatalogEntry {
        id: "time_alignment",
        display_name: "Time Alignment",
        kind: ComponentKind::Preprocessing,
        description: "Aligns multi-sensor time series to a shared timestamp index.",
        icon: "⏱️",
        alternatives: &[],
        dependencies: &["pandas>=1.3.0"],
        environments: PYTHON_37,
        agent: AgentInfo {
            name: "TimeKeeperGPT",
            role: "Temporal Alignment Specialist",
            quote: "Time waits for no one, but I'll make sure your data stays in sync!",
        },
    },
    CatalogEntry {
        id: "transformer_model",
        display_name: "Time Series Transformer",
        kind: ComponentKind::Model,
        description: "Captures long-term temporal patterns using attention mechanisms.",
        icon: "🔁",
        alternatives: &[],
        dependencies: &["torch>=1.10.0", "transformers>=4.0.0"],
        environments: PYTHON_37,
        agent: AgentInfo {
            name: "ModelArchitectGPT",
            role: "Neural Architecture Specialist",
            quote: "Time series data? Leave it to my transformer architecture!",
        },
    },
    CatalogEntry {
        id: "json_exporter",
        display_name: "JSON Output Formatter",
        kind: ComponentKind::Postprocessing,
        description: "Formats predictions as JSON with timestamps and metadata.",
        icon: "📤",
        alternatives: &[],
        dependencies: &["python-json-logger>=2.0.0"],
        environments: PYTHON_37,
        agent: AgentInfo {
            name: "OutputOptimizerGPT",
            role: "Prediction Refinement Specialist",
            quote: "Let me format those predictions for easy integration!",
        },
    },
    CatalogEntry {
        id: "pca",
        display_name: "PCA",
        kind: ComponentKind::Feature,
        description: "Applies Principal Component Analysis for dimensionality reduction.",
        icon: "📉",
        alternatives: &[],
        dependencies: &["scikit-learn>=1.0.0"],
        environments: PYTHON_37,
        agent: AgentInfo {
            name: "FeatureEngineerGPT",
            role: "Feature Engineering Specialist",
            quote: "Let's distill those features down to their essence!",
        },
    },
    CatalogEntry {
        id: "data_validator",
        display_name: "Data Validator",
        kind: ComponentKind::Transformation,
        description: "Validates input data against a predefined schema.",
        icon: "✅",
        alternatives: &[],
        dependencies: &["jsonschema>=4.0.0"],
        environments: PYTHON_37,
        agent: AgentInfo {
            name: "QualityControlGPT",
            role: "Data Quality Guardian",
            quote: "Ensuring your data is pristine and ready for analysis!",
        },
    },
    CatalogEntry {
        id: "model_drift_detector",
        display_name: "Model Drift Detector",
        kind: ComponentKind::Monitoring,
        description: "Detects drift in model performance over time.",
        icon: "⚙️",
        alternatives: &[],
        dependencies: &["tensorflow>=2.0.0", "alibi_detect>=0.8.0"],
        environments: PYTHON_37,
        agent: AgentInfo {
            name: "PerformanceMonitorGPT",
            role: "Model Performance Analyst",
            quote: "Keeping a vigilant eye on your model's health and stability.",
        },
    },
    CatalogEntry {
        id: "shap_explainer",
        display_name: "SHAP Explainer",
        kind: ComponentKind::Explainability,
        description: "Explains model predictions using SHAP values.",
        icon: "💡",
        alternatives: &[],
        dependencies: &["shap>=0.39.0"],
        environments: PYTHON_37,
        agent: AgentInfo {
            name: "InsightfulAnalystGPT",
            role: "Model Interpretation Expert",
            quote: "Unlocking the secrets behind your model's decisions.",
        },
    },
    CatalogEntry {
        id: "robust_scaler",
        display_name: "Robust Scaler",
        kind: ComponentKind::Preprocessing,
        description: "Scales data using statistics that are robust to outliers.",
        icon: "💪",
        alternatives: &[],
        dependencies: &["scikit-learn>=1.0.0"],
        environments: PYTHON_37,
        agent: AgentInfo {
            name: "DataResilienceGPT",
            role: "Outlier-Resistant Scaling Specialist",
            quote: "Making your data robust against the slings and arrows of outliers!",
        },
    },
];

/// All catalog entries, in display order
pub fn entries() -> &'static [CatalogEntry] {
    CATALOG
}

/// Look up an entry by id
pub fn get(id: &str) -> Option<&'static CatalogEntry> {
    CATALOG.iter().find(|e| e.id == id)
}

/// Look up an entry by id, failing with a diagnostic
pub fn require(id: &str) -> PipecraftResult<&'static CatalogEntry> {
    get(id).ok_or_else(|| PipecraftError::ComponentNotFound { id: id.to_string() })
}

/// Entries of one kind
pub fn by_kind(kind: &ComponentKind) -> impl Iterator<Item = &'static CatalogEntry> + '_ {
    CATALOG.iter().filter(move |e| &e.kind == kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_ids_are_unique() {
        let ids: HashSet<_> = entries().iter().map(|e| e.id).collect();
        assert_eq!(ids.len(), entries().len());
    }

    #[test]
    fn test_every_kind_has_an_entry() {
        for kind in ComponentKind::RECOGNIZED.iter() {
            assert!(by_kind(kind).next().is_some(), "no entry for {}", kind);
        }
    }

    #[test]
    fn test_to_component_resolves_alternatives() {
        let component = require("standard_scaler").unwrap().to_component();
        assert_eq!(component.name, "Standard Scaler");
        assert_eq!(component.kind, ComponentKind::Preprocessing);

        let alternatives = component.alternatives.unwrap();
        let ids: Vec<_> = alternatives.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["min_max_scaler", "robust_scaler"]);
    }

    #[test]
    fn test_require_unknown() {
        assert!(matches!(
            require("nope"),
            Err(PipecraftError::ComponentNotFound { .. })
        ));
    }
}
