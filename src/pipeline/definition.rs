// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 pipecraft contributors

//! Pipeline definition structures
//!
//! The canonical in-memory pipeline: an ordered list of typed components.
//! Component `i` feeds component `i + 1`; the first receives raw input and the
//! last one produces the pipeline result.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::errors::{PipecraftError, PipecraftResult};

/// A generated ML pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pipeline {
    /// Pipeline identifier
    pub id: String,

    /// Human-readable name, also used for the orchestrator class
    pub name: String,

    /// Pipeline description
    #[serde(default)]
    pub description: String,

    /// Components in execution order
    #[serde(default)]
    pub components: Vec<PipelineComponent>,

    /// Number of model components
    #[serde(default)]
    pub total_models: usize,

    /// Estimated end-to-end accuracy (0.0 - 1.0)
    #[serde(default)]
    pub estimated_accuracy: f64,

    /// Estimated latency in milliseconds
    #[serde(default)]
    pub estimated_latency: f64,
}

impl Pipeline {
    /// Create an empty pipeline
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            components: Vec::new(),
            total_models: 0,
            estimated_accuracy: 0.0,
            estimated_latency: 0.0,
        }
    }

    /// Load a pipeline from a JSON or YAML file (chosen by extension)
    pub fn from_file(path: &Path) -> PipecraftResult<Self> {
        if !path.exists() {
            return Err(PipecraftError::PipelineNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| PipecraftError::FileReadError {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        if is_yaml_path(path) {
            Self::from_yaml(&content)
        } else {
            Self::from_json(&content)
        }
    }

    /// Parse a pipeline from its JSON form
    pub fn from_json(json: &str) -> PipecraftResult<Self> {
        serde_json::from_str(json).map_err(Into::into)
    }

    /// Parse a pipeline from YAML
    pub fn from_yaml(yaml: &str) -> PipecraftResult<Self> {
        serde_yaml::from_str(yaml).map_err(Into::into)
    }

    /// Serialize as pretty-printed JSON (the structural dump)
    ///
    /// Fails on NaN or infinite estimates and metrics, which JSON cannot carry.
    pub fn to_json_pretty(&self) -> PipecraftResult<String> {
        self.check_finite()?;
        serde_json::to_string_pretty(self).map_err(Into::into)
    }

    fn check_finite(&self) -> PipecraftResult<()> {
        let mut fields = vec![
            ("estimatedAccuracy".to_string(), self.estimated_accuracy),
            ("estimatedLatency".to_string(), self.estimated_latency),
        ];
        for component in &self.components {
            let Some(metrics) = &component.metrics else {
                continue;
            };
            let values = [
                ("accuracy", metrics.accuracy),
                ("latency", metrics.latency),
                ("memory", metrics.memory),
                ("throughput", metrics.throughput),
            ];
            for (name, value) in values {
                if let Some(value) = value {
                    fields.push((format!("{}.metrics.{}", component.id, name), value));
                }
            }
        }

        match fields.into_iter().find(|(_, value)| !value.is_finite()) {
            Some((field, value)) => Err(PipecraftError::InvalidPipeline {
                reason: format!("{} is {}, which JSON cannot represent", field, value),
                help: Some("Use a finite number".to_string()),
            }),
            None => Ok(()),
        }
    }

    /// Serialize pipeline to YAML
    pub fn to_yaml(&self) -> PipecraftResult<String> {
        serde_yaml::to_string(self).map_err(Into::into)
    }

    /// Write the pipeline to a JSON or YAML file (chosen by extension)
    pub fn save(&self, path: &Path) -> PipecraftResult<()> {
        let content = if is_yaml_path(path) {
            self.to_yaml()?
        } else {
            self.to_json_pretty()?
        };

        std::fs::write(path, content).map_err(|e| PipecraftError::FileWriteError {
            path: path.to_path_buf(),
            error: e.to_string(),
        })
    }

    /// Get a component by id
    pub fn get_component(&self, id: &str) -> Option<&PipelineComponent> {
        self.components.iter().find(|c| c.id == id)
    }

    /// Count of components with `kind == Model`
    pub fn count_models(&self) -> usize {
        self.components
            .iter()
            .filter(|c| c.kind == ComponentKind::Model)
            .count()
    }

    /// Sum of declared parameter counts across model components
    pub fn total_parameters(&self) -> u64 {
        self.components
            .iter()
            .filter(|c| c.kind == ComponentKind::Model)
            .filter_map(|c| c.parameters)
            .sum()
    }

    /// Append components at the end of the pipeline.
    ///
    /// Existing components are never reordered or removed. Ids that would
    /// collide with an existing one get a numeric suffix (`pca`, `pca_2`, ...).
    /// Returns the ids actually assigned.
    pub fn append_components(&mut self, new: Vec<PipelineComponent>) -> Vec<String> {
        let mut assigned = Vec::with_capacity(new.len());

        for mut component in new {
            if self.get_component(&component.id).is_some() {
                let base = component.id.clone();
                let mut n = 2;
                while self.get_component(&format!("{}_{}", base, n)).is_some() {
                    n += 1;
                }
                component.id = format!("{}_{}", base, n);
            }

            assigned.push(component.id.clone());
            self.components.push(component);
        }

        self.total_models = self.count_models();
        assigned
    }
}

fn is_yaml_path(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    )
}

/// A single pipeline component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineComponent {
    /// Component id (unique within a pipeline)
    pub id: String,

    /// Human label, used to derive generated identifiers
    pub name: String,

    /// Description, embedded in generated docstrings
    #[serde(default)]
    pub description: String,

    /// Component kind
    #[serde(rename = "type")]
    pub kind: ComponentKind,

    /// Problem type hint for this component (overrides the dataset's)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub problem_type: Option<ProblemType>,

    /// Reported metrics
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<ComponentMetrics>,

    /// Parameter count (model components only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<u64>,

    /// Runtime requirements
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requirements: Option<ComponentRequirements>,

    /// Why this component was selected
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selection_reason: Option<String>,

    /// Alternative components that could fill the same slot
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alternatives: Option<Vec<PipelineComponent>>,
}

impl PipelineComponent {
    /// Create a component with only the required fields set
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        kind: ComponentKind,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            kind,
            problem_type: None,
            metrics: None,
            parameters: None,
            requirements: None,
            selection_reason: None,
            alternatives: None,
        }
    }

    /// Set the problem type hint
    pub fn with_problem_type(mut self, problem_type: ProblemType) -> Self {
        self.problem_type = Some(problem_type);
        self
    }

    /// Problem type for code generation: the component's own hint, else the
    /// dataset's, else `Other`
    pub fn effective_problem_type(&self, dataset: Option<&DatasetInfo>) -> ProblemType {
        self.problem_type
            .or_else(|| dataset.map(|d| d.problem_type))
            .unwrap_or(ProblemType::Other)
    }
}

/// Component kind.
///
/// Closed over the seven recognized kinds; anything else is kept verbatim in
/// `Unknown` so it survives a dump/parse round-trip.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ComponentKind {
    Preprocessing,
    Model,
    Postprocessing,
    Feature,
    Transformation,
    Monitoring,
    Explainability,
    Unknown(String),
}

impl ComponentKind {
    /// All recognized kinds
    pub const RECOGNIZED: [ComponentKind; 7] = [
        ComponentKind::Preprocessing,
        ComponentKind::Model,
        ComponentKind::Postprocessing,
        ComponentKind::Feature,
        ComponentKind::Transformation,
        ComponentKind::Monitoring,
        ComponentKind::Explainability,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            Self::Preprocessing => "preprocessing",
            Self::Model => "model",
            Self::Postprocessing => "postprocessing",
            Self::Feature => "feature",
            Self::Transformation => "transformation",
            Self::Monitoring => "monitoring",
            Self::Explainability => "explainability",
            Self::Unknown(raw) => raw,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown(_))
    }
}

impl From<String> for ComponentKind {
    fn from(s: String) -> Self {
        match s.as_str() {
            "preprocessing" => Self::Preprocessing,
            "model" => Self::Model,
            "postprocessing" => Self::Postprocessing,
            "feature" => Self::Feature,
            "transformation" => Self::Transformation,
            "monitoring" => Self::Monitoring,
            "explainability" => Self::Explainability,
            _ => Self::Unknown(s),
        }
    }
}

impl From<ComponentKind> for String {
    fn from(kind: ComponentKind) -> Self {
        match kind {
            ComponentKind::Unknown(raw) => raw,
            other => other.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Reported component metrics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComponentMetrics {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latency: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub throughput: Option<f64>,
}

/// Runtime requirements of a component
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComponentRequirements {
    /// Package requirements as `name>=version`
    #[serde(default)]
    pub dependencies: Vec<String>,

    /// Supported environments (e.g. "Python 3.7+")
    #[serde(default)]
    pub environments: Vec<String>,

    #[serde(rename = "minCPU", alias = "min_cpu", default, skip_serializing_if = "Option::is_none")]
    pub min_cpu: Option<String>,

    #[serde(rename = "minRAM", alias = "min_ram", default, skip_serializing_if = "Option::is_none")]
    pub min_ram: Option<String>,

    #[serde(rename = "minGPU", alias = "min_gpu", default, skip_serializing_if = "Option::is_none")]
    pub min_gpu: Option<String>,
}

impl ComponentRequirements {
    /// Split dependencies into `(name, minimum version)` pairs
    pub fn parsed_dependencies(&self) -> Vec<(&str, Option<&str>)> {
        self.dependencies
            .iter()
            .map(|dep| match dep.split_once(">=") {
                Some((name, version)) => (name.trim(), Some(version.trim())),
                None => (dep.trim(), None),
            })
            .collect()
    }
}

/// Problem type of the dataset or model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProblemType {
    Classification,
    Regression,
    Clustering,
    #[serde(other)]
    Other,
}

impl std::fmt::Display for ProblemType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Classification => write!(f, "classification"),
            Self::Regression => write!(f, "regression"),
            Self::Clustering => write!(f, "clustering"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// Optional dataset context supplied by the caller. Never stored in a pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetInfo {
    /// Dataset name
    pub name: String,

    /// Dataset type (e.g. "csv", "tabular", "images")
    #[serde(rename = "type", default)]
    pub data_type: String,

    /// Number of rows
    #[serde(default)]
    pub size: u64,

    /// Column names
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<Vec<String>>,

    /// Target column
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_column: Option<String>,

    /// Problem type
    #[serde(default = "default_problem_type")]
    pub problem_type: ProblemType,

    /// Feature characteristics that gate generated code blocks
    #[serde(default)]
    pub data_characteristics: DataCharacteristics,
}

fn default_problem_type() -> ProblemType {
    ProblemType::Other
}

impl DatasetInfo {
    /// Load dataset info from a JSON or YAML file
    pub fn from_file(path: &Path) -> PipecraftResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| PipecraftError::FileReadError {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        if is_yaml_path(path) {
            serde_yaml::from_str(&content).map_err(Into::into)
        } else {
            serde_json::from_str(&content).map_err(Into::into)
        }
    }
}

/// Independent feature flags of a dataset
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataCharacteristics {
    #[serde(default)]
    pub has_missing_values: bool,
    #[serde(default)]
    pub has_categorical_features: bool,
    #[serde(default)]
    pub has_numerical_features: bool,
    #[serde(default)]
    pub has_text_features: bool,
    #[serde(default)]
    pub has_image_features: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_pipeline() -> Pipeline {
        let mut pipeline = Pipeline::new("p1", "Sensor Forecast");
        pipeline.description = "Forecast sensor readings".into();
        pipeline.estimated_accuracy = 0.9;
        pipeline.estimated_latency = 100.0;
        pipeline.append_components(vec![
            PipelineComponent::new(
                "standard_scaler",
                "Standard Scaler",
                ComponentKind::Preprocessing,
                "Normalizes numeric features.",
            ),
            PipelineComponent::new(
                "transformer_model",
                "Time Series Transformer",
                ComponentKind::Model,
                "Attention over time.",
            )
            .with_problem_type(ProblemType::Regression),
        ]);
        pipeline
    }

    #[test]
    fn test_parse_pipeline_json() {
        let json = r#"{
  "id": "1",
  "name": "ML Pipeline",
  "description": "Generated ML Pipeline",
  "components": [
    {
      "id": "pca",
      "name": "PCA",
      "description": "Dimensionality reduction",
      "type": "feature",
      "requirements": {
        "dependencies": ["scikit-learn>=1.0.0"],
        "environments": ["Python 3.7+"]
      }
    }
  ],
  "totalModels": 0,
  "estimatedAccuracy": 0.9,
  "estimatedLatency": 100
}"#;

        let pipeline = Pipeline::from_json(json).unwrap();
        assert_eq!(pipeline.name, "ML Pipeline");
        assert_eq!(pipeline.components.len(), 1);
        assert_eq!(pipeline.components[0].kind, ComponentKind::Feature);
        assert_eq!(pipeline.estimated_latency, 100.0);
    }

    #[test]
    fn test_unknown_kind_is_preserved() {
        let json = r#"{"id": "x", "name": "Mystery", "type": "quantum"}"#;
        let component: PipelineComponent = serde_json::from_str(json).unwrap();
        assert_eq!(component.kind, ComponentKind::Unknown("quantum".into()));

        let back = serde_json::to_string(&component).unwrap();
        assert!(back.contains(r#""type":"quantum""#));
    }

    #[test]
    fn test_round_trip_json() {
        let pipeline = sample_pipeline();
        let json = pipeline.to_json_pretty().unwrap();
        let parsed = Pipeline::from_json(&json).unwrap();
        assert_eq!(parsed, pipeline);
    }

    #[test]
    fn test_round_trip_yaml() {
        let pipeline = sample_pipeline();
        let yaml = pipeline.to_yaml().unwrap();
        let parsed = Pipeline::from_yaml(&yaml).unwrap();
        assert_eq!(parsed, pipeline);
    }

    #[test]
    fn test_dump_rejects_non_finite_numbers() {
        let mut pipeline = sample_pipeline();
        pipeline.estimated_latency = f64::INFINITY;
        let err = pipeline.to_json_pretty().unwrap_err();
        assert!(err.to_string().contains("estimatedLatency"));

        let mut pipeline = sample_pipeline();
        pipeline.estimated_accuracy = f64::NAN;
        assert!(pipeline.to_json_pretty().is_err());

        let mut pipeline = sample_pipeline();
        pipeline.components[0].metrics = Some(ComponentMetrics {
            throughput: Some(f64::NEG_INFINITY),
            ..Default::default()
        });
        let err = pipeline.to_json_pretty().unwrap_err();
        assert!(err.to_string().contains("metrics.throughput"));

        // Finite values still round-trip
        let mut pipeline = sample_pipeline();
        pipeline.estimated_latency = 1e300;
        let parsed = Pipeline::from_json(&pipeline.to_json_pretty().unwrap()).unwrap();
        assert_eq!(parsed, pipeline);
    }

    #[test]
    fn test_dump_key_order() {
        let json = sample_pipeline().to_json_pretty().unwrap();
        // Top-level keys sit at two spaces of indentation
        let positions: Vec<usize> = [
            "id",
            "name",
            "description",
            "components",
            "totalModels",
            "estimatedAccuracy",
            "estimatedLatency",
        ]
        .iter()
        .map(|key| json.find(&format!("\n  \"{}\":", key)).unwrap())
        .collect();

        let mut sorted = positions.clone();
        sorted.sort();
        assert_eq!(positions, sorted);
    }

    #[test]
    fn test_append_never_reorders_and_suffixes_ids() {
        let mut pipeline = sample_pipeline();
        let assigned = pipeline.append_components(vec![
            PipelineComponent::new("standard_scaler", "Standard Scaler", ComponentKind::Preprocessing, ""),
            PipelineComponent::new("standard_scaler", "Standard Scaler", ComponentKind::Preprocessing, ""),
        ]);

        assert_eq!(assigned, vec!["standard_scaler_2", "standard_scaler_3"]);
        assert_eq!(pipeline.components[0].id, "standard_scaler");
        assert_eq!(pipeline.components[1].id, "transformer_model");
        assert_eq!(pipeline.total_models, 1);
    }

    #[test]
    fn test_effective_problem_type() {
        let dataset = DatasetInfo {
            name: "sensors".into(),
            data_type: "csv".into(),
            size: 1000,
            columns: None,
            target_column: None,
            problem_type: ProblemType::Classification,
            data_characteristics: DataCharacteristics::default(),
        };

        let plain = PipelineComponent::new("m", "Model", ComponentKind::Model, "");
        assert_eq!(plain.effective_problem_type(None), ProblemType::Other);
        assert_eq!(plain.effective_problem_type(Some(&dataset)), ProblemType::Classification);

        let hinted = plain.with_problem_type(ProblemType::Regression);
        assert_eq!(hinted.effective_problem_type(Some(&dataset)), ProblemType::Regression);
    }

    #[test]
    fn test_parsed_dependencies() {
        let req = ComponentRequirements {
            dependencies: vec!["torch>=1.10.0".into(), "shap".into()],
            ..Default::default()
        };
        assert_eq!(
            req.parsed_dependencies(),
            vec![("torch", Some("1.10.0")), ("shap", None)]
        );
    }
}
