// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 pipecraft contributors

//! Code assembly engine
//!
//! Turns a pipeline into Python source for one framework, or into the
//! pipeline's own JSON form. Generation is a pure function of its inputs:
//! the same arguments always produce byte-identical text.

pub mod cache;
pub mod components;
pub mod python;
pub mod templates;

pub use cache::CodeCache;

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::{debug, warn};

use crate::errors::{PipecraftError, PipecraftResult};
use crate::pipeline::identifier::{attribute_name, class_name, pipeline_class_name};
use crate::pipeline::{ComponentKind, DatasetInfo, Pipeline};

/// Output language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Python source code
    Python,
    /// Structural dump of the pipeline
    Json,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::Python, Language::Json];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Python => "python",
            Self::Json => "json",
        }
    }

    /// File extension for exported artifacts
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Python => "py",
            Self::Json => "json",
        }
    }
}

impl FromStr for Language {
    type Err = PipecraftError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "python" | "py" => Ok(Self::Python),
            "json" => Ok(Self::Json),
            _ => Err(PipecraftError::UnsupportedLanguage {
                language: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Target framework
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Framework {
    #[serde(rename = "pytorch")]
    PyTorch,
    #[serde(rename = "tensorflow")]
    TensorFlow,
    Sklearn,
}

impl Framework {
    pub const ALL: [Framework; 3] = [Framework::PyTorch, Framework::TensorFlow, Framework::Sklearn];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PyTorch => "pytorch",
            Self::TensorFlow => "tensorflow",
            Self::Sklearn => "sklearn",
        }
    }
}

impl FromStr for Framework {
    type Err = PipecraftError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pytorch" | "torch" => Ok(Self::PyTorch),
            "tensorflow" | "tf" | "keras" => Ok(Self::TensorFlow),
            "sklearn" | "scikit-learn" => Ok(Self::Sklearn),
            _ => Err(PipecraftError::UnsupportedFramework {
                framework: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for Framework {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

const BASE_IMPORTS: &[&str] = &[
    "import logging",
    "from pathlib import Path",
    "",
    "import numpy as np",
    "import pandas as pd",
    "from sklearn.cluster import KMeans as sk_KMeans",
    "from sklearn.decomposition import PCA as sk_PCA",
    "from sklearn.ensemble import RandomForestClassifier as sk_RandomForestClassifier",
    "from sklearn.ensemble import RandomForestRegressor as sk_RandomForestRegressor",
    "from sklearn.feature_extraction.text import TfidfVectorizer as sk_TfidfVectorizer",
    "from sklearn.impute import SimpleImputer as sk_SimpleImputer",
    "from sklearn.inspection import permutation_importance as sk_permutation_importance",
    "from sklearn.metrics import accuracy_score as sk_accuracy_score",
    "from sklearn.metrics import mean_squared_error as sk_mean_squared_error",
    "from sklearn.metrics import silhouette_score as sk_silhouette_score",
    "from sklearn.preprocessing import OneHotEncoder as sk_OneHotEncoder",
    "from sklearn.preprocessing import StandardScaler as sk_StandardScaler",
];

const LOGGING_SETUP: &str = "logging.basicConfig(
    level=logging.INFO,
    format='%(asctime)s - %(name)s - %(levelname)s - %(message)s',
)
logger = logging.getLogger(__name__)";

const LOAD_DATASET: &str = r#"def load_dataset(path) -> pd.DataFrame:
    """Load a dataset from a CSV, JSON or Parquet file."""
    path = Path(path)
    if path.suffix == '.json':
        return pd.read_json(path)
    if path.suffix == '.parquet':
        return pd.read_parquet(path)
    return pd.read_csv(path)"#;

const EXPLORE_DATA: &str = r#"def explore_data(df: pd.DataFrame) -> dict:
    """Summarize the {{ dataset }} dataset ({{ data_type }}, {{ size }} rows expected)."""
    summary = {
        'shape': df.shape,
        'dtypes': df.dtypes.astype(str).to_dict(),
        'missing': df.isnull().sum().to_dict(),
    }
    logger.info('Loaded %d rows and %d columns', df.shape[0], df.shape[1])"#;

/// Generate code for a pipeline.
///
/// `Language::Json` returns the structural dump and ignores every other
/// argument. Unknown component kinds are skipped with a warning.
pub fn generate_code(
    pipeline: &Pipeline,
    language: Language,
    framework: Framework,
    dataset: Option<&DatasetInfo>,
    problem_statement: Option<&str>,
) -> PipecraftResult<String> {
    match language {
        Language::Json => pipeline.to_json_pretty(),
        Language::Python => Ok(generate_python(pipeline, framework, dataset, problem_statement)),
    }
}

/// Like [`generate_code`], but with language and framework given by name.
///
/// An unsupported language always fails. The framework is only parsed for
/// source-code output, so a structural dump succeeds whatever it says.
pub fn generate_code_named(
    pipeline: &Pipeline,
    language: &str,
    framework: &str,
    dataset: Option<&DatasetInfo>,
    problem_statement: Option<&str>,
) -> PipecraftResult<String> {
    let language: Language = language.parse()?;
    match language {
        Language::Json => pipeline.to_json_pretty(),
        Language::Python => {
            let framework: Framework = framework.parse()?;
            generate_code(pipeline, language, framework, dataset, problem_statement)
        }
    }
}

fn generate_python(
    pipeline: &Pipeline,
    framework: Framework,
    dataset: Option<&DatasetInfo>,
    problem_statement: Option<&str>,
) -> String {
    let template = templates::for_framework(framework);
    debug!(
        pipeline = %pipeline.name,
        framework = %framework,
        components = pipeline.components.len(),
        "Generating Python source"
    );

    let mut sections: Vec<String> = Vec::new();

    let mut imports = BASE_IMPORTS.join("\n");
    imports.push_str("\n\n");
    imports.push_str(&template.imports().join("\n"));
    sections.push(imports);

    sections.push(LOGGING_SETUP.to_string());

    if let Some(problem) = problem_statement.map(str::trim).filter(|p| !p.is_empty()) {
        sections.push(format!(
            "\"\"\"\nProblem statement:\n\n{}\n\"\"\"",
            python::docstring(problem)
        ));
    }

    sections.push(LOAD_DATASET.to_string());

    if let Some(dataset) = dataset {
        sections.push(explore_data(dataset));
        sections.push(preprocess_data(dataset));
    }

    for component in &pipeline.components {
        if let ComponentKind::Unknown(kind) = &component.kind {
            warn!(
                component = %component.id,
                kind = %kind,
                "Skipping component with unknown type"
            );
            continue;
        }

        if component.kind == ComponentKind::Model {
            sections.push(template.model_class(component));
        }
        sections.push(components::generate(component, dataset));
    }

    sections.push(template.training_loop());
    sections.push(orchestrator(pipeline));

    let mut code = sections.join("\n\n\n");
    code.push('\n');
    code
}

fn explore_data(dataset: &DatasetInfo) -> String {
    let size = dataset.size.to_string();
    let mut out = python::render(
        EXPLORE_DATA,
        &[
            ("dataset", python::docstring(&dataset.name).as_str()),
            ("data_type", python::docstring(&dataset.data_type).as_str()),
            ("size", size.as_str()),
        ],
    );

    if let Some(target) = &dataset.target_column {
        let target = python::string_literal(target);
        out.push_str(&format!(
            "\n    if {target} in df.columns:\n        summary['target_distribution'] = df[{target}].value_counts().to_dict()",
            target = target
        ));
    }

    out.push_str("\n    return summary");
    out
}

fn preprocess_data(dataset: &DatasetInfo) -> String {
    let flags = &dataset.data_characteristics;
    let mut out = String::from(
        "def preprocess_data(df: pd.DataFrame):\n    \"\"\"Separate features from the target and apply basic cleaning.\"\"\"\n    df = df.copy()",
    );

    if flags.has_missing_values {
        out.push_str("\n    df = df.dropna(axis=1, how='all')");
    }

    if flags.has_categorical_features {
        out.push_str(
            "\n    categorical = df.select_dtypes(include=['object']).columns\n    df[categorical] = df[categorical].astype('category')",
        );
    }

    match &dataset.target_column {
        Some(target) => {
            let target = python::string_literal(target);
            out.push_str(&format!(
                "\n    y = df.pop({target}) if {target} in df.columns else None",
                target = target
            ));
        }
        None => out.push_str("\n    y = None"),
    }

    out.push_str("\n    return df, y");
    out
}

/// Top-level class wiring every component in pipeline order
fn orchestrator(pipeline: &Pipeline) -> String {
    let name = if pipeline.name.trim().is_empty() {
        "ML Pipeline"
    } else {
        pipeline.name.as_str()
    };

    let mut doc = python::docstring(&pipeline.description);
    if doc.is_empty() {
        doc = python::docstring(name);
    }

    let mut init = String::from("        self.logger = logging.getLogger(self.__class__.__name__)\n");
    let mut run = String::from("        result = X\n");

    for component in &pipeline.components {
        let attr = attribute_name(&component.name);

        match components::entry_method(&component.kind) {
            Some(method) => {
                init.push_str(&format!(
                    "        self.{} = {}()\n",
                    attr,
                    class_name(&component.name)
                ));
                run.push_str(&format!("        result = self.{}.{}(result)\n", attr, method));
            }
            None => {
                let note = format!(
                    "        # skipped: {} (unknown component type '{}')\n",
                    python::comment(&component.id),
                    python::comment(component.kind.as_str())
                );
                init.push_str(&note);
                run.push_str(&note);
            }
        }
    }

    format!(
        "class {class}:\n    \"\"\"{doc}\n\n    Runs every component in pipeline order.\n    \"\"\"\n\n    def __init__(self):\n{init}\n    def run(self, X):\n{run}        return result\n\n    def predict(self, X):\n        return self.run(X)",
        class = pipeline_class_name(&pipeline.name),
        doc = doc,
        init = init,
        run = run,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{PipelineComponent, ProblemType};

    fn example_pipeline() -> Pipeline {
        let mut pipeline = Pipeline::new("1", "ML Pipeline");
        pipeline.description = "Generated ML Pipeline".into();
        pipeline.append_components(vec![
            PipelineComponent::new(
                "standard_scaler",
                "Standard Scaler",
                ComponentKind::Preprocessing,
                "Normalizes numeric features to zero mean and unit variance.",
            ),
            PipelineComponent::new(
                "transformer_model",
                "Time Series Transformer",
                ComponentKind::Model,
                "Captures long-term temporal patterns using attention mechanisms.",
            )
            .with_problem_type(ProblemType::Regression),
            PipelineComponent::new(
                "json_exporter",
                "JSON Output Formatter",
                ComponentKind::Postprocessing,
                "Formats predictions as JSON with timestamps and metadata.",
            ),
        ]);
        pipeline
    }

    #[test]
    fn test_parse_language_and_framework() {
        assert_eq!("Python".parse::<Language>().unwrap(), Language::Python);
        assert_eq!("sklearn".parse::<Framework>().unwrap(), Framework::Sklearn);
        assert!(matches!(
            "rust".parse::<Language>(),
            Err(PipecraftError::UnsupportedLanguage { .. })
        ));
        assert!(matches!(
            "jax".parse::<Framework>(),
            Err(PipecraftError::UnsupportedFramework { .. })
        ));
    }

    #[test]
    fn test_json_ignores_framework() {
        let pipeline = example_pipeline();
        let dump = generate_code_named(&pipeline, "json", "not-a-framework", None, Some("x")).unwrap();
        assert_eq!(Pipeline::from_json(&dump).unwrap(), pipeline);
    }

    #[test]
    fn test_unsupported_framework_fails_for_python() {
        let err = generate_code_named(&example_pipeline(), "python", "jax", None, None).unwrap_err();
        assert!(err.is_configuration_error());
    }

    #[test]
    fn test_section_order() {
        let dataset = DatasetInfo {
            name: "sensors".into(),
            data_type: "csv".into(),
            size: 100,
            columns: None,
            target_column: Some("load".into()),
            problem_type: ProblemType::Regression,
            data_characteristics: Default::default(),
        };
        let code = generate_code(
            &example_pipeline(),
            Language::Python,
            Framework::PyTorch,
            Some(&dataset),
            Some("Forecast load"),
        )
        .unwrap();

        let markers = [
            "import logging",
            "import torch",
            "logging.basicConfig(",
            "Problem statement:",
            "def load_dataset(",
            "def explore_data(",
            "def preprocess_data(",
            "class StandardScaler:",
            "class TimeSeriesTransformerNetwork(nn.Module):",
            "class TimeSeriesTransformer:",
            "class JSONOutputFormatter:",
            "def train_model(",
            "class MLPipeline:",
        ];
        let positions: Vec<usize> = markers.iter().map(|m| code.find(m).unwrap()).collect();
        let mut sorted = positions.clone();
        sorted.sort();
        assert_eq!(positions, sorted);
    }

    #[test]
    fn test_optional_sections_absent() {
        let code = generate_code(&example_pipeline(), Language::Python, Framework::Sklearn, None, None).unwrap();
        assert!(!code.contains("Problem statement:"));
        assert!(!code.contains("def explore_data("));
        assert!(!code.contains("def preprocess_data("));
        assert!(code.contains("def load_dataset("));
    }

    #[test]
    fn test_unknown_component_is_skipped() {
        let mut pipeline = example_pipeline();
        pipeline.components.insert(
            1,
            PipelineComponent::new("q", "Quantum Step", ComponentKind::Unknown("quantum".into()), ""),
        );

        let code = generate_code(&pipeline, Language::Python, Framework::PyTorch, None, None).unwrap();
        assert!(!code.contains("class QuantumStep"));
        assert!(!code.contains("self.quantum_step"));
        assert!(code.contains("# skipped: q (unknown component type 'quantum')"));
    }

    #[test]
    fn test_keyword_names_become_identifiers() {
        let mut pipeline = Pipeline::new("kw", "True");
        pipeline.append_components(vec![
            PipelineComponent::new("l", "Lambda", ComponentKind::Model, ""),
            PipelineComponent::new("p", "Pass", ComponentKind::Postprocessing, ""),
            PipelineComponent::new("n", "None", ComponentKind::Preprocessing, ""),
        ]);

        let code = generate_code(&pipeline, Language::Python, Framework::PyTorch, None, None).unwrap();
        assert!(code.contains("class True_:"));
        assert!(code.contains("class None_:"));
        assert!(code.contains("self.lambda_ = Lambda()"));
        assert!(code.contains("result = self.lambda_.predict(result)"));
        assert!(code.contains("self.pass_ = Pass()"));
        assert!(code.contains("self.none = None_()"));
        assert!(!code.contains("self.lambda "));
        assert!(!code.contains("class None:"));
    }

    #[test]
    fn test_empty_pipeline_orchestrator() {
        let pipeline = Pipeline::new("0", "Empty");
        let code = generate_code(&pipeline, Language::Python, Framework::TensorFlow, None, None).unwrap();
        insta::assert_snapshot!(orchestrator(&pipeline), @r###"
class Empty:
    """Empty

    Runs every component in pipeline order.
    """

    def __init__(self):
        self.logger = logging.getLogger(self.__class__.__name__)

    def run(self, X):
        result = X
        return result

    def predict(self, X):
        return self.run(X)
"###);
        assert!(code.ends_with("return self.run(X)\n"));
    }
}
