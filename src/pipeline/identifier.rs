// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 pipecraft contributors

//! Identifier derivation from human-readable component names
//!
//! Callers must keep derived names unique within a pipeline; the code
//! generator does not defend against collisions. `PipelineValidator` reports
//! them.

/// Derive a class name: whitespace and non-identifier characters are dropped.
///
/// `"Min-Max Scaler"` becomes `MinMaxScaler`, a leading digit gets a `_`
/// prefix and an empty result falls back to `Component`.
pub fn class_name(name: &str) -> String {
    let ident: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect();

    finish(ident, "Component")
}

/// Class name of the orchestrator generated for a pipeline; a blank name
/// falls back to `MLPipeline`.
pub fn pipeline_class_name(pipeline_name: &str) -> String {
    if pipeline_name.trim().is_empty() {
        class_name("ML Pipeline")
    } else {
        class_name(pipeline_name)
    }
}

/// Class name of the framework network generated for a model component
pub fn network_class_name(name: &str) -> String {
    format!("{}Network", class_name(name))
}

/// Derive an attribute name: `"Standard Scaler"` becomes `standard_scaler`.
pub fn attribute_name(name: &str) -> String {
    let mut ident = String::with_capacity(name.len());
    let mut pending_sep = false;

    for c in name.chars() {
        if c.is_whitespace() || c == '-' {
            pending_sep = !ident.is_empty();
        } else if c.is_ascii_alphanumeric() || c == '_' {
            if pending_sep {
                ident.push('_');
                pending_sep = false;
            }
            ident.push(c.to_ascii_lowercase());
        }
    }

    finish(ident, "component")
}

/// Reserved words of Python 3; soft keywords such as `match` stay usable.
const PYTHON_KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class", "continue",
    "def", "del", "elif", "else", "except", "finally", "for", "from", "global", "if", "import", "in",
    "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return", "try", "while", "with",
    "yield",
];

/// Whether `ident` is a Python reserved word
pub fn is_python_keyword(ident: &str) -> bool {
    PYTHON_KEYWORDS.contains(&ident)
}

fn finish(ident: String, fallback: &str) -> String {
    match ident.chars().next() {
        None => fallback.to_string(),
        Some(c) if c.is_ascii_digit() => format!("_{}", ident),
        Some(_) if is_python_keyword(&ident) => format!("{}_", ident),
        Some(_) => ident,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_name() {
        assert_eq!(class_name("Standard Scaler"), "StandardScaler");
        assert_eq!(class_name("Min-Max Scaler"), "MinMaxScaler");
        assert_eq!(class_name("Time Series Transformer"), "TimeSeriesTransformer");
        assert_eq!(class_name("SHAP (v2) Explainer!"), "SHAPv2Explainer");
    }

    #[test]
    fn test_class_name_edge_cases() {
        assert_eq!(class_name("3D Encoder"), "_3DEncoder");
        assert_eq!(class_name("  "), "Component");
        assert_eq!(class_name("模型"), "Component");
    }

    #[test]
    fn test_attribute_name() {
        assert_eq!(attribute_name("Standard Scaler"), "standard_scaler");
        assert_eq!(attribute_name("JSON Output Formatter"), "json_output_formatter");
        assert_eq!(attribute_name("Min-Max  Scaler"), "min_max_scaler");
        assert_eq!(attribute_name(" Trailing "), "trailing");
        assert_eq!(attribute_name("2 Stage"), "_2_stage");
        assert_eq!(attribute_name(""), "component");
    }

    #[test]
    fn test_pipeline_and_network_class_names() {
        assert_eq!(pipeline_class_name("ML Pipeline"), "MLPipeline");
        assert_eq!(pipeline_class_name("   "), "MLPipeline");
        assert_eq!(pipeline_class_name("None"), "None_");
        assert_eq!(network_class_name("Time Series Transformer"), "TimeSeriesTransformerNetwork");
    }

    #[test]
    fn test_keywords_get_suffix() {
        assert_eq!(attribute_name("Lambda"), "lambda_");
        assert_eq!(attribute_name("Import"), "import_");
        assert_eq!(attribute_name(" Pass "), "pass_");
        assert_eq!(class_name("Lambda"), "Lambda");
        assert_eq!(class_name("None"), "None_");
        assert_eq!(class_name("True"), "True_");
        assert_eq!(attribute_name("class"), "class_");

        // Soft keywords and longer names are untouched
        assert_eq!(attribute_name("Match"), "match");
        assert_eq!(attribute_name("Pass Through"), "pass_through");
        assert!(!is_python_keyword("lambda_"));
    }
}
