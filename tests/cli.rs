// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 pipecraft contributors

//! End-to-end tests of the pipecraft binary

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

use pipecraft::pipeline::Pipeline;

fn pipecraft(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("pipecraft").unwrap();
    cmd.arg("-C")
        .arg(dir.path())
        .env_remove("PIPECRAFT_BACKEND_URL")
        .env("HOME", dir.path())
        .env("XDG_CONFIG_HOME", dir.path().join(".config"))
        .env("NO_COLOR", "1");
    cmd
}

fn initialized() -> TempDir {
    let dir = TempDir::new().unwrap();
    pipecraft(&dir).arg("init").assert().success();
    dir
}

#[test]
fn init_creates_pipeline_and_settings() {
    let dir = TempDir::new().unwrap();

    pipecraft(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created pipeline.json"))
        .stdout(predicate::str::contains("Created pipecraft.toml"));

    let pipeline = Pipeline::from_file(&dir.path().join("pipeline.json")).unwrap();
    assert_eq!(pipeline.components.len(), 3);

    // A second init refuses to overwrite
    pipecraft(&dir)
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn code_offline_writes_python() {
    let dir = initialized();

    pipecraft(&dir)
        .args(["code", "--offline", "--framework", "sklearn"])
        .assert()
        .success()
        .stdout(predicate::str::contains("class StandardScaler:"))
        .stdout(predicate::str::contains("result = self.time_series_transformer.predict(result)"));
}

#[test]
fn code_json_ignores_framework() {
    let dir = initialized();

    let output = pipecraft(&dir)
        .args(["code", "--language", "json", "--framework", "jax"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let dumped = Pipeline::from_json(&String::from_utf8(output.stdout).unwrap()).unwrap();
    let saved = Pipeline::from_file(&dir.path().join("pipeline.json")).unwrap();
    assert_eq!(dumped, saved);
}

#[test]
fn code_rejects_unknown_framework() {
    let dir = initialized();

    pipecraft(&dir)
        .args(["code", "--offline", "--framework", "jax"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported framework"));
}

#[test]
fn code_falls_back_when_backend_is_down() {
    let dir = initialized();

    pipecraft(&dir)
        .env("PIPECRAFT_BACKEND_URL", "http://127.0.0.1:9")
        .args(["code", "--framework", "pytorch", "-o", "pipeline.py"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Backend unavailable"));

    let code = std::fs::read_to_string(dir.path().join("pipeline.py")).unwrap();
    assert!(code.contains("import torch"));
}

#[test]
fn missing_pipeline_suggests_init() {
    let dir = TempDir::new().unwrap();

    pipecraft(&dir)
        .args(["validate"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("pipecraft init"));
}

#[test]
fn validate_example_pipeline() {
    let dir = initialized();

    pipecraft(&dir)
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("Pipeline file parsed"));
}

#[test]
fn add_appends_catalog_components() {
    let dir = initialized();

    pipecraft(&dir)
        .args(["add", "pca", "robust_scaler"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added pca"))
        .stdout(predicate::str::contains("Added robust_scaler"));

    let pipeline = Pipeline::from_file(&dir.path().join("pipeline.json")).unwrap();
    let ids: Vec<&str> = pipeline.components.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(
        ids,
        vec!["standard_scaler", "transformer_model", "json_exporter", "pca", "robust_scaler"]
    );
}

#[test]
fn add_duplicate_needs_force() {
    let dir = initialized();

    pipecraft(&dir)
        .args(["add", "standard_scaler"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));

    pipecraft(&dir)
        .args(["add", "standard_scaler", "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added standard_scaler_2"));
}

#[test]
fn add_unknown_component_fails() {
    let dir = initialized();

    pipecraft(&dir)
        .args(["add", "quantum_annealer"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found in catalog"));
}

#[test]
fn catalog_lists_and_shows() {
    let dir = TempDir::new().unwrap();

    pipecraft(&dir)
        .args(["catalog", "list", "--kind", "model"])
        .assert()
        .success()
        .stdout(predicate::str::contains("transformer_model"))
        .stdout(predicate::str::contains("standard_scaler").not());

    pipecraft(&dir)
        .args(["catalog", "show", "shap_explainer"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dependencies"));
}

#[test]
fn graph_as_mermaid() {
    let dir = initialized();

    pipecraft(&dir)
        .args(["graph", "--format", "mermaid"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("graph TD"))
        .stdout(predicate::str::contains("Time Series Transformer"));
}

#[test]
fn refactor_locally() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("model.py"), "class A:\n    def f(self):\n        pass\n").unwrap();

    pipecraft(&dir)
        .args(["refactor", "model.py", "--intent", "add-comments", "--local"])
        .assert()
        .success()
        .stdout(predicate::str::contains("# Class: A\nclass A:"))
        .stdout(predicate::str::contains("    # Function: f\n"));

    pipecraft(&dir)
        .args(["refactor", "model.py", "--intent", "rewrite"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown refactor intent"));
}

#[test]
fn recommend_json() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("train.py"), "model = BertModel()\noptimizer.step()\n").unwrap();

    let output = pipecraft(&dir)
        .args(["recommend", "train.py", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["hardware"][0]["name"], "NVIDIA A100");
    assert_eq!(json["signals"]["requires_training"], true);
}
