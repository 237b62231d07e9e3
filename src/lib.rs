// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 pipecraft contributors

//! # pipecraft - ML pipeline authoring
//!
//! `pipecraft` turns natural-language requests into ML pipelines and exports
//! them as PyTorch, TensorFlow or scikit-learn source code.
//!
//! ## Features
//!
//! - **Deterministic code generation** - Same pipeline, same bytes
//! - **Three frameworks** - PyTorch, TensorFlow/Keras and scikit-learn templates
//! - **Backend collaboration** - Pipeline generation, clarification and refactoring over HTTP
//! - **Offline fallback** - Template generation keeps working without the backend
//! - **Validation** - Ordering, environment and dependency checks before export
//!
//! ## Quick Start
//!
//! ```bash
//! # Start from the example pipeline
//! pipecraft init
//!
//! # Export it as scikit-learn code
//! pipecraft code --framework sklearn -o pipeline.py
//!
//! # Generate a pipeline from a prompt
//! pipecraft generate "detect anomalies in sensor data" --mode agentic
//! ```
//!
//! ## Library use
//!
//! ```
//! use pipecraft::codegen::{generate_code, Framework, Language};
//! use pipecraft::pipeline::{ComponentKind, Pipeline, PipelineComponent};
//!
//! let mut pipeline = Pipeline::new("demo", "Demo");
//! pipeline.append_components(vec![PipelineComponent::new(
//!     "scaler",
//!     "Standard Scaler",
//!     ComponentKind::Preprocessing,
//!     "Scale features",
//! )]);
//!
//! let code = generate_code(&pipeline, Language::Python, Framework::Sklearn, None, None).unwrap();
//! assert!(code.contains("class StandardScaler"));
//! ```

pub mod analyzer;
pub mod cli;
pub mod client;
pub mod codegen;
pub mod config;
pub mod errors;
pub mod pipeline;
pub mod utils;

// Re-export commonly used types
pub use codegen::{generate_code, Framework, Language};
pub use errors::{PipecraftError, PipecraftResult};
pub use pipeline::{Pipeline, PipelineComponent};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
