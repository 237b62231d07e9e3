// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 pipecraft contributors

//! Pipeline definitions and types
//!
//! This module defines the pipeline data model, the built-in component
//! catalog, identifier derivation, validation and graph rendering.

pub mod catalog;
mod definition;
mod graph;
pub mod identifier;
mod validation;

pub use definition::*;
pub use graph::PipelineGraph;
pub use validation::{PipelineValidator, RestructurePlan, ValidationResult};
