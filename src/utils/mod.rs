// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 pipecraft contributors

//! Terminal output helpers for the pipecraft CLI

pub mod colors;
pub mod spinner;

pub use colors::*;
pub use spinner::*;
