// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 pipecraft contributors

//! Python text helpers
//!
//! Everything user-supplied goes through one of the escaping functions here
//! before it is embedded in generated source.

use regex::{Captures, Regex};
use std::sync::OnceLock;

fn placeholder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\{\{ (\w+) \}\}").expect("placeholder pattern is valid"))
}

/// Substitute `{{ key }}` placeholders in a single pass.
///
/// Substituted text is never rescanned, so values may safely contain
/// placeholder-like text. Unknown keys are left untouched.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    placeholder_pattern()
        .replace_all(template, |caps: &Captures| {
            let key = &caps[1];
            vars.iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Escape text for the body of a `"""` docstring
pub fn docstring(text: &str) -> String {
    text.trim().replace('\\', "\\\\").replace('"', "\\\"")
}

/// Quote text as a single-quoted Python string literal
pub fn string_literal(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('\'');
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}

/// Flatten text onto a single line for use in a `#` comment
pub fn comment(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
