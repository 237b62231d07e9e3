// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 pipecraft contributors

//! Code refactoring
//!
//! Refactor requests go to the backend when delegation is enabled. When the
//! backend is unavailable, or delegation is off, a crude local text transform
//! stands in.

use regex::Regex;
use std::str::FromStr;
use std::sync::OnceLock;
use tracing::{debug, warn};

use crate::client::{strip_code_fences, CodeOutcome, CodeSource, PipelineService};
use crate::codegen::python;
use crate::errors::{PipecraftError, PipecraftResult};

/// What kind of refactoring to apply
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefactorIntent {
    Simplify,
    AddComments,
    Optimize,
    /// Free-form instruction
    Custom(String),
}

impl RefactorIntent {
    /// Parse an intent name; `custom` takes its instruction from `prompt`
    pub fn parse(intent: &str, prompt: Option<&str>) -> PipecraftResult<Self> {
        match intent.trim().to_ascii_lowercase().as_str() {
            "simplify" => Ok(Self::Simplify),
            "add-comments" | "comments" => Ok(Self::AddComments),
            "optimize" => Ok(Self::Optimize),
            "custom" => match prompt.map(str::trim).filter(|p| !p.is_empty()) {
                Some(prompt) => Ok(Self::Custom(prompt.to_string())),
                None => Err(PipecraftError::Config {
                    message: "the custom refactor intent needs a prompt".into(),
                    help: Some("Pass the instruction with --prompt".into()),
                }),
            },
            _ => Err(PipecraftError::UnknownRefactorIntent {
                intent: intent.to_string(),
            }),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Simplify => "simplify",
            Self::AddComments => "add-comments",
            Self::Optimize => "optimize",
            Self::Custom(_) => "custom",
        }
    }

    /// Instruction sent to the backend
    pub fn instruction(&self) -> String {
        match self {
            Self::Simplify => {
                "Simplify this code: remove redundancy and make it easier to read without changing behavior"
                    .to_string()
            }
            Self::AddComments => {
                "Add clear comments and docstrings explaining what each class and function does".to_string()
            }
            Self::Optimize => "Optimize this code for performance and memory usage".to_string(),
            Self::Custom(prompt) => prompt.clone(),
        }
    }

    /// Apply the local text transform for this intent
    pub fn apply_locally(&self, code: &str) -> String {
        match self {
            Self::Simplify => collapse_blank_lines(code),
            Self::AddComments => annotate_definitions(code),
            Self::Optimize => normalize_whitespace(code),
            Self::Custom(prompt) => format!("# Refactor request: {}\n{}", python::comment(prompt), code),
        }
    }
}

impl FromStr for RefactorIntent {
    type Err = PipecraftError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s, None)
    }
}

/// Refactor code, delegating to the backend when allowed
pub async fn refactor(
    service: Option<&dyn PipelineService>,
    code: &str,
    intent: &RefactorIntent,
) -> CodeOutcome {
    let Some(service) = service else {
        debug!(intent = intent.name(), "Refactoring locally");
        return CodeOutcome {
            code: intent.apply_locally(code),
            source: CodeSource::Local,
        };
    };

    match service.refactor_code(code, &intent.instruction()).await {
        Ok(refactored) => CodeOutcome {
            code: strip_code_fences(&refactored),
            source: CodeSource::Remote,
        },
        Err(e) => {
            warn!(error = %e, intent = intent.name(), "Backend refactor failed, using local transform");
            CodeOutcome {
                code: intent.apply_locally(code),
                source: CodeSource::Template {
                    reason: e.to_string(),
                },
            }
        }
    }
}

fn collapse_blank_lines(code: &str) -> String {
    let mut out = String::with_capacity(code.len());
    let mut previous_blank = false;

    for line in code.lines() {
        let blank = line.trim().is_empty();
        if blank && previous_blank {
            continue;
        }
        out.push_str(if blank { "" } else { line });
        out.push('\n');
        previous_blank = blank;
    }

    keep_trailing_newline(code, out)
}

fn definition_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\s*)(class|def)\s+(\w+)").expect("valid regex"))
}

fn annotate_definitions(code: &str) -> String {
    let mut out = String::with_capacity(code.len());
    let mut previous = "";

    for line in code.lines() {
        if let Some(caps) = definition_regex().captures(line) {
            let indent = &caps[1];
            let label = if &caps[2] == "class" { "Class" } else { "Function" };
            let note = format!("# {}: {}", label, &caps[3]);
            if previous.trim() != note {
                out.push_str(indent);
                out.push_str(&note);
                out.push('\n');
            }
        }
        out.push_str(line);
        out.push('\n');
        previous = line;
    }

    keep_trailing_newline(code, out)
}

fn normalize_whitespace(code: &str) -> String {
    let mut out = String::with_capacity(code.len());
    for line in code.lines() {
        out.push_str(line.replace('\t', "    ").trim_end());
        out.push('\n');
    }
    keep_trailing_newline(code, out)
}

fn keep_trailing_newline(original: &str, mut out: String) -> String {
    if !original.ends_with('\n') {
        out.pop();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_intents() {
        assert_eq!(RefactorIntent::parse("simplify", None).unwrap(), RefactorIntent::Simplify);
        assert_eq!("Add-Comments".parse::<RefactorIntent>().unwrap(), RefactorIntent::AddComments);
        assert_eq!(
            RefactorIntent::parse("custom", Some("use dataclasses")).unwrap(),
            RefactorIntent::Custom("use dataclasses".into())
        );
    }

    #[test]
    fn test_unknown_intent_is_an_error() {
        let err = RefactorIntent::parse("rewrite-in-rust", None).unwrap_err();
        assert!(matches!(err, PipecraftError::UnknownRefactorIntent { .. }));
        assert!(err.is_configuration_error());
    }

    #[test]
    fn test_custom_requires_prompt() {
        assert!(RefactorIntent::parse("custom", None).is_err());
        assert!(RefactorIntent::parse("custom", Some("   ")).is_err());
    }

    #[test]
    fn test_simplify_collapses_blank_runs() {
        let code = "a = 1\n\n\n\nb = 2\n  \n\t\nc = 3\n";
        assert_eq!(RefactorIntent::Simplify.apply_locally(code), "a = 1\n\nb = 2\n\nc = 3\n");
    }

    #[test]
    fn test_add_comments_keeps_indentation() {
        let code = "class Scaler:\n    def fit(self, X):\n        return self\n";
        let expected = "# Class: Scaler\nclass Scaler:\n    # Function: fit\n    def fit(self, X):\n        return self\n";
        let annotated = RefactorIntent::AddComments.apply_locally(code);
        assert_eq!(annotated, expected);

        // Running twice adds nothing new
        assert_eq!(RefactorIntent::AddComments.apply_locally(&annotated), expected);
    }

    #[test]
    fn test_optimize_normalizes_whitespace() {
        let code = "def f():\t\n\treturn 1   \n";
        assert_eq!(RefactorIntent::Optimize.apply_locally(code), "def f():\n    return 1\n");
    }

    #[test]
    fn test_custom_prepends_request() {
        let out = RefactorIntent::Custom("use\ntype hints".into()).apply_locally("x = 1\n");
        assert_eq!(out, "# Refactor request: use type hints\nx = 1\n");
    }

    #[test]
    fn test_local_refactor_without_service() {
        let outcome = tokio_test::block_on(refactor(None, "a\n\n\nb\n", &RefactorIntent::Simplify));
        assert_eq!(outcome.source, CodeSource::Local);
        assert_eq!(outcome.code, "a\n\nb\n");
    }
}
