// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 pipecraft contributors

//! Configuration loading
//!
//! Settings come from `pipecraft.toml` in the working directory, or from the
//! user config directory when the project has none. Every key has a default.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::codegen::{Framework, Language};
use crate::errors::{PipecraftError, PipecraftResult};

/// Name of the configuration file
pub const CONFIG_FILE: &str = "pipecraft.toml";

/// Environment variable overriding `backend.url`
pub const BACKEND_URL_ENV: &str = "PIPECRAFT_BACKEND_URL";

/// Settings from pipecraft.toml
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Pipeline backend connection
    #[serde(default)]
    pub backend: BackendSettings,

    /// Code export defaults
    #[serde(default)]
    pub codegen: CodegenSettings,

    /// Refactoring behavior
    #[serde(default)]
    pub refactor: RefactorSettings,
}

/// Backend connection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendSettings {
    /// Base URL of the HTTP backend
    #[serde(default = "default_backend_url")]
    pub url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Whether remote calls are made at all
    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_backend_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_true() -> bool {
    true
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            url: default_backend_url(),
            timeout_secs: default_timeout_secs(),
            enabled: true,
        }
    }
}

/// Code export defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodegenSettings {
    #[serde(default = "default_language")]
    pub language: Language,

    #[serde(default = "default_framework")]
    pub framework: Framework,
}

fn default_language() -> Language {
    Language::Python
}

fn default_framework() -> Framework {
    Framework::PyTorch
}

impl Default for CodegenSettings {
    fn default() -> Self {
        Self {
            language: default_language(),
            framework: default_framework(),
        }
    }
}

/// Refactoring settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefactorSettings {
    /// Send refactor requests to the backend before using local transforms
    #[serde(default = "default_true")]
    pub delegate: bool,
}

impl Default for RefactorSettings {
    fn default() -> Self {
        Self { delegate: true }
    }
}

impl Settings {
    /// Load settings from a file. A missing file yields defaults.
    pub fn load(path: &Path) -> PipecraftResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| PipecraftError::FileReadError {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::from_toml(&content)
    }

    /// Parse settings from TOML text
    pub fn from_toml(content: &str) -> PipecraftResult<Self> {
        let settings: Self = toml::from_str(content)?;
        settings.check()?;
        Ok(settings)
    }

    /// Discover settings: the project file first, then the user config file,
    /// then defaults. `PIPECRAFT_BACKEND_URL` wins over any file.
    pub fn discover(project_root: &Path) -> PipecraftResult<Self> {
        let candidates = [Some(project_root.join(CONFIG_FILE)), user_config_path()];

        let mut settings = match candidates.into_iter().flatten().find(|p| p.exists()) {
            Some(path) => {
                tracing::debug!(path = %path.display(), "Loading settings");
                Self::load(&path)?
            }
            None => Self::default(),
        };

        if let Ok(url) = std::env::var(BACKEND_URL_ENV) {
            settings.apply_backend_url(&url)?;
        }

        Ok(settings)
    }

    /// Override the backend URL
    pub fn apply_backend_url(&mut self, url: &str) -> PipecraftResult<()> {
        let url = url.trim().trim_end_matches('/');
        validate_url(url)?;
        self.backend.url = url.to_string();
        Ok(())
    }

    /// Serialize to TOML
    pub fn to_toml(&self) -> PipecraftResult<String> {
        toml::to_string_pretty(self).map_err(|e| PipecraftError::Toml {
            message: e.to_string(),
        })
    }

    /// Save to file
    pub fn save(&self, path: &Path) -> PipecraftResult<()> {
        std::fs::write(path, self.to_toml()?).map_err(|e| PipecraftError::FileWriteError {
            path: path.to_path_buf(),
            error: e.to_string(),
        })
    }

    fn check(&self) -> PipecraftResult<()> {
        validate_url(&self.backend.url)?;

        if self.backend.timeout_secs == 0 {
            return Err(PipecraftError::Config {
                message: "backend.timeout_secs must be greater than zero".into(),
                help: Some("Use a timeout such as 60".into()),
            });
        }

        Ok(())
    }
}

fn validate_url(url: &str) -> PipecraftResult<()> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(PipecraftError::Config {
            message: format!("backend URL '{}' must start with http:// or https://", url),
            help: Some(format!("For a local backend use {}", default_backend_url())),
        })
    }
}

/// Location of the per-user config file
pub fn user_config_path() -> Option<PathBuf> {
    ProjectDirs::from("dev", "pipecraft", "pipecraft").map(|dirs| dirs.config_dir().join(CONFIG_FILE))
}
