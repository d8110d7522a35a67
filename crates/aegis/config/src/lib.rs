//! Typed configuration for the governance engine.
//!
//! The core treats configuration as an immutable snapshot for the lifetime of
//! one orchestrator instance. A missing file yields full defaults; unknown
//! keys are ignored.

#![deny(unsafe_code)]

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Default configuration file name.
pub const DEFAULT_CONFIG_PATH: &str = ".aegis.yml";

/// How a violation from an engine should be treated downstream.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strictness {
    #[default]
    Warn,
    Enforce,
}

/// Global settings shared by all engines.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalSettings {
    pub strictness: Strictness,
    pub enabled: bool,
    /// Location of the audit log's backing store.
    pub audit_path: String,
}

impl Default for GlobalSettings {
    fn default() -> Self {
        Self {
            strictness: Strictness::Warn,
            enabled: true,
            audit_path: ".aegis/audit.sqlite".to_string(),
        }
    }
}

/// Per-engine settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    pub enabled: bool,
    pub strictness: Strictness,
    pub min_coverage: Option<u32>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            strictness: Strictness::Warn,
            min_coverage: None,
        }
    }
}

/// Engine roster configuration. `trace` is accepted in config so external
/// traceability engines can be gated, but no built-in engine consumes it.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EnginesConfig {
    pub spec: EngineSettings,
    pub test: EngineSettings,
    #[serde(alias = "traceability")]
    pub trace: EngineSettings,
}

/// Root configuration snapshot.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(rename = "global")]
    pub global_settings: GlobalSettings,
    pub engines: EnginesConfig,
}

/// Configuration errors, surfaced to the caller at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed config file: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Load configuration from `path`. A missing or empty file yields defaults.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        debug!(path = %path.display(), "config file absent, using defaults");
        return Ok(Config::default());
    }

    let contents = std::fs::read_to_string(path)?;
    if contents.trim().is_empty() {
        return Ok(Config::default());
    }

    let config: Config = serde_yaml::from_str(&contents)?;
    debug!(path = %path.display(), "config loaded");
    Ok(config)
}
